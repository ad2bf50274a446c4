//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::analysis::intent::AnalysisIntent;
use crate::analysis::pipeline::{AnalysisReport, AnalysisRequest};
use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct IntentOption {
    pub intent: AnalysisIntent,
    pub label: &'static str,
    pub requires_job_description: bool,
    pub accepts_multiple_resumes: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/intents
///
/// Lists the analysis modes and which inputs each one needs.
pub async fn handle_list_intents() -> Json<Vec<IntentOption>> {
    Json(
        AnalysisIntent::ALL
            .into_iter()
            .map(|intent| IntentOption {
                intent,
                label: intent.label(),
                requires_job_description: intent.requires_job_description(),
                accepts_multiple_resumes: intent.accepts_multiple_resumes(),
            })
            .collect(),
    )
}

/// POST /api/v1/analyze
///
/// Multipart form: `intent` (text), optional `job_description` (text), and
/// one or more `resume` file parts. A part with neither a filename nor any
/// bytes (an empty file input) is ignored; a named zero-byte upload is kept
/// and reported as unreadable.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let request = read_analysis_form(multipart).await?;
    let report = state.analyzer().analyze(request).await?;
    Ok(Json(report))
}

async fn read_analysis_form(mut multipart: Multipart) -> Result<AnalysisRequest, AppError> {
    let mut intent = None;
    let mut job_description = None;
    let mut resumes = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("intent") => {
                let raw = field.text().await?;
                intent = Some(raw.parse::<AnalysisIntent>().map_err(AppError::Validation)?);
            }
            Some("job_description") => {
                job_description = Some(field.text().await?);
            }
            Some("resume") | Some("resumes") => {
                let upload_name = field
                    .file_name()
                    .filter(|name| !name.trim().is_empty())
                    .map(str::to_string);
                let content = field.bytes().await?;
                match upload_name {
                    None if content.is_empty() => {
                        debug!("Ignoring resume part with no file selected");
                    }
                    upload_name => {
                        let upload_name = upload_name.unwrap_or_else(|| "resume.pdf".to_string());
                        resumes.push(ResumeDocument::from_upload(&upload_name, content));
                    }
                }
            }
            other => debug!("Ignoring unknown form field {other:?}"),
        }
    }

    let intent = intent.ok_or_else(|| {
        AppError::Validation("Please choose what you'd like to analyze.".to_string())
    })?;

    Ok(AnalysisRequest {
        intent,
        job_description,
        resumes,
    })
}
