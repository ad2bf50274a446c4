//! Resume analysis — runs the resume-to-verdict pipeline for one request.
//!
//! Flow per resume: extract → normalize → compose → complete → score.
//! Ranking batches run resumes with bounded concurrency, gather every result
//! in upload order, then rank. Nothing is persisted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::intent::AnalysisIntent;
use crate::analysis::prompts::{compose_prompt, PromptLimits};
use crate::analysis::ranking::{RankedDetail, RankedRow, RankedTable, ScoredResume};
use crate::analysis::score::{MatchScore, ScoreExtractor};
use crate::errors::AppError;
use crate::extraction::{extract_pdf_text, normalize_text, Extraction};
use crate::llm_client::{CompletionClient, CompletionError};
use crate::models::resume::ResumeDocument;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub intent: AnalysisIntent,
    pub job_description: Option<String>,
    /// In upload order.
    pub resumes: Vec<ResumeDocument>,
}

/// Result for a single-resume intent.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeAnalysis {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// PercentageMatch only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<MatchScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Single { result: ResumeAnalysis },
    Ranking {
        table: Vec<RankedRow>,
        details: Vec<RankedDetail>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub intent: AnalysisIntent,
    pub heading: String,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
    /// Non-fatal problems, e.g. unreadable PDFs that were analyzed as empty.
    pub warnings: Vec<String>,
}

/// Everything one resume produced on its way through the pipeline.
struct PipelineItem {
    filename: String,
    reply: Result<String, CompletionError>,
    extraction_warning: Option<String>,
    truncated: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ResumeAnalyzer {
    completion: Arc<dyn CompletionClient>,
    score_extractor: Arc<dyn ScoreExtractor>,
    limits: PromptLimits,
    concurrency: usize,
}

impl ResumeAnalyzer {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        score_extractor: Arc<dyn ScoreExtractor>,
        limits: PromptLimits,
        concurrency: usize,
    ) -> Self {
        Self {
            completion,
            score_extractor,
            limits,
            concurrency: concurrency.max(1),
        }
    }

    /// Validates the request, then runs the pipeline for every resume.
    ///
    /// All input checks happen before any extraction or completion call.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisReport, AppError> {
        let AnalysisRequest {
            intent,
            job_description,
            resumes,
        } = request;

        if resumes.is_empty() {
            return Err(AppError::Validation(
                "Please upload at least one resume.".to_string(),
            ));
        }
        if !intent.accepts_multiple_resumes() && resumes.len() > 1 {
            return Err(AppError::Validation(format!(
                "'{}' analyzes a single resume; {} were uploaded.",
                intent.label(),
                resumes.len()
            )));
        }
        let job_description = normalize_text(job_description.as_deref().unwrap_or_default());
        if intent.requires_job_description() && job_description.is_empty() {
            return Err(AppError::Validation(
                "Please enter a job description.".to_string(),
            ));
        }
        if !self.completion.is_configured() {
            return Err(AppError::Unconfigured);
        }

        let analysis_id = Uuid::new_v4();
        info!(
            "Analysis {analysis_id} started: intent={intent:?}, resumes={}",
            resumes.len()
        );

        let items: Vec<PipelineItem> = stream::iter(resumes)
            .map(|resume| self.run_pipeline(intent, &job_description, resume))
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let warnings: Vec<String> = items
            .iter()
            .filter_map(|item| item.extraction_warning.clone())
            .collect();

        let outcome = if intent == AnalysisIntent::RankMultiple {
            self.rank(items)
        } else {
            let item = items
                .into_iter()
                .next()
                .ok_or_else(|| AppError::Internal(anyhow::anyhow!("pipeline produced no result")))?;
            AnalysisOutcome::Single {
                result: self.single(intent, item),
            }
        };

        info!("Analysis {analysis_id} finished with {} warning(s)", warnings.len());

        Ok(AnalysisReport {
            analysis_id,
            analyzed_at: Utc::now(),
            intent,
            heading: intent.heading().to_string(),
            outcome,
            warnings,
        })
    }

    async fn run_pipeline(
        &self,
        intent: AnalysisIntent,
        job_description: &str,
        resume: ResumeDocument,
    ) -> PipelineItem {
        let ResumeDocument { filename, content } = resume;

        let name = filename.clone();
        let extraction = tokio::task::spawn_blocking(move || extract_pdf_text(&name, &content))
            .await
            .unwrap_or_else(|e| Extraction {
                text: String::new(),
                warning: Some(format!("PDF Read Error ({filename}): {e}")),
            });

        let resume_text = normalize_text(&extraction.text);
        let composed = compose_prompt(intent, job_description, &resume_text, self.limits);

        let reply = self.completion.complete(&composed.payload).await;
        if let Err(e) = &reply {
            warn!("Completion failed for '{filename}': {e}");
        }

        PipelineItem {
            filename,
            reply,
            extraction_warning: extraction.warning,
            truncated: composed.resume_truncated || composed.job_description_truncated,
        }
    }

    fn single(&self, intent: AnalysisIntent, item: PipelineItem) -> ResumeAnalysis {
        let PipelineItem {
            filename,
            reply,
            truncated,
            ..
        } = item;

        match reply {
            Ok(text) => {
                let score = intent
                    .is_scored()
                    .then(|| MatchScore::from_raw(self.score_extractor.extract(&text)));
                ResumeAnalysis {
                    filename,
                    progress: score.map(MatchScore::progress),
                    score,
                    text: Some(text),
                    error: None,
                    truncated,
                }
            }
            Err(e) => ResumeAnalysis {
                filename,
                text: None,
                error: Some(e.to_string()),
                score: None,
                progress: None,
                truncated,
            },
        }
    }

    /// A failed completion still gets a row: scored 0 with the error as its
    /// explanation.
    fn rank(&self, items: Vec<PipelineItem>) -> AnalysisOutcome {
        let scored = items
            .into_iter()
            .map(|item| match item.reply {
                Ok(text) => ScoredResume {
                    filename: item.filename,
                    match_percentage: MatchScore::from_raw(self.score_extractor.extract(&text)),
                    explanation: text,
                },
                Err(e) => ScoredResume {
                    filename: item.filename,
                    match_percentage: MatchScore::default(),
                    explanation: e.to_string(),
                },
            })
            .collect();

        let table = RankedTable::rank(scored);
        AnalysisOutcome::Ranking {
            table: table.rows(),
            details: table.details(),
        }
    }
}
