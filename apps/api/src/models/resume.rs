use std::path::Path;

use bytes::Bytes;

/// An uploaded resume, held only for the duration of one analysis request.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    /// Upload name with its extension stripped; identifies the resume in results.
    pub filename: String,
    pub content: Bytes,
}

impl ResumeDocument {
    pub fn from_upload(original_name: &str, content: Bytes) -> Self {
        Self {
            filename: display_name(original_name),
            content,
        }
    }
}

/// `"alice.pdf"` → `"alice"`. Directory components some clients send are
/// dropped too. Falls back to `"resume"` when nothing usable remains.
fn display_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name)
        .trim();
    let stem = Path::new(base)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(base)
        .trim();
    if stem.is_empty() {
        "resume".to_string()
    } else {
        stem.to_string()
    }
}
