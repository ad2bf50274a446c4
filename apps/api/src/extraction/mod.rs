//! PDF text extraction.
//!
//! Best effort by contract: a page that fails contributes nothing, and a
//! document that cannot be opened degrades to empty text plus a warning
//! rather than an error. Both PDF libraries can panic on malformed input,
//! so every call runs inside [`std::panic::catch_unwind`].

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, warn};

pub mod normalize;

pub use normalize::normalize_text;

#[derive(Debug, Error)]
enum ExtractionError {
    #[error("{0}")]
    Document(String),

    #[error("parser panicked on malformed input")]
    Panicked,
}

/// Outcome of extracting one uploaded document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub text: String,
    /// Set when the document could not be read at all; `text` is then empty.
    pub warning: Option<String>,
}

/// Extracts the text of every page in order, concatenated without separator.
///
/// Tries `pdf_extract` first for its font-encoding support. If it rejects
/// the document, falls back to `lopdf` page by page so a single bad page
/// cannot sink the rest.
pub fn extract_pdf_text(filename: &str, bytes: &[u8]) -> Extraction {
    match extract_with_pdf_extract(bytes) {
        Ok(pages) => {
            return Extraction {
                text: pages.concat(),
                warning: None,
            }
        }
        Err(e) => debug!("pdf_extract rejected '{filename}': {e}; falling back to lopdf"),
    }

    match extract_with_lopdf(bytes) {
        Ok(pages) => Extraction {
            text: pages.concat(),
            warning: None,
        },
        Err(e) => {
            warn!("PDF read error for '{filename}': {e}");
            Extraction {
                text: String::new(),
                warning: Some(format!("PDF Read Error ({filename}): {e}")),
            }
        }
    }
}

fn extract_with_pdf_extract(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractionError::Document(e.to_string())),
        Err(_) => Err(ExtractionError::Panicked),
    }
}

fn extract_with_lopdf(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let document = panic::catch_unwind(AssertUnwindSafe(|| lopdf::Document::load_mem(bytes)))
        .map_err(|_| ExtractionError::Panicked)?
        .map_err(|e| ExtractionError::Document(e.to_string()))?;

    let pages = document
        .get_pages()
        .into_keys()
        .map(|page_number| {
            let text = panic::catch_unwind(AssertUnwindSafe(|| {
                document.extract_text(&[page_number])
            }));
            match text {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    debug!("page {page_number} yielded no text: {e}");
                    String::new()
                }
                Err(_) => {
                    debug!("page {page_number} panicked during extraction");
                    String::new()
                }
            }
        })
        .collect();

    Ok(pages)
}
