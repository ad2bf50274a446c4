//! Match scoring — pulls a percentage out of free-text model replies.
//!
//! This is a heuristic over unstructured output: "eighty percent" or "0.8"
//! score as 0. Callers go through the `ScoreExtractor` trait so a
//! structured-output backend can replace the pattern scrape.
//!
//! `AppState` holds an `Arc<dyn ScoreExtractor>`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PERCENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3})%").expect("percent pattern is valid"));

/// Swappable score source.
pub trait ScoreExtractor: Send + Sync {
    /// Raw score found in the reply, 0 when none was found. Not clamped.
    fn extract(&self, reply: &str) -> u32;
}

/// Default extractor: first 1–3 digit number immediately followed by `%`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentPatternExtractor;

impl ScoreExtractor for PercentPatternExtractor {
    fn extract(&self, reply: &str) -> u32 {
        extract_score(reply)
    }
}

pub fn extract_score(reply: &str) -> u32 {
    PERCENT_PATTERN
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Match percentage as stored on results: always within 0–100.
///
/// A reply of "0%" and a reply with no percentage both give 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchScore(u8);

impl MatchScore {
    /// Clamps extractor output to 100.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw.min(100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Fill fraction for a 0–100 progress indicator.
    pub fn progress(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl std::fmt::Display for MatchScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.value())
    }
}
