use serde::{Deserialize, Serialize};

use crate::analysis::score::MatchScore;

/// One resume's outcome in a ranking batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResume {
    pub filename: String,
    pub match_percentage: MatchScore,
    /// Full model reply, or the error text when the completion failed.
    pub explanation: String,
}

/// A row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub rank: usize,
    pub filename: String,
    pub match_percentage: MatchScore,
}

/// Expandable per-row detail, headed "filename - N%".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDetail {
    pub heading: String,
    pub explanation: String,
}

/// Scored resumes, best match first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedTable {
    entries: Vec<ScoredResume>,
}

impl RankedTable {
    /// Sorts by score descending. Input must be in upload order: the sort is
    /// stable, so equal scores keep that order.
    pub fn rank(mut scored: Vec<ScoredResume>) -> Self {
        scored.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));
        Self { entries: scored }
    }

    pub fn entries(&self) -> &[ScoredResume] {
        &self.entries
    }

    pub fn rows(&self) -> Vec<RankedRow> {
        self.entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| RankedRow {
                rank: i + 1,
                filename: entry.filename.clone(),
                match_percentage: entry.match_percentage,
            })
            .collect()
    }

    pub fn details(&self) -> Vec<RankedDetail> {
        self.entries()
            .iter()
            .map(|entry| RankedDetail {
                heading: format!("{} - {}", entry.filename, entry.match_percentage),
                explanation: entry.explanation.clone(),
            })
            .collect()
    }
}
