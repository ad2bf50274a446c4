use std::sync::Arc;

use crate::analysis::pipeline::ResumeAnalyzer;
use crate::analysis::prompts::PromptLimits;
use crate::analysis::score::ScoreExtractor;
use crate::config::Config;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// `UnconfiguredClient` when no API key is set.
    pub completion: Arc<dyn CompletionClient>,
    /// Pluggable score source. Default: PercentPatternExtractor.
    pub score_extractor: Arc<dyn ScoreExtractor>,
    pub config: Config,
}

impl AppState {
    pub fn analyzer(&self) -> ResumeAnalyzer {
        ResumeAnalyzer::new(
            self.completion.clone(),
            self.score_extractor.clone(),
            PromptLimits {
                max_resume_chars: self.config.max_resume_chars,
                max_job_description_chars: self.config.max_job_description_chars,
            },
            self.config.analysis_concurrency,
        )
    }
}
