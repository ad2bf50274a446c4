// Instruction templates and payload composition for the analysis pipeline.
// The system persona lives in llm_client/prompts.rs.

use tracing::warn;

use crate::analysis::intent::AnalysisIntent;

pub const SUMMARY_INSTRUCTION: &str =
    "Provide a concise summary of the resume, highlighting key skills and experience.";

/// Shared by PercentageMatch and RankMultiple.
pub const MATCH_INSTRUCTION: &str = "How well does this resume match the job description? \
    Return only the percentage and a short explanation.";

pub const JOB_RECOMMENDATIONS_INSTRUCTION: &str =
    "Based on the resume content, suggest relevant job titles or industries.";

pub const SKILL_IMPROVEMENT_INSTRUCTION: &str = "List key skills from the resume, \
    compare with job description, and suggest additional skills to improve job alignment.";

/// Per-segment character caps applied before composing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptLimits {
    pub max_resume_chars: usize,
    pub max_job_description_chars: usize,
}

impl Default for PromptLimits {
    fn default() -> Self {
        Self {
            max_resume_chars: 12_000,
            max_job_description_chars: 4_000,
        }
    }
}

/// A composed payload plus which segments had to be cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub payload: String,
    pub resume_truncated: bool,
    pub job_description_truncated: bool,
}

/// Builds the user message: labeled job description, labeled resume, labeled
/// instruction, in that order.
///
/// Intents that do not use a job description get an empty segment even when
/// one was supplied. Inputs are expected to be normalized already.
pub fn compose_prompt(
    intent: AnalysisIntent,
    job_description: &str,
    resume_text: &str,
    limits: PromptLimits,
) -> ComposedPrompt {
    let job_description = if intent.requires_job_description() {
        job_description
    } else {
        ""
    };

    let (job_description, job_description_truncated) =
        truncate_chars(job_description, limits.max_job_description_chars);
    let (resume_text, resume_truncated) = truncate_chars(resume_text, limits.max_resume_chars);

    if job_description_truncated {
        warn!(
            "Job description truncated to {} characters",
            limits.max_job_description_chars
        );
    }
    if resume_truncated {
        warn!("Resume text truncated to {} characters", limits.max_resume_chars);
    }

    ComposedPrompt {
        payload: format!(
            "Job Description: {job_description}\nResume: {resume_text}\nPrompt: {}",
            intent.instruction()
        ),
        resume_truncated,
        job_description_truncated,
    }
}

/// Cuts `text` to at most `max_chars` characters on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_are_labeled_in_fixed_order() {
        let composed = compose_prompt(
            AnalysisIntent::PercentageMatch,
            "backend engineer with go experience",
            "alice built distributed systems in go",
            PromptLimits::default(),
        );
        assert_eq!(
            composed.payload,
            format!(
                "Job Description: backend engineer with go experience\n\
                 Resume: alice built distributed systems in go\n\
                 Prompt: {MATCH_INSTRUCTION}"
            )
        );
        assert!(!composed.resume_truncated);
        assert!(!composed.job_description_truncated);
    }

    #[test]
    fn test_summary_drops_job_description() {
        let composed = compose_prompt(
            AnalysisIntent::Summary,
            "ignored description",
            "resume body",
            PromptLimits::default(),
        );
        assert!(composed.payload.starts_with("Job Description: \nResume: resume body"));
        assert!(composed.payload.ends_with(SUMMARY_INSTRUCTION));
    }

    #[test]
    fn test_empty_resume_still_composes() {
        let composed = compose_prompt(
            AnalysisIntent::JobRecommendations,
            "",
            "",
            PromptLimits::default(),
        );
        assert!(composed.payload.contains("Resume: \nPrompt:"));
    }

    #[test]
    fn test_resume_truncated_on_char_boundary() {
        let limits = PromptLimits {
            max_resume_chars: 3,
            max_job_description_chars: 100,
        };
        let composed = compose_prompt(AnalysisIntent::Summary, "", "ééééé", limits);
        assert!(composed.payload.contains("Resume: ééé\n"));
        assert!(composed.resume_truncated);
    }

    #[test]
    fn test_job_description_truncated_independently() {
        let limits = PromptLimits {
            max_resume_chars: 100,
            max_job_description_chars: 4,
        };
        let composed =
            compose_prompt(AnalysisIntent::SkillImprovement, "rust and go", "resume", limits);
        assert!(composed.payload.starts_with("Job Description: rust\n"));
        assert!(composed.job_description_truncated);
        assert!(!composed.resume_truncated);
    }

    #[test]
    fn test_truncate_exact_length_is_untouched() {
        assert_eq!(truncate_chars("abcd", 4), ("abcd", false));
        assert_eq!(truncate_chars("abcde", 4), ("abcd", true));
    }
}
