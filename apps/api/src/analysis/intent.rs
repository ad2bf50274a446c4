use serde::{Deserialize, Serialize};

use crate::analysis::prompts::{
    JOB_RECOMMENDATIONS_INSTRUCTION, MATCH_INSTRUCTION, SKILL_IMPROVEMENT_INSTRUCTION,
    SUMMARY_INSTRUCTION,
};

/// The analysis mode selected by the user. Drives the instruction template,
/// whether a job description is required, and how the reply is post-processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisIntent {
    Summary,
    PercentageMatch,
    JobRecommendations,
    SkillImprovement,
    RankMultiple,
}

impl AnalysisIntent {
    pub const ALL: [AnalysisIntent; 5] = [
        AnalysisIntent::Summary,
        AnalysisIntent::PercentageMatch,
        AnalysisIntent::JobRecommendations,
        AnalysisIntent::SkillImprovement,
        AnalysisIntent::RankMultiple,
    ];

    pub fn requires_job_description(self) -> bool {
        matches!(
            self,
            AnalysisIntent::PercentageMatch
                | AnalysisIntent::SkillImprovement
                | AnalysisIntent::RankMultiple
        )
    }

    /// Whether a match percentage is scraped from the reply.
    pub fn is_scored(self) -> bool {
        matches!(
            self,
            AnalysisIntent::PercentageMatch | AnalysisIntent::RankMultiple
        )
    }

    /// Only ranking accepts more than one resume per request.
    pub fn accepts_multiple_resumes(self) -> bool {
        self == AnalysisIntent::RankMultiple
    }

    pub fn instruction(self) -> &'static str {
        match self {
            AnalysisIntent::Summary => SUMMARY_INSTRUCTION,
            AnalysisIntent::PercentageMatch | AnalysisIntent::RankMultiple => MATCH_INSTRUCTION,
            AnalysisIntent::JobRecommendations => JOB_RECOMMENDATIONS_INSTRUCTION,
            AnalysisIntent::SkillImprovement => SKILL_IMPROVEMENT_INSTRUCTION,
        }
    }

    /// Option label shown to users when picking a mode.
    pub fn label(self) -> &'static str {
        match self {
            AnalysisIntent::Summary => "Resume Summary",
            AnalysisIntent::PercentageMatch => "Percentage Match with Job Description",
            AnalysisIntent::JobRecommendations => "Job Recommendations",
            AnalysisIntent::SkillImprovement => "Skill Improvement Suggestions",
            AnalysisIntent::RankMultiple => "Rank Multiple Resumes",
        }
    }

    /// Heading for a rendered result.
    pub fn heading(self) -> &'static str {
        match self {
            AnalysisIntent::Summary => "Summary",
            AnalysisIntent::PercentageMatch => "Match Score",
            AnalysisIntent::JobRecommendations => "Job Recommendations",
            AnalysisIntent::SkillImprovement => "Skill Suggestions",
            AnalysisIntent::RankMultiple => "Ranking",
        }
    }
}

impl std::str::FromStr for AnalysisIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        serde_json::from_value(serde_json::Value::String(needle.to_string()))
            .ok()
            .or_else(|| {
                AnalysisIntent::ALL
                    .into_iter()
                    .find(|intent| intent.label().eq_ignore_ascii_case(needle))
            })
            .ok_or_else(|| format!("Unknown analysis intent '{needle}'"))
    }
}
