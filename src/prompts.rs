//! Instructions sent with each resume analysis.
//!
//! Every task pairs the job description and the resume image with one fixed
//! instruction. Callers can override the text through
//! [`crate::config::AnalysisConfig::instruction`]; the constants here are used
//! only when no override is provided.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ask for an overall evaluation of fit, strengths and weaknesses.
pub const REVIEW_PROMPT: &str = r#"You are an experienced Technical Human Resource Manager. Your task is to review the provided resume against the job description.
Please share your professional evaluation on whether the candidate's profile aligns with the role.
Highlight the strengths and weaknesses of the applicant in relation to the specified job requirements."#;

/// Ask for a match percentage first, then missing keywords and final thoughts.
pub const PERCENTAGE_MATCH_PROMPT: &str = r#"You are a skilled ATS (Applicant Tracking System) scanner with a deep understanding of data science and ATS functionality.
Your task is to evaluate the resume against the provided job description. Give me the percentage of match if the resume matches
the job description. First, the output should come as a percentage and then keywords missing and last, final thoughts."#;

/// Ask for actionable skill-development advice.
pub const SKILL_IMPROVEMENT_PROMPT: &str = r#"As a career coach, identify key areas where the candidate's skills can be improved to better align with the job description.
Provide actionable suggestions for skill development and enhancement."#;

/// Ask for the keywords and skills the resume lacks.
pub const MISSING_SKILLS_PROMPT: &str = r#"You are an ATS system. Highlight the keywords and skills missing in the provided resume that are critical for the job description.
Focus on technical skills, soft skills, and language proficiency."#;

/// Ask for an in-depth analysis with concrete resume improvements.
pub const DETAILED_ANALYSIS_PROMPT: &str = r#"Perform a detailed analysis of the resume against the job description. Provide insights into the candidate's suitability,
focusing on experience, skills, and achievements. Suggest specific ways to improve the resume for a better match."#;

/// The kinds of analysis a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnalysisTask {
    /// Professional evaluation of the resume against the role.
    #[default]
    Review,
    /// Match percentage, missing keywords, final thoughts.
    PercentageMatch,
    /// Skill development suggestions.
    SkillImprovement,
    /// Missing keywords and skills.
    MissingSkills,
    /// Detailed suitability analysis.
    DetailedAnalysis,
}

impl AnalysisTask {
    /// Every task, in the order they are offered to users.
    pub const ALL: [AnalysisTask; 5] = [
        AnalysisTask::Review,
        AnalysisTask::PercentageMatch,
        AnalysisTask::SkillImprovement,
        AnalysisTask::MissingSkills,
        AnalysisTask::DetailedAnalysis,
    ];

    /// The built-in instruction text.
    pub fn instruction(self) -> &'static str {
        match self {
            AnalysisTask::Review => REVIEW_PROMPT,
            AnalysisTask::PercentageMatch => PERCENTAGE_MATCH_PROMPT,
            AnalysisTask::SkillImprovement => SKILL_IMPROVEMENT_PROMPT,
            AnalysisTask::MissingSkills => MISSING_SKILLS_PROMPT,
            AnalysisTask::DetailedAnalysis => DETAILED_ANALYSIS_PROMPT,
        }
    }

    /// Human-readable label, e.g. for a button or a heading.
    pub fn label(self) -> &'static str {
        match self {
            AnalysisTask::Review => "Tell Me About the Resume",
            AnalysisTask::PercentageMatch => "Percentage Match",
            AnalysisTask::SkillImprovement => "Skill Improvement Suggestions",
            AnalysisTask::MissingSkills => "Highlight Missing Skills",
            AnalysisTask::DetailedAnalysis => "Detailed Analysis",
        }
    }

    /// Whether the response is expected to open with a match percentage.
    pub fn reports_score(self) -> bool {
        matches!(self, AnalysisTask::PercentageMatch)
    }
}

impl fmt::Display for AnalysisTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
