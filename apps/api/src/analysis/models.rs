use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Allowed number of suggested roles.
pub const ROLE_COUNT: RangeInclusive<usize> = 2..=3;
/// Allowed number of missing technical skills.
pub const TECHNICAL_SKILL_COUNT: RangeInclusive<usize> = 3..=5;

/// Which flow produced the analysis. Derived from the input variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Resume,
    Manual,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Resume => f.write_str("resume"),
            AnalysisMode::Manual => f.write_str("manual"),
        }
    }
}

/// Free-text profile fields submitted in manual mode.
///
/// Fields default to empty so that a missing field is reported as an input
/// error by the pipeline instead of a JSON rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub interests: String,
}

impl ProfileForm {
    /// Names of the fields that are missing or blank.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("education", &self.education),
            ("skills", &self.skills),
            ("interests", &self.interests),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityStatus {
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eligibility {
    pub status: EligibilityStatus,
    pub roles: Vec<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub certifications: [String; 2],
    #[serde(rename = "technicalSkills")]
    pub technical_skills: Vec<String>,
}

/// The validated analysis handed back to the caller. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub eligibility: Eligibility,
    pub roadmap: [String; 4],
    pub suggestions: Suggestions,
}

impl AnalysisRecord {
    /// Checks the item counts serde cannot express on its own.
    pub fn check_counts(&self) -> Result<(), String> {
        let roles = self.eligibility.roles.len();
        if !ROLE_COUNT.contains(&roles) {
            return Err(format!(
                "eligibility.roles must have {}-{} entries, got {roles}",
                ROLE_COUNT.start(),
                ROLE_COUNT.end()
            ));
        }

        let skills = self.suggestions.technical_skills.len();
        if !TECHNICAL_SKILL_COUNT.contains(&skills) {
            return Err(format!(
                "suggestions.technicalSkills must have {}-{} entries, got {skills}",
                TECHNICAL_SKILL_COUNT.start(),
                TECHNICAL_SKILL_COUNT.end()
            ));
        }

        Ok(())
    }
}
