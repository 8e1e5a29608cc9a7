// Career analysis prompt templates and the prompt builder.
// Both input modes share one output contract so the normalizer sees one shape.

use std::fmt;

use crate::analysis::models::{AnalysisMode, ProfileForm};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Resume text beyond this many characters is dropped before prompting.
pub const MAX_RESUME_CHARS: usize = 10_000;

const RESUME_PREAMBLE: &str = "\
You are an expert AI Career Architect. Analyze the following resume text.
Based on the candidate's skills, assume they are applying for their best-fit role.";

const PROFILE_PREAMBLE: &str = "\
You are a strict and professional AI Career Architect. Analyze this student profile.";

const OUTPUT_CONTRACT: &str = r#"Provide a response in valid JSON format with exactly these 3 top-level keys and nothing else:

1. "eligibility": {
    "status": "Yes" or "No",
    "roles": ["2-3 specific job titles the candidate fits best"],
    "reason": "A 2-sentence professional explanation of the fit."
}

2. "roadmap": [
    "Step 1: ...", "Step 2: ...", "Step 3: ...", "Step 4: ..."
] (exactly 4 concrete, actionable steps)

3. "suggestions": {
    "certifications": ["exactly 2 specific real-world certifications"],
    "technicalSkills": ["3-5 specific technical skills or tools to learn next"]
}"#;

/// What the prompt is built from. The variant fixes the analysis mode.
#[derive(Debug, Clone, Copy)]
pub enum PromptSource<'a> {
    Resume(&'a str),
    Manual(&'a ProfileForm),
}

impl PromptSource<'_> {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            PromptSource::Resume(_) => AnalysisMode::Resume,
            PromptSource::Manual(_) => AnalysisMode::Manual,
        }
    }
}

/// A complete instruction string ready for the completion client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the analysis prompt. Pure string composition; user text is
/// interpolated once and never re-scanned for placeholders.
pub fn build_prompt(source: &PromptSource<'_>) -> Prompt {
    let prompt = match source {
        PromptSource::Resume(text) => format!(
            "{RESUME_PREAMBLE}\n\nRESUME TEXT:\n\"\"\"\n{}\n\"\"\"\n\n{OUTPUT_CONTRACT}\n\n{JSON_ONLY_INSTRUCTION}",
            truncate_chars(text, MAX_RESUME_CHARS)
        ),
        PromptSource::Manual(form) => format!(
            "{PROFILE_PREAMBLE}\n\n\
             - Education History: {}\n\
             - Current Skills: {}\n\
             - Job Interests: {}\n\n\
             {OUTPUT_CONTRACT}\n\n{JSON_ONLY_INSTRUCTION}",
            form.education, form.skills, form.interests
        ),
    };
    Prompt(prompt)
}

/// Returns the first `max_chars` characters of `text` (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
