// Shared prompt fragments.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// Closing instruction appended to every prompt that expects structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
IMPORTANT: Return ONLY the JSON object. \
Do NOT include any text outside the JSON object. \
Do NOT add markdown formatting or code fences such as ```json.";
