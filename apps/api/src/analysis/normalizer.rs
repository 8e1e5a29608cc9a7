//! Response Normalizer: turns raw completion text into a validated `AnalysisRecord`.
//!
//! Steps: strip code-fence markers → trim → parse JSON → one extra parse if the
//! value is a JSON string → require the three top-level keys → typed decode →
//! item-count checks. Anything else is a hard failure; nothing is patched up.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::analysis::models::AnalysisRecord;

pub const REQUIRED_KEYS: [&str; 3] = ["eligibility", "roadmap", "suggestions"];

/// Three backticks, plus a language tag only when the tag ends the line.
/// The line break is captured so it can be put back.
static FENCE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:[A-Za-z0-9_+\-]+(\r?\n))?").expect("fence pattern is valid")
});

#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("completion was empty after removing code fences")]
    Empty,

    #[error("completion is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("analysis does not match the expected schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("analysis has the wrong number of items: {0}")]
    Shape(String),
}

/// Removes every code-fence marker, opening or closing. A word glued to the
/// backticks is dropped as a language tag only when a line break follows it,
/// so text after a closing fence survives. Everything else is left intact.
pub fn strip_code_fences(raw: &str) -> String {
    FENCE_MARKER.replace_all(raw, "${1}").into_owned()
}

/// Normalizes a raw completion into an `AnalysisRecord`.
pub fn normalize_completion(raw: &str) -> Result<AnalysisRecord, NormalizationError> {
    let stripped = strip_code_fences(raw);
    let text = stripped.trim();
    if text.is_empty() {
        return Err(NormalizationError::Empty);
    }

    let value: Value = serde_json::from_str(text).map_err(NormalizationError::NotJson)?;

    // Some providers return the JSON document encoded as a JSON string.
    let value = match value {
        Value::String(inner) => {
            serde_json::from_str(&inner).map_err(NormalizationError::NotJson)?
        }
        other => other,
    };

    decode_record(value)
}

fn decode_record(value: Value) -> Result<AnalysisRecord, NormalizationError> {
    let object = value
        .as_object()
        .ok_or_else(|| NormalizationError::NotAnObject(json_kind(&value)))?;

    if let Some(missing) = REQUIRED_KEYS.into_iter().find(|k| !object.contains_key(*k)) {
        return Err(NormalizationError::MissingKey(missing));
    }

    let record: AnalysisRecord =
        serde_json::from_value(value).map_err(NormalizationError::Schema)?;
    record.check_counts().map_err(NormalizationError::Shape)?;

    Ok(record)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::sample_record_json;

    fn sample_text() -> String {
        sample_record_json().to_string()
    }

    // ── fence stripping ─────────────────────────────────────────────────────

    #[test]
    fn test_strip_fences_with_language_tag() {
        let body = sample_text();
        let raw = format!("```json\n{body}\n```");
        assert_eq!(strip_code_fences(&raw), format!("\n{body}\n"));
    }

    #[test]
    fn test_strip_fences_without_language_tag() {
        let raw = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(raw), "\n{\"key\": \"value\"}\n");
    }

    #[test]
    fn test_strip_fences_removes_markers_anywhere() {
        let raw = "Here you go:\n```JSON\n{}\n```\nThanks ```";
        assert_eq!(strip_code_fences(raw), "Here you go:\n\n{}\n\nThanks ");
    }

    #[test]
    fn test_strip_fences_keeps_text_glued_to_closing_fence() {
        let raw = "```json\n{}\n```Thanks";
        assert_eq!(strip_code_fences(raw), "\n{}\nThanks");
    }

    #[test]
    fn test_strip_fences_keeps_inline_word_after_backticks() {
        let raw = r#"{"tip": "run ```bash ls``` daily"}"#;
        assert_eq!(strip_code_fences(raw), r#"{"tip": "run bash ls daily"}"#);
    }

    #[test]
    fn test_strip_fences_with_crlf_tag_line() {
        assert_eq!(strip_code_fences("```json\r\n{}\r\n```"), "\r\n{}\r\n");
    }

    #[test]
    fn test_strip_fences_no_fences_is_identity() {
        let raw = "  {\"key\": \"value with `ticks`\"}  ";
        assert_eq!(strip_code_fences(raw), raw);
    }

    // ── parsing ─────────────────────────────────────────────────────────────

    #[test]
    fn test_plain_object_parses() {
        let record = normalize_completion(&sample_text()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), sample_record_json());
    }

    #[test]
    fn test_fenced_object_parses_to_same_record() {
        let plain = normalize_completion(&sample_text()).unwrap();
        let fenced = normalize_completion(&format!("```json\n{}\n```", sample_text())).unwrap();
        assert_eq!(plain, fenced);
    }

    #[test]
    fn test_double_encoded_json_is_unwrapped_once() {
        let encoded = serde_json::to_string(&sample_text()).unwrap();
        assert!(encoded.starts_with('"'));
        let record = normalize_completion(&encoded).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), sample_record_json());
    }

    #[test]
    fn test_triple_encoded_json_is_rejected() {
        let twice = serde_json::to_string(&sample_text()).unwrap();
        let thrice = serde_json::to_string(&twice).unwrap();
        assert!(matches!(
            normalize_completion(&thrice),
            Err(NormalizationError::NotAnObject("a string"))
        ));
    }

    #[test]
    fn test_prose_is_not_json() {
        assert!(matches!(
            normalize_completion("Sorry, I cannot help."),
            Err(NormalizationError::NotJson(_))
        ));
    }

    #[test]
    fn test_leading_prose_is_not_recovered() {
        let raw = format!("Here is the analysis: {}", sample_text());
        assert!(matches!(
            normalize_completion(&raw),
            Err(NormalizationError::NotJson(_))
        ));
    }

    #[test]
    fn test_only_fences_is_empty() {
        assert!(matches!(
            normalize_completion("```json\n\n```"),
            Err(NormalizationError::Empty)
        ));
    }

    #[test]
    fn test_array_is_not_an_object() {
        assert!(matches!(
            normalize_completion("[1, 2, 3]"),
            Err(NormalizationError::NotAnObject("an array"))
        ));
    }

    // ── shape enforcement ───────────────────────────────────────────────────

    #[test]
    fn test_each_missing_key_is_reported() {
        for key in REQUIRED_KEYS {
            let mut value = sample_record_json();
            value.as_object_mut().unwrap().remove(key);
            match normalize_completion(&value.to_string()) {
                Err(NormalizationError::MissingKey(k)) => assert_eq!(k, key),
                other => panic!("expected MissingKey({key}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_wrong_field_type_is_schema_error() {
        let mut value = sample_record_json();
        value["roadmap"] = serde_json::json!("just keep learning");
        assert!(matches!(
            normalize_completion(&value.to_string()),
            Err(NormalizationError::Schema(_))
        ));
    }

    #[test]
    fn test_wrong_certification_count_is_schema_error() {
        let mut value = sample_record_json();
        value["suggestions"]["certifications"] = serde_json::json!(["Only one"]);
        assert!(matches!(
            normalize_completion(&value.to_string()),
            Err(NormalizationError::Schema(_))
        ));
    }

    #[test]
    fn test_wrong_role_count_is_shape_error() {
        let mut value = sample_record_json();
        value["eligibility"]["roles"] = serde_json::json!([]);
        assert!(matches!(
            normalize_completion(&value.to_string()),
            Err(NormalizationError::Shape(_))
        ));
    }

    #[test]
    fn test_extra_top_level_keys_are_ignored() {
        let mut value = sample_record_json();
        value["confidence"] = serde_json::json!(0.9);
        let record = normalize_completion(&value.to_string()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), sample_record_json());
    }
}
