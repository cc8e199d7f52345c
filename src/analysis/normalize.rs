//! Result normalizer: raw model payload -> [`AnalysisResult`].
//!
//! The payload is untrusted. Optional collections default to empty, but anything that
//! is present and has the wrong shape is rejected: a silently repaired score would
//! corrupt every downstream aggregate.

use serde_json::{Map, Value};

use super::types::{AnalysisResult, Quarter, Roadmap, Score, SCORE_MAX, SCORE_MIN};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedAnalysisError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("score.value must be a number, got {0}")]
    ScoreNotNumeric(&'static str),
    #[error("score.value {0} is outside [0, 100]")]
    ScoreOutOfRange(f64),
    #[error("field `{field}` must be {expected}, got {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("roadmap key `{0}` is not one of q1, q2, q3, q4")]
    UnknownQuarter(String),
    #[error("roadmap quarter `{0}` appears more than once")]
    DuplicateQuarter(String),
}

/// Normalize a raw response body.
///
/// A body that is valid JSON on its own is taken as-is, so a top-level array is rejected
/// rather than mined for an inner object. Only a body that does not parse falls back to
/// [`extract_json`], which tolerates prose or markdown fences some models add even in
/// JSON mode. Text after the extracted object is ignored.
pub fn normalize_analysis(raw: &str) -> Result<AnalysisResult, MalformedAnalysisError> {
    if let Ok(value) = serde_json::from_str::<Value>(raw.trim()) {
        return normalize_value(&value);
    }
    let value: Value = serde_json::from_str(extract_json(raw))
        .map_err(|e| MalformedAnalysisError::InvalidJson(e.to_string()))?;
    normalize_value(&value)
}

/// Normalize an already-parsed payload.
pub fn normalize_value(value: &Value) -> Result<AnalysisResult, MalformedAnalysisError> {
    let obj = value
        .as_object()
        .ok_or_else(|| MalformedAnalysisError::NotAnObject(type_name(value)))?;

    Ok(AnalysisResult {
        score: normalize_score(obj.get("score"))?,
        key_developments: string_list(obj, "key_developments")?,
        deployment_steps: string_list(obj, "deployment_steps")?,
        roadmap: normalize_roadmap(obj.get("roadmap"))?,
        investor_pitch: optional_text(obj, "investor_pitch")?,
    })
}

fn normalize_score(value: Option<&Value>) -> Result<Option<Score>, MalformedAnalysisError> {
    let obj = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(obj)) => obj,
        Some(other) => {
            return Err(MalformedAnalysisError::WrongType {
                field: "score".into(),
                expected: "an object",
                found: type_name(other),
            })
        }
    };

    let raw_value = obj.get("value").unwrap_or(&Value::Null);
    let value = raw_value
        .as_f64()
        .ok_or_else(|| MalformedAnalysisError::ScoreNotNumeric(type_name(raw_value)))?;
    if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
        return Err(MalformedAnalysisError::ScoreOutOfRange(value));
    }

    let reasoning = match obj.get("reasoning") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            return Err(MalformedAnalysisError::WrongType {
                field: "score.reasoning".into(),
                expected: "a string",
                found: type_name(other),
            })
        }
    };

    Ok(Some(Score { value, reasoning }))
}

fn string_list(obj: &Map<String, Value>, field: &str) -> Result<Vec<String>, MalformedAnalysisError> {
    let items = match obj.get(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(MalformedAnalysisError::WrongType {
                field: field.into(),
                expected: "an array of strings",
                found: type_name(other),
            })
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => {
                let s = s.trim();
                if !s.is_empty() {
                    out.push(s.to_string());
                }
            }
            other => {
                return Err(MalformedAnalysisError::WrongType {
                    field: format!("{field}[{idx}]"),
                    expected: "a string",
                    found: type_name(other),
                })
            }
        }
    }
    Ok(out)
}

fn normalize_roadmap(value: Option<&Value>) -> Result<Roadmap, MalformedAnalysisError> {
    let obj = match value {
        None | Some(Value::Null) => return Ok(Roadmap::new()),
        Some(Value::Object(obj)) => obj,
        Some(other) => {
            return Err(MalformedAnalysisError::WrongType {
                field: "roadmap".into(),
                expected: "an object",
                found: type_name(other),
            })
        }
    };

    let mut roadmap = Roadmap::new();
    let mut seen = Vec::with_capacity(obj.len());
    for (key, goal) in obj {
        let quarter =
            Quarter::from_key(key).ok_or_else(|| MalformedAnalysisError::UnknownQuarter(key.clone()))?;
        // `from_key` folds case, so "q1" and "Q1" name the same slot.
        if seen.contains(&quarter) {
            return Err(MalformedAnalysisError::DuplicateQuarter(quarter.label().to_string()));
        }
        seen.push(quarter);
        match goal {
            Value::Null => {}
            Value::String(s) if s.trim().is_empty() => {}
            Value::String(s) => roadmap.insert(quarter, s.trim()),
            other => {
                return Err(MalformedAnalysisError::WrongType {
                    field: format!("roadmap.{key}"),
                    expected: "a string",
                    found: type_name(other),
                })
            }
        }
    }
    Ok(roadmap)
}

fn optional_text(
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, MalformedAnalysisError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(MalformedAnalysisError::WrongType {
            field: field.into(),
            expected: "a string",
            found: type_name(other),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// JSON extraction
// =============================================================================

/// Extract a JSON object from potentially noisy model output.
///
/// Handles pure JSON, JSON in markdown code fences, and JSON embedded in prose.
pub fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(start) = trimmed.find('{') {
        let remainder = &trimmed[start..];
        if let Some(end) = find_matching_brace(remainder) {
            return &remainder[..end];
        }
    }

    trimmed
}

/// Byte offset just past the brace closing the first object, ignoring braces in strings.
fn find_matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape = false;

    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if c == '\\' && in_string {
            escape = true;
            continue;
        }
        if c == '"' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_full_contract_payload() {
        let raw = r#"{
            "score": {"value": 72, "reasoning": "Solid niche market"},
            "key_developments": ["Build subscription platform"],
            "deployment_steps": ["Develop MVP"],
            "roadmap": {"q1": "Launch pilot"},
            "investor_pitch": "Coffee lovers deserve curated discovery..."
        }"#;
        let result = normalize_analysis(raw).unwrap();
        assert_eq!(result.score_value(), Some(72.0));
        assert_eq!(result.key_developments, vec!["Build subscription platform"]);
        assert_eq!(result.roadmap.get(Quarter::Q1), Some("Launch pilot"));
        assert!(result.pitch().unwrap().starts_with("Coffee"));
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let result = normalize_value(&json!({})).unwrap();
        assert_eq!(result, AnalysisResult::default());

        let result = normalize_value(&json!({
            "score": null,
            "key_developments": null,
            "roadmap": null,
            "investor_pitch": "   "
        }))
        .unwrap();
        assert!(result.score.is_none());
        assert!(result.investor_pitch.is_none());
    }

    #[test]
    fn rejects_out_of_range_score_instead_of_clamping() {
        let err = normalize_value(&json!({"score": {"value": 101}})).unwrap_err();
        assert_eq!(err, MalformedAnalysisError::ScoreOutOfRange(101.0));

        let err = normalize_value(&json!({"score": {"value": -0.5}})).unwrap_err();
        assert_eq!(err, MalformedAnalysisError::ScoreOutOfRange(-0.5));
    }

    #[test]
    fn boundary_scores_are_accepted() {
        for v in [0.0, 100.0] {
            let result = normalize_value(&json!({"score": {"value": v}})).unwrap();
            assert_eq!(result.score_value(), Some(v));
        }
    }

    #[test]
    fn rejects_non_numeric_score_value() {
        let err = normalize_value(&json!({"score": {"value": "72"}})).unwrap_err();
        assert_eq!(err, MalformedAnalysisError::ScoreNotNumeric("string"));

        let err = normalize_value(&json!({"score": {"reasoning": "no value"}})).unwrap_err();
        assert_eq!(err, MalformedAnalysisError::ScoreNotNumeric("null"));
    }

    #[test]
    fn rejects_unknown_roadmap_quarters() {
        let err = normalize_value(&json!({"roadmap": {"q5": "later"}})).unwrap_err();
        assert_eq!(err, MalformedAnalysisError::UnknownQuarter("q5".into()));
    }

    #[test]
    fn rejects_non_string_list_items() {
        let err = normalize_value(&json!({"deployment_steps": ["ok", 3]})).unwrap_err();
        assert!(matches!(
            err,
            MalformedAnalysisError::WrongType { ref field, .. } if field == "deployment_steps[1]"
        ));
    }

    #[test]
    fn rejects_invalid_json_and_non_objects() {
        assert!(matches!(
            normalize_analysis("not json at all"),
            Err(MalformedAnalysisError::InvalidJson(_))
        ));
        assert_eq!(
            normalize_value(&json!([1, 2])).unwrap_err(),
            MalformedAnalysisError::NotAnObject("array")
        );
    }

    #[test]
    fn top_level_array_is_not_mined_for_an_object() {
        assert_eq!(
            normalize_analysis(r#"[{"score": {"value": 50}}]"#).unwrap_err(),
            MalformedAnalysisError::NotAnObject("array")
        );
    }

    #[test]
    fn case_folded_duplicate_quarters_are_rejected() {
        let err = normalize_analysis(r#"{"roadmap": {"q1": "a", "Q1": "b"}}"#).unwrap_err();
        assert_eq!(err, MalformedAnalysisError::DuplicateQuarter("Q1".into()));
    }

    #[test]
    fn extract_json_strips_fences_and_prose() {
        let input = "Here you go:\n```json\n{\"score\": {\"value\": 50, \"reasoning\": \"a {b} c\"}}\n```";
        assert_eq!(
            extract_json(input),
            "{\"score\": {\"value\": 50, \"reasoning\": \"a {b} c\"}}"
        );
    }

    #[test]
    fn extract_json_handles_escaped_quotes() {
        let input = r#"{"investor_pitch": "We are \"the\" answer"}"#;
        assert_eq!(extract_json(input), input);
    }
}
