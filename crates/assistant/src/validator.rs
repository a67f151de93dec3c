//! Repair and validation of the model's quiz output.
//!
//! Models are told to answer with raw JSON only, but in practice the
//! reply may arrive fenced, prefixed with commentary, or with the answer
//! index as a string. This module tolerates all of that and rejects only
//! structurally unusable output:
//!
//! 1. strip an enclosing code fence (```json or bare ```)
//! 2. slice from the first `{` to the last `}`
//! 3. parse as JSON
//! 4. check the five required fields
//! 5. check `options` has exactly 4 entries
//! 6. coerce `correct_answer` from digit-string form, require 1..=4
//! 7. soft-check the "N. ..." option labels (warning only)

use sonjutalk_core::error::ValidationError;
use sonjutalk_core::quiz::QuizItem;
use tracing::warn;

const REQUIRED_FIELDS: [&str; 5] = [
    "question",
    "options",
    "correct_answer",
    "explanation",
    "encouragement",
];

/// Parse raw model output into a validated [`QuizItem`].
///
/// Idempotent on already-clean JSON. Never mutates its input; all soft
/// failures are logged, hard failures come back as [`ValidationError`].
pub fn parse_quiz(raw: &str) -> Result<QuizItem, ValidationError> {
    let text = slice_object(strip_code_fence(raw));

    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| ValidationError::MalformedJson(e.to_string()))?;

    let record = value
        .as_object()
        .ok_or_else(|| ValidationError::MalformedJson("not a JSON object".into()))?;

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !record.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let options = record["options"]
        .as_array()
        .ok_or_else(|| ValidationError::MalformedJson("options is not an array".into()))?;
    if options.len() != 4 {
        return Err(ValidationError::BadOptionCount(options.len()));
    }

    let options: Vec<String> = options
        .iter()
        .map(|option| match option.as_str() {
            Some(s) => s.to_string(),
            None => option.to_string(),
        })
        .collect();

    let correct_answer = coerce_answer(&record["correct_answer"])?;

    for (i, option) in options.iter().enumerate() {
        if !has_index_prefix(option, i + 1) {
            warn!(option = %option, expected = i + 1, "Quiz option not in 'N. ...' format");
        }
    }

    Ok(QuizItem {
        question: text_field(&record["question"]),
        options,
        correct_answer,
        explanation: text_field(&record["explanation"]),
        encouragement: text_field(&record["encouragement"]),
    })
}

/// Take the content between the first opening fence and its closing
/// fence. A labeled ```json fence wins over a bare one; an unclosed
/// fence keeps everything after the marker.
fn strip_code_fence(raw: &str) -> &str {
    for marker in ["```json", "```"] {
        if let Some(start) = raw.find(marker) {
            let rest = &raw[start + marker.len()..];
            return match rest.find("```") {
                Some(end) => &rest[..end],
                None => rest,
            };
        }
    }
    raw
}

/// Slice from the first `{` to the last `}`, tolerating commentary the
/// model added around the JSON despite instructions. Left untouched when
/// no brace pair exists — the JSON parse will reject it with a better
/// message.
fn slice_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Coerce `correct_answer` into 1..=4, accepting digit-string form
/// ("3") as the models frequently produce it.
fn coerce_answer(value: &serde_json::Value) -> Result<u8, ValidationError> {
    let answer = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s)
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) =>
        {
            s.parse::<i64>().ok()
        }
        _ => None,
    };

    match answer {
        Some(n @ 1..=4) => Ok(n as u8),
        Some(n) => Err(ValidationError::BadAnswerRange(n.to_string())),
        None => Err(ValidationError::BadAnswerRange(value.to_string())),
    }
}

/// Does the option start with its 1-based index, a dot, whitespace, and
/// content? ("2. 화면 위")
fn has_index_prefix(option: &str, index: usize) -> bool {
    option
        .strip_prefix(&format!("{index}."))
        .is_some_and(|rest| {
            rest.starts_with(|c: char| c.is_whitespace()) && !rest.trim().is_empty()
        })
}

fn text_field(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}
