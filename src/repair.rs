// src/repair.rs
//! Lenient JSON decoding for model output.
//!
//! The generative model is asked for JSON but not guaranteed to produce
//! strictly valid JSON. The repair pass tolerates the malformations seen in
//! practice: a markdown code fence around the payload, trailing commas,
//! unquoted object keys and single-quoted strings. String literals are
//! copied verbatim, so repairs never touch actual content.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::extraction::ResumeExtraction;

/// Fields whose values the model emits as JSON-encoded strings
const NESTED_FIELDS: [&str; 5] = ["other", "work", "education", "projects", "achievements"];

/// Decode possibly-malformed JSON into a `serde_json::Value`.
///
/// Strict parsing is attempted first; the repair rewrite only runs when
/// the payload is rejected as-is. Returns an error when the payload is
/// beyond repair.
pub fn loose_json(raw: &str) -> Result<Value> {
    let candidate = strip_code_fence(raw);

    if let Ok(value) = serde_json::from_str(candidate) {
        return Ok(value);
    }

    let repaired = repair(candidate);
    serde_json::from_str(&repaired)
        .with_context(|| format!("Model output is not decodable JSON: {}", raw))
}

/// Decode a raw model response into the typed extraction record.
///
/// Applies the repair pass to the top-level payload and again to each
/// nested field whose value arrived as a JSON-encoded string.
pub fn decode_extraction(raw: &str) -> Result<ResumeExtraction> {
    let mut value = loose_json(raw)?;

    if let Value::Object(map) = &mut value {
        for field in NESTED_FIELDS {
            let encoded = match map.get(field) {
                Some(Value::String(s)) => s.clone(),
                // absent or already decoded
                _ => continue,
            };

            let decoded = loose_json(&encoded)
                .with_context(|| format!("Failed to decode nested field '{}'", field))?;
            map.insert(field.to_string(), decoded);
        }
    }

    serde_json::from_value(value).context("Extraction record has an unexpected shape")
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let body = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return trimmed,
    };

    let body = body.trim_end();
    body.strip_suffix("```").map(str::trim_end).unwrap_or(body)
}

/// Rewrite a malformed payload into parseable JSON.
fn repair(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            // copy string literals verbatim, including escapes
            '"' => {
                out.push('"');
                i += 1;
                while i < chars.len() {
                    let c = chars[i];
                    out.push(c);
                    i += 1;
                    if c == '\\' {
                        if i < chars.len() {
                            out.push(chars[i]);
                            i += 1;
                        }
                    } else if c == '"' {
                        break;
                    }
                }
            }
            // single-quoted string, rewritten as double-quoted
            '\'' => {
                out.push('"');
                i += 1;
                while i < chars.len() {
                    let c = chars[i];
                    i += 1;
                    if c == '\\' {
                        if i < chars.len() {
                            let escaped = chars[i];
                            i += 1;
                            if escaped == '\'' {
                                out.push('\'');
                            } else {
                                out.push('\\');
                                out.push(escaped);
                            }
                        }
                    } else if c == '\'' {
                        break;
                    } else if c == '"' {
                        out.push('\\');
                        out.push('"');
                    } else {
                        out.push(c);
                    }
                }
                out.push('"');
            }
            // trailing comma before a closing brace or bracket
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j >= chars.len() || chars[j] == '}' || chars[j] == ']' {
                    i += 1;
                } else {
                    out.push(',');
                    i += 1;
                }
            }
            // bare word: quote it when it is an object key
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$')
                {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();

                let mut j = i;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }

                if j < chars.len() && chars[j] == ':' {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    // keyword value such as true, false or null
                    out.push_str(&word);
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strict_json_unchanged() {
        let value = loose_json(r#"{"first_name": "Ada", "skills": "math, logic"}"#).unwrap();
        assert_eq!(value["first_name"], "Ada");
    }

    #[test]
    fn repairs_trailing_commas() {
        let value = loose_json(r#"{"skills": "rust, serde", "work": [1, 2, 3,],}"#).unwrap();
        assert_eq!(value["work"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn repairs_unquoted_keys() {
        let value = loose_json(r#"{first_name: "Ada", last_name: "Lovelace"}"#).unwrap();
        assert_eq!(value["last_name"], "Lovelace");
    }

    #[test]
    fn repairs_single_quoted_strings() {
        let value = loose_json(r#"{'email': 'ada@example.com'}"#).unwrap();
        assert_eq!(value["email"], "ada@example.com");
    }

    #[test]
    fn keeps_keywords_bare() {
        let value = loose_json(r#"{flagged: true, note: null,}"#).unwrap();
        assert_eq!(value["flagged"], true);
        assert_eq!(value["note"], Value::Null);
    }

    #[test]
    fn strips_markdown_code_fence() {
        let raw = "```json\n{\"phone\": \"+41 79 000 00 00\"}\n```";
        let value = loose_json(raw).unwrap();
        assert_eq!(value["phone"], "+41 79 000 00 00");
    }

    #[test]
    fn does_not_rewrite_inside_string_literals() {
        let value = loose_json(r#"{"summary": "keys like name: stay, as-is,"}"#).unwrap();
        assert_eq!(value["summary"], "keys like name: stay, as-is,");
    }

    #[test]
    fn rejects_unrecoverable_payloads() {
        assert!(loose_json("resume of Ada Lovelace").is_err());
        assert!(loose_json("{{{").is_err());
    }

    #[test]
    fn decodes_nested_string_encoded_fields() {
        let raw = r#"{
            "first_name": "Ada",
            "other": "{\"Hobbies\":\"chess\"}",
            "work": "[{\"id\":1,\"company\":\"Analytical Engines Ltd\",\"title\":\"Programmer\",\"startDate\":\"1842\",\"endDate\":\"1843\",\"description\":\"Notes on the engine\"}]",
            "education": "[{\"degree\":\"Mathematics\",\"institution\":\"Private tutoring\"}]",
            "projects": "[{\"name\":\"Note G\",\"description\":\"Bernoulli numbers\"}]",
            "achievements": "[]"
        }"#;

        let record = decode_extraction(raw).unwrap();
        assert_eq!(record.first_name.as_deref(), Some("Ada"));
        assert_eq!(
            record.other.unwrap().get("Hobbies").map(String::as_str),
            Some("chess")
        );
        let work = record.work.unwrap();
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].title.as_deref(), Some("Programmer"));
        assert_eq!(record.achievements.unwrap().len(), 0);
    }

    #[test]
    fn decodes_nested_fields_with_minor_malformation() {
        let raw = r#"{
            "projects": "[{name: 'Note G', description: 'Bernoulli numbers',},]"
        }"#;

        let record = decode_extraction(raw).unwrap();
        let projects = record.projects.unwrap();
        assert_eq!(projects[0].name.as_deref(), Some("Note G"));
    }

    #[test]
    fn accepts_already_decoded_nested_fields() {
        let raw = r#"{"work": [{"company": "ACME"}], "skills": "rust"}"#;
        let record = decode_extraction(raw).unwrap();
        assert_eq!(record.work.unwrap()[0].company.as_deref(), Some("ACME"));
    }

    #[test]
    fn nested_decode_failure_is_an_error_not_a_panic() {
        let raw = r#"{"work": "not json at all"}"#;
        let err = decode_extraction(raw).unwrap_err();
        assert!(format!("{:#}", err).contains("work"));
    }
}
