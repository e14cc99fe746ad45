//! Transcript parsing.
//!
//! One JSON object per line:
//!
//! ```text
//! {"origin": "https://nb.example", "data": {"type": "NOTEBOOK_READY_SIGNAL", "payload": {}}}
//! {"origin": "https://nb.example", "foreign": true, "data": {...}}
//! {"unload": true}
//! ```
//!
//! `foreign` marks a message sent by some other window on the page. Blank
//! lines are skipped.

use serde::Deserialize;
use serde_json::Value;

use crate::ReplayError;

/// One step of a transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A message event
    Message {
        /// Reported sender origin
        origin: String,
        /// Sent by a window other than the notebook frame
        foreign: bool,
        /// Message data
        data: Value,
    },
    /// The page is about to unload
    Unload,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    foreign: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    unload: bool,
}

/// Parse a transcript into `(line number, entry)` pairs.
pub fn parse_transcript(text: &str) -> Result<Vec<(usize, Entry)>, ReplayError> {
    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let raw: RawEntry = serde_json::from_str(line)
            .map_err(|source| ReplayError::Parse { line: number, source })?;
        let entry = if raw.unload {
            Entry::Unload
        } else {
            let origin = raw.origin.ok_or(ReplayError::MissingOrigin { line: number })?;
            Entry::Message { origin, foreign: raw.foreign, data: raw.data }
        };
        entries.push((number, entry));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_messages_and_unloads() {
        let text = concat!(
            r#"{"origin": "https://nb.example", "data": {"type": "X", "payload": {}}}"#,
            "\n\n",
            r#"{"origin": "https://evil.example", "foreign": true, "data": null}"#,
            "\n",
            r#"{"unload": true}"#,
            "\n",
        );

        let entries = parse_transcript(text).expect("valid transcript");

        assert_eq!(
            entries,
            vec![
                (1, Entry::Message {
                    origin: "https://nb.example".to_string(),
                    foreign: false,
                    data: json!({ "type": "X", "payload": {} }),
                }),
                (3, Entry::Message {
                    origin: "https://evil.example".to_string(),
                    foreign: true,
                    data: Value::Null,
                }),
                (4, Entry::Unload),
            ]
        );
    }

    #[test]
    fn reports_line_of_invalid_json() {
        let err = parse_transcript("{\"unload\": true}\nnot json\n").expect_err("invalid");
        assert!(matches!(err, ReplayError::Parse { line: 2, .. }));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = parse_transcript(r#"{"origin": "x", "sender": 3}"#).expect_err("invalid");
        assert!(matches!(err, ReplayError::Parse { line: 1, .. }));
    }

    #[test]
    fn message_requires_origin() {
        let err = parse_transcript(r#"{"data": {"type": "X"}}"#).expect_err("invalid");
        assert!(matches!(err, ReplayError::MissingOrigin { line: 1 }));
    }
}
