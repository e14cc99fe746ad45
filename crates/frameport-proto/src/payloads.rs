//! Payload types for the well-known message kinds.
//!
//! Field names follow the camelCase JSON the notebook runtime emits.

use serde::{Deserialize, Serialize};

/// Payload of `NOTEBOOK_READY_SIGNAL`.
///
/// # Protocol Flow
///
/// Sent once by the frame when the notebook runtime has booted:
/// 1. Frame loads and initializes the notebook runtime
/// 2. Frame sends ready-signal carrying whatever content it booted with
/// 3. Host either injects its own initial content (`NOTEBOOK_SET_INIT_DATA`)
///    or adopts the content reported here
/// 4. Host releases every message queued while the frame was loading
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyPayload {
    /// Notebook content the frame booted with
    #[serde(default)]
    pub content: String,

    /// Version of the message format the frame speaks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_format_version: Option<u32>,

    /// Identification of the notebook runtime inside the frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeInfo>,
}

/// Notebook runtime identification reported with the ready-signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    /// Runtime name
    pub name: String,
    /// Runtime version string
    pub version: String,
}

/// Payload of `NOTEBOOK_CONTENT_UPDATE` and `NOTEBOOK_SAVE_REQUEST`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPayload {
    /// Full notebook content at the time the message was sent
    pub content: String,
}

impl ContentPayload {
    /// Create a payload for the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }
}

/// Payload of `NOTEBOOK_RESIZE_REQUEST`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizePayload {
    /// Height of the notebook document in CSS pixels
    pub height: f64,

    /// Width of the notebook document in CSS pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// Payload of `NOTEBOOK_SET_INIT_DATA`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitDataPayload {
    /// Content the notebook should load
    pub content: String,

    /// Base URL the notebook resolves relative imports against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ready_payload_tolerates_missing_fields() {
        let payload: ReadyPayload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(payload, ReadyPayload::default());
    }

    #[test]
    fn ready_payload_reads_camel_case() {
        let payload: ReadyPayload = serde_json::from_value(json!({
            "content": "# hi",
            "communicationFormatVersion": 1,
            "runtime": { "name": "starboard-notebook", "version": "0.11.1" }
        }))
        .unwrap();

        assert_eq!(payload.content, "# hi");
        assert_eq!(payload.communication_format_version, Some(1));
        assert_eq!(payload.runtime.map(|r| r.name).as_deref(), Some("starboard-notebook"));
    }

    #[test]
    fn content_payload_requires_content() {
        assert!(serde_json::from_value::<ContentPayload>(json!({})).is_err());
    }

    #[test]
    fn init_data_omits_missing_base_url() {
        let value =
            serde_json::to_value(InitDataPayload { content: "x".into(), base_url: None }).unwrap();
        assert_eq!(value, json!({ "content": "x" }));
    }
}
