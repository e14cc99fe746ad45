//! The `{ type, payload }` envelope shared by every message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ProtocolError, Result};

/// Untyped message envelope.
///
/// This is the shape that crosses the window boundary. Typed views live in
/// [`crate::message`]; custom application messages stay in this form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Wire `type` field
    #[serde(rename = "type")]
    pub kind: String,

    /// Kind-specific payload; `null` when absent
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    /// Create an envelope from a kind and payload.
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self { kind: kind.into(), payload }
    }

    /// Parse raw message data into an envelope.
    ///
    /// # Errors
    ///
    /// - `Empty` if the data is falsy (see [`is_empty_data`])
    /// - `Malformed` if it is not an object with a string `type`
    pub fn from_data(data: &Value) -> Result<Self> {
        if is_empty_data(data) {
            return Err(ProtocolError::Empty);
        }

        let Value::Object(fields) = data else {
            return Err(ProtocolError::Malformed(format!("expected object, got {}", type_name(data))));
        };

        let kind = match fields.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => {
                return Err(ProtocolError::Malformed(format!(
                    "`type` must be a string, got {}",
                    type_name(other)
                )));
            },
            None => return Err(ProtocolError::Malformed("missing `type` field".to_string())),
        };

        let payload = fields.get("payload").cloned().unwrap_or(Value::Null);
        Ok(Self { kind, payload })
    }

    /// Convert the envelope back into raw message data.
    pub fn into_data(self) -> Value {
        let mut fields = serde_json::Map::with_capacity(2);
        fields.insert("type".to_string(), Value::String(self.kind));
        fields.insert("payload".to_string(), self.payload);
        Value::Object(fields)
    }
}

/// Whether raw message data counts as "no data".
///
/// Mirrors the falsy check a browser host applies to `MessageEvent.data`:
/// `null`, `false`, `0` and `""` carry nothing worth dispatching.
pub fn is_empty_data(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
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
