//! Protocol error types.

use thiserror::Error;

use crate::MessageKind;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while decoding or encoding protocol messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The message carried no data at all (null, false, zero or empty string).
    #[error("message carries no data")]
    Empty,

    /// The data is not a `{ type, payload }` envelope.
    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// A well-known kind arrived with a payload that does not match its shape.
    #[error("invalid {kind} payload: {source}")]
    InvalidPayload {
        /// Kind named by the envelope
        kind: MessageKind,
        /// Underlying deserialization failure
        #[source]
        source: serde_json::Error,
    },

    /// An outbound payload could not be converted to JSON.
    #[error("failed to encode {kind} message: {source}")]
    Encode {
        /// Kind being encoded
        kind: String,
        /// Underlying serialization failure
        #[source]
        source: serde_json::Error,
    },
}
