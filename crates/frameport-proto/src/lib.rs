//! Wire format for the notebook frame embedding protocol.
//!
//! The host page and the embedded notebook frame talk through the platform's
//! cross-window messaging channel. Every message is a JSON-compatible envelope
//! `{ "type": string, "payload": object }`. The `type` selects one of a small
//! set of well-known kinds; anything else is carried verbatim as a custom
//! message so applications can extend the protocol without touching this
//! crate.
//!
//! # Message flow
//!
//! ```text
//!   frame ──NOTEBOOK_READY_SIGNAL────────> host
//!   host  ──NOTEBOOK_SET_INIT_DATA───────> frame   (only with initial content)
//!   frame ──NOTEBOOK_CONTENT_UPDATE──────> host
//!   frame ──NOTEBOOK_SAVE_REQUEST────────> host
//!   frame ──NOTEBOOK_RESIZE_REQUEST──────> host
//! ```
//!
//! Decoding never trusts the sender: unknown kinds become
//! [`InboundMessage::Custom`], and a known kind with a malformed payload is a
//! [`ProtocolError::InvalidPayload`] rather than a partially-filled value.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod envelope;
pub mod errors;
pub mod kinds;
pub mod message;
pub mod payloads;

pub use envelope::Envelope;
pub use errors::{ProtocolError, Result};
pub use kinds::MessageKind;
pub use message::{InboundMessage, OutboundMessage};
pub use payloads::{ContentPayload, InitDataPayload, ReadyPayload, ResizePayload, RuntimeInfo};
