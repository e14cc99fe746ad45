//! Replay recorded frame messages through the embedding runtime.
//!
//! A transcript is a JSON-lines file; each line is a message the frame sent
//! (or a page unload). The replay drives an [`Embed`](frameport_app::Embed)
//! over the simulated page and reports what the host observed: messages
//! posted to the frame and the hook calls that fired.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod replay;
pub mod transcript;

pub use error::ReplayError;
pub use replay::{Record, Replay};
pub use transcript::{Entry, parse_transcript};
