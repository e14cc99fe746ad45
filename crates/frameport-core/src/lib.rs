//! Frameport protocol core logic
//!
//! Pure state machine logic for embedding a notebook frame in a host page,
//! completely decoupled from the browser. Nothing in this crate touches a
//! window, a DOM element or an event loop.
//!
//! # Architecture
//!
//! The [`ProtocolEngine`] accepts inbound events and outbound send requests
//! and returns declarative [`EngineAction`]s describing what should happen:
//! post a message, resize the frame, notify the host. A runtime (see
//! `frameport-app`) or a test interprets those actions.
//!
//! The two places where the protocol has to wait (deferred initial content
//! and deferred save acknowledgments) are split into a request action and a
//! follow-up method, so the engine itself never blocks.
//!
//! # Components
//!
//! - [`dirty`]: Dirty-state tracker (mirrored vs saved content)
//! - [`gate`]: Single-resolution readiness gate
//! - [`endpoint`]: Embedding boundary and origin validation
//! - [`config`]: Option resolution chain
//! - [`engine`]: Protocol engine (dispatch, outbound queue, handshake)
//! - [`error`]: Configuration error types

pub mod config;
pub mod dirty;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod gate;

pub use config::{
    Ambient, AttributeSource, EmbedOptions, InitialContent, NoAttributes, ResolvedConfig,
};
pub use dirty::DirtyTracker;
pub use endpoint::{Endpoint, Rejection, WindowId};
pub use engine::{EngineAction, InboundEvent, ProtocolEngine, ReadyPhase, UnloadDecision};
pub use error::ConfigError;
pub use gate::ReadinessGate;
