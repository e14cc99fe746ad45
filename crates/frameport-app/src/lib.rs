//! Application layer for Frameport
//!
//! Wires the pure [`frameport_core::ProtocolEngine`] to a host page. The
//! platform is reached only through traits, so the same runtime drives a
//! browser binding in production and the in-memory host in tests.
//!
//! # Components
//!
//! - [`FrameHost`]: Trait for platform-specific frame and window I/O
//! - [`EmbedHooks`]: Host callbacks observing protocol transitions
//! - [`FrameManager`]: Frame lifecycle (attach, configure, listen, dispose)
//! - [`Embed`]: Runtime executing engine actions and awaiting deferred values

mod embed;
mod hooks;
mod host;
mod lifecycle;

pub use embed::Embed;
pub use frameport_core::{
    EmbedOptions, Endpoint, InboundEvent, InitialContent, ResolvedConfig, UnloadDecision, WindowId,
};
pub use hooks::{EmbedHooks, NoopHooks, SaveError, SaveOutcome};
pub use host::{FrameHost, FrameId, HostEvent, ListenerId, ListenerKind};
pub use lifecycle::FrameManager;
