//! Deterministic simulation harness for the embedding protocol.
//!
//! In-memory implementations of the host page ([`SimHost`]) and of the host
//! callbacks ([`RecordingHooks`]) so the full runtime can be exercised
//! without a browser.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod hooks;
pub mod sim_host;

use frameport_app::{Embed, EmbedOptions, InboundEvent};
use frameport_core::{Ambient, NoAttributes, config};
use serde_json::{Value, json};

pub use hooks::{HookCall, RecordingHooks};
pub use sim_host::{PostedMessage, SimError, SimFrame, SimHost};

/// Embed running over the simulated page.
pub type SimEmbed = Embed<SimHost, RecordingHooks>;

/// Location of the simulated host page.
pub const PAGE_LOCATION: &str = "https://host.example/docs/page.html";

/// Notebook source used by [`sim_embed`].
pub const NOTEBOOK_SRC: &str = "https://nb.example/dist/index.html";

/// Origin of [`NOTEBOOK_SRC`].
pub const NOTEBOOK_ORIGIN: &str = "https://nb.example";

/// Embed over a fresh [`SimHost`], with `src` defaulting to
/// [`NOTEBOOK_SRC`]. Not started.
pub fn sim_embed(options: EmbedOptions) -> SimEmbed {
    sim_embed_on(SimHost::new(PAGE_LOCATION), options)
}

/// Like [`sim_embed`], over a prepared host.
pub fn sim_embed_on(host: SimHost, mut options: EmbedOptions) -> SimEmbed {
    if options.src.is_none() {
        options.src = Some(NOTEBOOK_SRC.to_string());
    }
    let config = config::resolve(&options, &NoAttributes, &Ambient::default());
    Embed::new(host, RecordingHooks::new(), config)
}

/// Message event from the embed's own frame, at the notebook origin.
pub fn frame_event(embed: &SimEmbed, kind: &str, payload: Value) -> InboundEvent {
    let window = embed.frames().frame().and_then(|frame| embed.host().window_of(frame));
    InboundEvent::new(window, NOTEBOOK_ORIGIN, json!({ "type": kind, "payload": payload }))
}

/// `NOTEBOOK_READY_SIGNAL` from the frame.
pub fn ready_signal(embed: &SimEmbed, content: &str) -> InboundEvent {
    frame_event(embed, "NOTEBOOK_READY_SIGNAL", json!({ "content": content }))
}

/// `NOTEBOOK_CONTENT_UPDATE` from the frame.
pub fn content_update(embed: &SimEmbed, content: &str) -> InboundEvent {
    frame_event(embed, "NOTEBOOK_CONTENT_UPDATE", json!({ "content": content }))
}

/// `NOTEBOOK_SAVE_REQUEST` from the frame.
pub fn save_request(embed: &SimEmbed, content: &str) -> InboundEvent {
    frame_event(embed, "NOTEBOOK_SAVE_REQUEST", json!({ "content": content }))
}
