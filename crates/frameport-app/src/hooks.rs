//! Host callbacks.
//!
//! Every hook has a no-op default, so a host implements only what it cares
//! about.

use std::future::Future;

use frameport_proto::{ContentPayload, InboundMessage, ReadyPayload};
use futures::{FutureExt, future::BoxFuture};
use thiserror::Error;

/// Failure reported by a save hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("save failed: {0}")]
pub struct SaveError(pub String);

/// Result of a save hook.
///
/// Only a save that reports exactly `true` marks the content as saved.
pub enum SaveOutcome {
    /// The hook did not report anything
    Unreported,
    /// Known immediately
    Immediate(bool),
    /// Known once the future completes
    Deferred(BoxFuture<'static, Result<bool, SaveError>>),
}

impl SaveOutcome {
    /// Wrap a future that reports whether the save succeeded.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<bool, SaveError>> + Send + 'static,
    {
        Self::Deferred(future.boxed())
    }

    /// Whether the content was saved, if that is already known.
    ///
    /// `None` only for a deferred outcome.
    pub fn settled(&self) -> Option<bool> {
        match self {
            Self::Unreported => Some(false),
            Self::Immediate(saved) => Some(*saved),
            Self::Deferred(_) => None,
        }
    }

    /// Wait for the outcome and collapse it to "saved or not".
    pub async fn confirmed(self) -> bool {
        match self {
            Self::Deferred(future) => matches!(future.await, Ok(true)),
            settled => settled.settled().unwrap_or(false),
        }
    }
}

impl From<bool> for SaveOutcome {
    fn from(saved: bool) -> Self {
        Self::Immediate(saved)
    }
}

impl std::fmt::Debug for SaveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreported => f.write_str("Unreported"),
            Self::Immediate(saved) => f.debug_tuple("Immediate").field(saved).finish(),
            Self::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

/// Callbacks observing the embedded notebook.
pub trait EmbedHooks {
    /// The frame completed the readiness handshake.
    fn on_ready(&mut self, _payload: &ReadyPayload) {}

    /// The notebook asked to be saved. Return whether the save succeeded.
    fn on_save(&mut self, _payload: &ContentPayload) -> SaveOutcome {
        SaveOutcome::Unreported
    }

    /// The notebook content changed.
    fn on_content_update(&mut self, _payload: &ContentPayload) {}

    /// Any valid message from the frame, after kind-specific handling.
    fn on_message(&mut self, _message: &InboundMessage) {}

    /// The unsaved-changes flag flipped.
    fn on_dirty_change(&mut self, _dirty: bool) {}
}

/// Hooks that ignore everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl EmbedHooks for NoopHooks {}
