//! Host trait for abstracting the platform.
//!
//! The [`FrameHost`] trait decouples the runtime from any particular page
//! implementation. A browser binding implements it on top of the DOM; the
//! harness implements it in memory.

use std::{fmt, future::Future};

use frameport_core::{InboundEvent, WindowId};
use serde_json::Value;

/// Opaque handle to a frame element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Handle to a listener registered with the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Page-level events the runtime can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Cross-window messages
    Message,
    /// Page about to unload
    BeforeUnload,
}

/// An event delivered to a registered listener.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A cross-window message arrived
    Message(InboundEvent),
    /// The page is about to unload
    BeforeUnload,
}

/// Abstracts the host page: frame elements, windows and page listeners.
pub trait FrameHost {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Absolute URL of the host page.
    fn page_location(&self) -> String;

    /// Frame element already present as a child of the embedding element.
    fn find_child_frame(&self) -> Option<FrameId>;

    /// Create a frame element as a child of the embedding element.
    fn create_frame(&mut self) -> Result<FrameId, Self::Error>;

    /// Content window of a frame, if it has one.
    fn frame_window(&self, frame: FrameId) -> Option<WindowId>;

    /// URL the frame currently points at.
    fn frame_src(&self, frame: FrameId) -> Option<String>;

    /// Point the frame at a new URL. Reloads the frame.
    fn navigate(&mut self, frame: FrameId, url: &str) -> Result<(), Self::Error>;

    /// Set an attribute on the frame element.
    fn set_attribute(&mut self, frame: FrameId, name: &str, value: &str) -> Result<(), Self::Error>;

    /// Set an inline style property on the frame element.
    fn set_style(&mut self, frame: FrameId, property: &str, value: &str) -> Result<(), Self::Error>;

    /// Apply a new frame height.
    ///
    /// The default turns scrolling off and sets the height style; hosts
    /// delegating to a resizing library override this.
    fn resize_frame(&mut self, frame: FrameId, height: f64) -> Result<(), Self::Error> {
        self.set_attribute(frame, "scrolling", "no")?;
        self.set_style(frame, "height", &format!("{height}px"))
    }

    /// Register a page listener.
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    /// Remove a listener previously registered with
    /// [`add_listener`](Self::add_listener).
    fn remove_listener(&mut self, id: ListenerId);

    /// Post message data to a window.
    fn post_message(
        &mut self,
        window: WindowId,
        data: Value,
        target_origin: &str,
    ) -> Result<(), Self::Error>;

    /// Cancel the unload currently being dispatched.
    fn cancel_unload(&mut self);

    /// Next event for a registered listener.
    ///
    /// Returns `None` once the page is gone. Must be cancel-safe: the runtime
    /// drops this future when a save acknowledgment completes first.
    fn next_event(&mut self) -> impl Future<Output = Option<HostEvent>>;
}
