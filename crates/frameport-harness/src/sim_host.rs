//! In-memory host page.

use std::{
    collections::{BTreeMap, VecDeque},
    future::Future,
};

use frameport_app::{
    FrameHost, FrameId, HostEvent, InboundEvent, ListenerId, ListenerKind, WindowId,
};
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

/// Errors raised by the simulated page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// The frame handle does not exist
    #[error("unknown {0}")]
    UnknownFrame(FrameId),

    /// Posting to a window failed
    #[error("{0} refused the message")]
    PostRefused(WindowId),
}

/// A simulated frame element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimFrame {
    /// Content window
    pub window: Option<WindowId>,
    /// Current URL
    pub src: Option<String>,
    /// Element attributes
    pub attributes: BTreeMap<String, String>,
    /// Inline styles
    pub styles: BTreeMap<String, String>,
    /// Times the frame was navigated
    pub navigations: usize,
}

/// A message posted to a window.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedMessage {
    /// Receiving window
    pub window: WindowId,
    /// Target origin restriction
    pub target_origin: String,
    /// Message data
    pub data: Value,
}

impl PostedMessage {
    /// The envelope `type` field.
    pub fn kind(&self) -> Option<&str> {
        self.data.get("type").and_then(Value::as_str)
    }
}

/// Host page with frames, windows and listeners kept in memory.
///
/// Events are only delivered while a listener of the matching kind is
/// registered, as on a real page.
#[derive(Debug)]
pub struct SimHost {
    page_location: String,
    frames: BTreeMap<FrameId, SimFrame>,
    child_frame: Option<FrameId>,
    next_id: u64,
    listeners: BTreeMap<ListenerId, ListenerKind>,
    events: VecDeque<HostEvent>,
    posted: Vec<PostedMessage>,
    refusing: Option<WindowId>,
    unloads_cancelled: usize,
}

impl SimHost {
    /// Empty page at the given location.
    pub fn new(page_location: impl Into<String>) -> Self {
        Self {
            page_location: page_location.into(),
            frames: BTreeMap::new(),
            child_frame: None,
            next_id: 1,
            listeners: BTreeMap::new(),
            events: VecDeque::new(),
            posted: Vec::new(),
            refusing: None,
            unloads_cancelled: 0,
        }
    }

    /// Add a frame already nested in the embedding element.
    #[must_use]
    pub fn with_child_frame(mut self, src: Option<&str>) -> Self {
        let frame = self.add_frame(src);
        self.child_frame = Some(frame);
        self
    }

    /// Add a frame elsewhere on the page, e.g. to pass as the preferred frame.
    pub fn add_frame(&mut self, src: Option<&str>) -> FrameId {
        let frame = FrameId(self.allocate());
        let window = WindowId(self.allocate());
        let state = SimFrame {
            window: Some(window),
            src: src.map(ToString::to_string),
            ..SimFrame::default()
        };
        self.frames.insert(frame, state);
        frame
    }

    /// Frame state.
    pub fn frame(&self, frame: FrameId) -> Option<&SimFrame> {
        self.frames.get(&frame)
    }

    /// Content window of a frame.
    pub fn window_of(&self, frame: FrameId) -> Option<WindowId> {
        self.frames.get(&frame).and_then(|f| f.window)
    }

    /// Number of frames on the page.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of registered listeners of a kind.
    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listeners.values().filter(|k| **k == kind).count()
    }

    /// Number of registered listeners of any kind.
    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Messages posted so far.
    pub fn posted(&self) -> &[PostedMessage] {
        &self.posted
    }

    /// Envelope kinds of the messages posted so far, in order.
    pub fn posted_kinds(&self) -> Vec<String> {
        self.posted.iter().filter_map(|m| m.kind().map(ToString::to_string)).collect()
    }

    /// Make posts to `window` fail.
    pub fn refuse_posts_to(&mut self, window: WindowId) {
        self.refusing = Some(window);
    }

    /// Times an unload was cancelled.
    pub fn unloads_cancelled(&self) -> usize {
        self.unloads_cancelled
    }

    /// Queue a message event. Returns `false` if no message listener is
    /// registered, in which case the event is lost.
    pub fn push_message(&mut self, event: InboundEvent) -> bool {
        self.push(HostEvent::Message(event))
    }

    /// Queue a page unload. Returns `false` if nobody listens for it.
    pub fn push_before_unload(&mut self) -> bool {
        self.push(HostEvent::BeforeUnload)
    }

    fn push(&mut self, event: HostEvent) -> bool {
        if self.listener_count(kind_of(&event)) == 0 {
            trace!(?event, "no listener; dropping event");
            return false;
        }
        self.events.push_back(event);
        true
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn frame_mut(&mut self, frame: FrameId) -> Result<&mut SimFrame, SimError> {
        self.frames.get_mut(&frame).ok_or(SimError::UnknownFrame(frame))
    }
}

fn kind_of(event: &HostEvent) -> ListenerKind {
    match event {
        HostEvent::Message(_) => ListenerKind::Message,
        HostEvent::BeforeUnload => ListenerKind::BeforeUnload,
    }
}

impl FrameHost for SimHost {
    type Error = SimError;

    fn page_location(&self) -> String {
        self.page_location.clone()
    }

    fn find_child_frame(&self) -> Option<FrameId> {
        self.child_frame
    }

    fn create_frame(&mut self) -> Result<FrameId, SimError> {
        let frame = self.add_frame(None);
        self.child_frame = Some(frame);
        Ok(frame)
    }

    fn frame_window(&self, frame: FrameId) -> Option<WindowId> {
        self.window_of(frame)
    }

    fn frame_src(&self, frame: FrameId) -> Option<String> {
        self.frames.get(&frame).and_then(|f| f.src.clone())
    }

    fn navigate(&mut self, frame: FrameId, url: &str) -> Result<(), SimError> {
        let frame = self.frame_mut(frame)?;
        frame.src = Some(url.to_string());
        frame.navigations += 1;
        Ok(())
    }

    fn set_attribute(&mut self, frame: FrameId, name: &str, value: &str) -> Result<(), SimError> {
        self.frame_mut(frame)?.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_style(&mut self, frame: FrameId, property: &str, value: &str) -> Result<(), SimError> {
        self.frame_mut(frame)?.styles.insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.allocate());
        self.listeners.insert(id, kind);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn post_message(
        &mut self,
        window: WindowId,
        data: Value,
        target_origin: &str,
    ) -> Result<(), SimError> {
        if self.refusing == Some(window) {
            return Err(SimError::PostRefused(window));
        }
        self.posted.push(PostedMessage { window, target_origin: target_origin.to_string(), data });
        Ok(())
    }

    fn cancel_unload(&mut self) {
        self.unloads_cancelled += 1;
    }

    fn next_event(&mut self) -> impl Future<Output = Option<HostEvent>> {
        // Listeners removed after an event was queued still swallow it.
        let mut next = None;
        while let Some(event) = self.events.pop_front() {
            if self.listener_count(kind_of(&event)) > 0 {
                next = Some(event);
                break;
            }
        }
        std::future::ready(next)
    }
}
