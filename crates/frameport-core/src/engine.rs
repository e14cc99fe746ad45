//! Protocol engine for one embedded notebook frame.
//!
//! # Architecture: Action-Based State Machine
//!
//! - Methods take events and return `Vec<EngineAction>`
//! - The runtime executes actions (post messages, resize, call hooks)
//! - Waiting happens outside: the engine asks for initial content with
//!   [`EngineAction::LoadInitialContent`] and continues in
//!   [`ProtocolEngine::complete_ready`]; save results come back through
//!   [`ProtocolEngine::acknowledge_save`]
//!
//! # Readiness
//!
//! ```text
//! ┌────────────────┐ ready-signal ┌────────────────┐ content ┌───────┐
//! │ AwaitingSignal │─────────────>│ LoadingContent │────────>│ Ready │
//! └────────────────┘              └────────────────┘         └───────┘
//!         │                  (deferred initial content only)     ^
//!         └──────────────────────────────────────────────────────┘
//!                  ready-signal, content immediately available
//! ```
//!
//! Outbound messages issued before `Ready` wait in a FIFO queue and are
//! flushed, in issuance order, on the transition. Only the first ready-signal
//! counts; later ones change nothing.
//!
//! # Inbound pipeline
//!
//! 1. Source window must be the endpoint's frame
//! 2. Origin must equal the expected origin
//! 3. Data must be non-empty
//! 4. Dispatch by kind
//! 5. [`EngineAction::NotifyMessage`], whatever the kind
//!
//! Messages failing 1-3 (or failing to decode) are dropped without any action.

use std::collections::VecDeque;

use frameport_proto::{
    ContentPayload, InboundMessage, OutboundMessage, ProtocolError, ReadyPayload, ResizePayload,
};
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::{
    DirtyTracker, Endpoint, InitialContent, ReadinessGate, Rejection, ResolvedConfig, WindowId,
};

/// Pixels added to the reported content height when resizing the frame.
pub const RESIZE_HEIGHT_OFFSET: f64 = 2.0;

/// A message delivered by the platform's cross-window messaging.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Window that posted the message
    pub source: Option<WindowId>,
    /// Origin of the posting window
    pub origin: String,
    /// Message data
    pub data: Value,
}

impl InboundEvent {
    /// Create an event.
    pub fn new(source: Option<WindowId>, origin: impl Into<String>, data: Value) -> Self {
        Self { source, origin: origin.into(), data }
    }
}

/// Actions returned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineAction {
    /// Post this message to the frame window
    PostMessage {
        /// Target window
        window: WindowId,
        /// Message to post
        message: OutboundMessage,
    },

    /// Set the frame height (CSS pixels)
    ResizeFrame {
        /// Target height, offset already applied
        height: f64,
    },

    /// Resolve the configured initial content and pass it to
    /// [`ProtocolEngine::complete_ready`]
    LoadInitialContent,

    /// The frame is ready
    NotifyReady(ReadyPayload),

    /// The frame reported new content
    NotifyContentUpdate(ContentPayload),

    /// The frame asked for a save; report the outcome through
    /// [`ProtocolEngine::acknowledge_save`]
    RequestSave(ContentPayload),

    /// A valid message was observed
    NotifyMessage(InboundMessage),

    /// The dirty flag changed to this value
    DirtyChanged(bool),
}

/// Progress of the readiness handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyPhase {
    /// No ready-signal received yet
    AwaitingSignal,
    /// Ready-signal received, waiting for deferred initial content
    LoadingContent(ReadyPayload),
    /// Handshake complete
    Ready,
}

/// Answer to a page unload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadDecision {
    /// Let navigation proceed
    Allow,
    /// Ask the user to confirm; there are unsaved changes
    Block,
}

/// Protocol engine state machine.
///
/// Owns the endpoint, the mirrored/saved content and the outbound queue of
/// exactly one embedded frame.
#[derive(Debug)]
pub struct ProtocolEngine {
    config: ResolvedConfig,
    endpoint: Option<Endpoint>,
    tracker: DirtyTracker,
    gate: ReadinessGate<ReadyPayload>,
    phase: ReadyPhase,
    outbox: VecDeque<OutboundMessage>,
}

impl ProtocolEngine {
    /// Create an engine with no endpoint. All inbound messages are rejected
    /// until [`bind`](Self::bind) is called.
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            config,
            endpoint: None,
            tracker: DirtyTracker::new(),
            gate: ReadinessGate::new(),
            phase: ReadyPhase::AwaitingSignal,
            outbox: VecDeque::new(),
        }
    }

    /// Attach the engine to an endpoint.
    pub fn bind(&mut self, endpoint: Endpoint) {
        debug!(
            window = ?endpoint.window(),
            expected_origin = ?endpoint.expected_origin(),
            "binding protocol engine to frame"
        );
        self.endpoint = Some(endpoint);
    }

    /// Configuration the engine was created with.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Endpoint, once bound.
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Current handshake phase.
    pub fn phase(&self) -> &ReadyPhase {
        &self.phase
    }

    /// Whether the handshake has completed.
    pub fn is_ready(&self) -> bool {
        self.phase == ReadyPhase::Ready
    }

    /// Readiness gate; await [`ReadinessGate::wait`] to observe the ready
    /// payload.
    pub fn readiness(&self) -> &ReadinessGate<ReadyPayload> {
        &self.gate
    }

    /// Number of outbound messages waiting for readiness.
    pub fn queued(&self) -> usize {
        self.outbox.len()
    }

    /// Mirrored notebook content.
    pub fn content(&self) -> &str {
        self.tracker.mirrored()
    }

    /// Last content known to be saved.
    pub fn saved_content(&self) -> &str {
        self.tracker.saved()
    }

    /// Whether there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    /// Initial content to resolve for [`EngineAction::LoadInitialContent`].
    pub fn initial_content(&self) -> Option<&InitialContent> {
        self.config.notebook_content.as_ref()
    }

    /// Queue a message for the frame.
    ///
    /// Delivered immediately once the frame is ready, otherwise held until
    /// the handshake completes. Never dropped, never acknowledged.
    pub fn send(&mut self, message: OutboundMessage) -> Vec<EngineAction> {
        let mut actions = Vec::new();
        self.enqueue(message, &mut actions);
        actions
    }

    /// Process a message event from the platform.
    pub fn handle_inbound(&mut self, event: InboundEvent) -> Vec<EngineAction> {
        let verdict = match &self.endpoint {
            Some(endpoint) => endpoint.validate(event.source, &event.origin),
            None => Err(Rejection::ForeignSource { source: event.source }),
        };
        if let Err(rejection) = verdict {
            self.log_rejection(&rejection);
            return Vec::new();
        }

        let message = match InboundMessage::decode(&event.data) {
            Ok(message) => message,
            Err(ProtocolError::Empty) => {
                self.log_rejection(&Rejection::EmptyPayload);
                return Vec::new();
            },
            Err(err) => {
                debug!(error = %err, "dropping undecodable frame message");
                return Vec::new();
            },
        };

        let mut actions = Vec::new();
        match &message {
            InboundMessage::ResizeRequest(payload) => self.on_resize(payload, &mut actions),
            InboundMessage::ReadySignal(payload) => self.on_ready_signal(payload, &mut actions),
            InboundMessage::ContentUpdate(payload) => {
                push_transition(self.tracker.set_mirrored(payload.content.as_str()), &mut actions);
                actions.push(EngineAction::NotifyContentUpdate(payload.clone()));
            },
            InboundMessage::SaveRequest(payload) => {
                push_transition(self.tracker.set_mirrored(payload.content.as_str()), &mut actions);
                actions.push(EngineAction::RequestSave(payload.clone()));
            },
            InboundMessage::Custom(envelope) => {
                trace!(kind = %envelope.kind, "custom frame message");
            },
        }

        actions.push(EngineAction::NotifyMessage(message));
        actions
    }

    /// Finish a handshake that was waiting on deferred initial content.
    ///
    /// Does nothing unless the engine is in [`ReadyPhase::LoadingContent`].
    pub fn complete_ready(&mut self, content: String) -> Vec<EngineAction> {
        let mut actions = Vec::new();
        match std::mem::replace(&mut self.phase, ReadyPhase::AwaitingSignal) {
            ReadyPhase::LoadingContent(payload) => {
                self.finish_ready(payload, Some(content), &mut actions);
            },
            phase => {
                debug!(?phase, "initial content arrived outside of handshake");
                self.phase = phase;
            },
        }
        actions
    }

    /// Report the outcome of a save requested by the frame.
    ///
    /// Only a successful save of `content` advances the saved content.
    pub fn acknowledge_save(&mut self, content: String, saved: bool) -> Vec<EngineAction> {
        let mut actions = Vec::new();
        if saved {
            push_transition(self.tracker.set_saved(content), &mut actions);
        } else {
            debug!("save not confirmed; keeping previous saved content");
        }
        actions
    }

    /// Acknowledge a save performed by the host outside the protocol.
    ///
    /// Without content, the current mirrored content is taken as saved.
    pub fn mark_saved(&mut self, content: Option<String>) -> Vec<EngineAction> {
        let mut actions = Vec::new();
        push_transition(self.tracker.mark_saved(content), &mut actions);
        actions
    }

    /// Decide whether a page unload should be interrupted.
    pub fn before_unload(&self) -> UnloadDecision {
        if self.config.prevent_navigation_with_unsaved_changes && self.tracker.is_dirty() {
            UnloadDecision::Block
        } else {
            UnloadDecision::Allow
        }
    }

    fn on_resize(&self, payload: &ResizePayload, actions: &mut Vec<EngineAction>) {
        if !self.config.auto_resize {
            trace!(height = payload.height, "auto-resize disabled; ignoring resize request");
            return;
        }
        actions.push(EngineAction::ResizeFrame { height: payload.height + RESIZE_HEIGHT_OFFSET });
    }

    fn on_ready_signal(&mut self, payload: &ReadyPayload, actions: &mut Vec<EngineAction>) {
        if self.phase != ReadyPhase::AwaitingSignal {
            debug!(phase = ?self.phase, "ignoring repeated ready signal");
            return;
        }

        match &self.config.notebook_content {
            Some(InitialContent::Ready(content)) => {
                let content = content.clone();
                self.finish_ready(payload.clone(), Some(content), actions);
            },
            Some(InitialContent::Deferred(_)) => {
                debug!("ready signal received; waiting for initial content");
                self.phase = ReadyPhase::LoadingContent(payload.clone());
                actions.push(EngineAction::LoadInitialContent);
            },
            None => self.finish_ready(payload.clone(), None, actions),
        }
    }

    fn finish_ready(
        &mut self,
        payload: ReadyPayload,
        injected: Option<String>,
        actions: &mut Vec<EngineAction>,
    ) {
        let content = match injected {
            Some(content) => {
                let init = OutboundMessage::init_data(content.clone(), self.config.base_url.clone());
                self.enqueue(init, actions);
                content
            },
            None => payload.content.clone(),
        };

        push_transition(self.tracker.reset_baseline(content), actions);
        self.gate.resolve(payload.clone());
        self.phase = ReadyPhase::Ready;

        info!(
            queued = self.outbox.len(),
            runtime = ?payload.runtime.as_ref().map(|r| r.name.as_str()),
            "notebook frame ready"
        );

        self.flush(actions);
        actions.push(EngineAction::NotifyReady(payload));
    }

    fn enqueue(&mut self, message: OutboundMessage, actions: &mut Vec<EngineAction>) {
        match self.ready_window() {
            Some(window) => actions.push(EngineAction::PostMessage { window, message }),
            None => {
                trace!(kind = message.kind(), "frame not ready; queueing message");
                self.outbox.push_back(message);
            },
        }
    }

    fn flush(&mut self, actions: &mut Vec<EngineAction>) {
        let Some(window) = self.ready_window() else {
            return;
        };
        actions.extend(
            self.outbox.drain(..).map(|message| EngineAction::PostMessage { window, message }),
        );
    }

    fn ready_window(&self) -> Option<WindowId> {
        if self.phase != ReadyPhase::Ready {
            return None;
        }
        self.endpoint.as_ref().and_then(Endpoint::window)
    }

    fn log_rejection(&self, rejection: &Rejection) {
        match rejection {
            Rejection::ForeignSource { source } => {
                trace!(?source, "ignoring message from foreign window");
            },
            Rejection::OriginMismatch { origin } => {
                debug!(
                    %origin,
                    expected = ?self.endpoint.as_ref().and_then(Endpoint::expected_origin),
                    "ignoring message from unexpected origin"
                );
            },
            Rejection::NoExpectedOrigin => {
                warn!(
                    src = %self.config.src,
                    "rejecting frame message: notebook source has no resolvable origin"
                );
            },
            Rejection::EmptyPayload => debug!("ignoring frame message without data"),
        }
    }
}

fn push_transition(transition: Option<bool>, actions: &mut Vec<EngineAction>) {
    if let Some(dirty) = transition {
        debug!(dirty, "unsaved changes status changed");
        actions.push(EngineAction::DirtyChanged(dirty));
    }
}
