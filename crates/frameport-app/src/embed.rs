//! Async runtime for one embedded notebook.
//!
//! [`Embed`] owns the host, the hooks, the frame manager and the protocol
//! engine. It feeds platform events to the engine and executes the actions
//! that come back, including the two that need waiting: deferred initial
//! content and deferred save acknowledgments.

use std::{collections::VecDeque, future::Future, pin::pin};

use frameport_core::{
    EngineAction, InboundEvent, ProtocolEngine, ResolvedConfig, UnloadDecision,
};
use frameport_proto::{ContentPayload, OutboundMessage, ReadyPayload};
use futures::{
    FutureExt, StreamExt,
    future::{self, BoxFuture, Either},
    stream::FuturesUnordered,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{EmbedHooks, FrameHost, FrameId, FrameManager, HostEvent};

/// Target origin used when posting to the frame. The frame's origin is not
/// known to be stable across redirects, and the content is not secret.
const POST_TARGET_ORIGIN: &str = "*";

struct SaveAck {
    content: String,
    saved: bool,
}

enum Step {
    Event(Option<HostEvent>),
    Save(Option<SaveAck>),
}

/// Runtime for one embedded notebook frame.
pub struct Embed<H: FrameHost, K: EmbedHooks> {
    host: H,
    hooks: K,
    engine: ProtocolEngine,
    frames: FrameManager,
    pending_saves: FuturesUnordered<BoxFuture<'static, SaveAck>>,
}

impl<H: FrameHost, K: EmbedHooks> Embed<H, K> {
    /// Create an embed. Nothing touches the page until
    /// [`start`](Self::start).
    pub fn new(host: H, hooks: K, config: ResolvedConfig) -> Self {
        Self {
            host,
            hooks,
            engine: ProtocolEngine::new(config),
            frames: FrameManager::new(),
            pending_saves: FuturesUnordered::new(),
        }
    }

    /// Attach to the frame and start listening.
    ///
    /// The frame is fixed by the first successful call. Calling again after
    /// [`dispose`](Self::dispose) re-registers listeners on that same frame
    /// without reloading it, whatever `preferred` says; the endpoint and
    /// readiness state are kept.
    pub fn start(&mut self, preferred: Option<FrameId>) -> Result<(), H::Error> {
        let endpoint = self.frames.attach(&mut self.host, self.engine.config(), preferred)?;
        if self.engine.endpoint().is_none() {
            self.engine.bind(endpoint);
        }
        Ok(())
    }

    /// Remove every listener installed by [`start`](Self::start).
    ///
    /// Safe to call repeatedly or before `start`. Messages already posted to
    /// the frame are not recalled.
    pub fn dispose(&mut self) {
        self.frames.dispose(&mut self.host);
    }

    /// Send a message to the frame, once it is ready.
    pub fn send(&mut self, message: OutboundMessage) {
        let actions = self.engine.send(message);
        self.execute_now(actions);
    }

    /// Send an application-defined message, passed through verbatim.
    pub fn send_custom(&mut self, kind: impl Into<String>, payload: Value) {
        self.send(OutboundMessage::custom(kind, payload));
    }

    /// Acknowledge a save made by the host. Without content, the current
    /// content is taken as saved.
    pub fn mark_saved(&mut self, content: Option<String>) {
        let actions = self.engine.mark_saved(content);
        self.execute_now(actions);
    }

    /// Answer a page unload, cancelling it while there are unsaved changes
    /// and the navigation guard is enabled.
    pub fn before_unload(&mut self) -> UnloadDecision {
        let decision = self.engine.before_unload();
        if decision == UnloadDecision::Block {
            debug!("blocking navigation with unsaved changes");
            self.host.cancel_unload();
        }
        decision
    }

    /// Wait until the frame is ready.
    pub fn ready(&self) -> impl Future<Output = ReadyPayload> + Send + 'static {
        self.engine.readiness().wait()
    }

    /// Handle one page event.
    pub async fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Message(event) => self.handle_message(event).await,
            HostEvent::BeforeUnload => {
                self.before_unload();
            },
        }
    }

    /// Handle one cross-window message.
    pub async fn handle_message(&mut self, event: InboundEvent) {
        let actions = self.engine.handle_inbound(event);
        self.execute(actions).await;
    }

    /// Wait for every outstanding save acknowledgment and apply it.
    pub async fn settle(&mut self) {
        while let Some(ack) = self.pending_saves.next().await {
            self.finish_save(ack);
        }
    }

    /// Process page events until the host goes away, applying save
    /// acknowledgments as they complete. Outstanding acknowledgments are
    /// settled before returning.
    pub async fn run(&mut self) {
        loop {
            let step = if self.pending_saves.is_empty() {
                Step::Event(self.host.next_event().await)
            } else {
                let event = pin!(self.host.next_event());
                match future::select(event, self.pending_saves.next()).await {
                    Either::Left((event, _)) => Step::Event(event),
                    Either::Right((ack, _)) => Step::Save(ack),
                }
            };

            match step {
                Step::Event(Some(event)) => self.handle_event(event).await,
                Step::Event(None) => break,
                Step::Save(Some(ack)) => self.finish_save(ack),
                Step::Save(None) => {},
            }
        }
        self.settle().await;
    }

    /// Protocol engine.
    pub fn engine(&self) -> &ProtocolEngine {
        &self.engine
    }

    /// Frame manager.
    pub fn frames(&self) -> &FrameManager {
        &self.frames
    }

    /// Host page.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host page.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Hooks.
    pub fn hooks(&self) -> &K {
        &self.hooks
    }

    /// Mutable hooks.
    pub fn hooks_mut(&mut self) -> &mut K {
        &mut self.hooks
    }

    /// Mirrored notebook content.
    pub fn content(&self) -> &str {
        self.engine.content()
    }

    /// Last content known to be saved.
    pub fn saved_content(&self) -> &str {
        self.engine.saved_content()
    }

    /// Whether there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.engine.is_dirty()
    }

    /// Whether the frame has completed the handshake.
    pub fn is_ready(&self) -> bool {
        self.engine.is_ready()
    }

    /// Number of save acknowledgments still outstanding.
    pub fn pending_saves(&self) -> usize {
        self.pending_saves.len()
    }

    async fn execute(&mut self, actions: Vec<EngineAction>) {
        let mut queue = VecDeque::from(actions);
        while self.drain(&mut queue) {
            let Some(content) = self.engine.initial_content().cloned() else {
                continue;
            };
            let content = content.resolve().await;
            let follow_up = self.engine.complete_ready(content);
            for action in follow_up.into_iter().rev() {
                queue.push_front(action);
            }
        }
    }

    fn execute_now(&mut self, actions: Vec<EngineAction>) {
        let mut queue = VecDeque::from(actions);
        if self.drain(&mut queue) {
            warn!(remaining = queue.len(), "initial content requested outside message handling");
        }
    }

    /// Apply queued actions in order. Returns `true` when stopped at a
    /// request for initial content, which the caller must satisfy.
    fn drain(&mut self, queue: &mut VecDeque<EngineAction>) -> bool {
        while let Some(action) = queue.pop_front() {
            match action {
                EngineAction::LoadInitialContent => return true,
                EngineAction::PostMessage { window, message } => {
                    let data = match message.to_data() {
                        Ok(data) => data,
                        Err(err) => {
                            warn!(error = %err, "dropping unencodable outbound message");
                            continue;
                        },
                    };
                    if let Err(err) = self.host.post_message(window, data, POST_TARGET_ORIGIN) {
                        warn!(error = %err, kind = message.kind(), "failed to post message to frame");
                    }
                },
                EngineAction::ResizeFrame { height } => {
                    let Some(frame) = self.frames.frame() else {
                        continue;
                    };
                    if let Err(err) = self.host.resize_frame(frame, height) {
                        warn!(error = %err, height, "failed to resize frame");
                    }
                },
                EngineAction::NotifyReady(payload) => self.hooks.on_ready(&payload),
                EngineAction::NotifyContentUpdate(payload) => {
                    self.hooks.on_content_update(&payload);
                },
                EngineAction::RequestSave(payload) => {
                    // An immediate answer is applied after the rest of this
                    // message's actions, like a deferred one would be.
                    queue.extend(self.request_save(payload));
                },
                EngineAction::NotifyMessage(message) => self.hooks.on_message(&message),
                EngineAction::DirtyChanged(dirty) => self.hooks.on_dirty_change(dirty),
            }
        }
        false
    }

    fn request_save(&mut self, payload: ContentPayload) -> Vec<EngineAction> {
        let outcome = self.hooks.on_save(&payload);
        if let Some(saved) = outcome.settled() {
            return self.engine.acknowledge_save(payload.content, saved);
        }

        let content = payload.content;
        self.pending_saves
            .push(async move { SaveAck { saved: outcome.confirmed().await, content } }.boxed());
        Vec::new()
    }

    fn finish_save(&mut self, ack: SaveAck) {
        let actions = self.engine.acknowledge_save(ack.content, ack.saved);
        self.execute_now(actions);
    }
}
