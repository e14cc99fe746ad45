//! Frame lifecycle: locate or create the frame, configure it, listen.

use frameport_core::{Endpoint, ResolvedConfig, endpoint::resolve_origin};
use tracing::debug;

use crate::{FrameHost, FrameId, ListenerId, ListenerKind};

/// Owns the frame element and the page listeners installed for it.
///
/// Tracks exactly the listeners it registered and removes exactly those on
/// [`dispose`](Self::dispose).
#[derive(Debug, Default)]
pub struct FrameManager {
    frame: Option<FrameId>,
    listeners: Vec<(ListenerKind, ListenerId)>,
}

impl FrameManager {
    /// Create a manager with no frame and no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame being managed, once attached.
    pub fn frame(&self) -> Option<FrameId> {
        self.frame
    }

    /// Listeners currently registered by this manager.
    pub fn listeners(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.listeners.iter().map(|(_, id)| *id)
    }

    /// Whether a listener of this kind is registered.
    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.iter().any(|(k, _)| *k == kind)
    }

    /// Attach to a frame and start listening.
    ///
    /// Frame selection: the frame attached earlier, else `preferred`, else an
    /// existing child frame, else a newly created one. Once attached, the
    /// frame never changes, since the endpoint is bound to its window. The
    /// frame is navigated only when it does not already point at the
    /// configured source, so re-attaching never reloads the notebook.
    ///
    /// An unresolvable source does not fail the attach: the returned endpoint
    /// has no expected origin and will reject every message.
    pub fn attach<H: FrameHost>(
        &mut self,
        host: &mut H,
        config: &ResolvedConfig,
        preferred: Option<FrameId>,
    ) -> Result<Endpoint, H::Error> {
        if let (Some(attached), Some(preferred)) = (self.frame, preferred)
            && attached != preferred
        {
            debug!(%attached, %preferred, "already attached; ignoring preferred frame");
        }
        let frame = match self.frame.or(preferred).or_else(|| host.find_child_frame()) {
            Some(frame) => frame,
            None => host.create_frame()?,
        };
        self.frame = Some(frame);

        host.set_style(frame, "width", "100%")?;
        host.set_attribute(frame, "sandbox", &config.sandbox)?;
        if host.frame_src(frame).as_deref() != Some(config.src.as_str()) {
            debug!(%frame, src = %config.src, "navigating frame");
            host.navigate(frame, &config.src)?;
        }
        host.set_attribute(frame, "frameborder", "0")?;

        let expected_origin = match resolve_origin(&config.src, &host.page_location()) {
            Ok(origin) => Some(origin),
            Err(err) => {
                debug!(error = %err, "notebook source has no resolvable origin");
                None
            },
        };

        self.listen(host, ListenerKind::Message);
        if config.prevent_navigation_with_unsaved_changes {
            self.listen(host, ListenerKind::BeforeUnload);
        }

        Ok(Endpoint::new(host.frame_window(frame), expected_origin, config.sandbox.clone()))
    }

    /// Remove every listener this manager registered.
    ///
    /// Idempotent, and a no-op before [`attach`](Self::attach).
    pub fn dispose<H: FrameHost>(&mut self, host: &mut H) {
        for (kind, id) in self.listeners.drain(..) {
            debug!(?kind, ?id, "removing listener");
            host.remove_listener(id);
        }
    }

    fn listen<H: FrameHost>(&mut self, host: &mut H, kind: ListenerKind) {
        if self.is_listening(kind) {
            return;
        }
        let id = host.add_listener(kind);
        self.listeners.push((kind, id));
    }
}
