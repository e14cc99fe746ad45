//! Well-known message kinds.

use std::fmt;

/// Message kinds with protocol-defined semantics.
///
/// The wire representation is the `type` field of the envelope. Kinds outside
/// this set are not errors; they decode as custom messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Frame reports its content height (frame → host)
    ResizeRequest,
    /// Frame finished loading and is ready to talk (frame → host)
    ReadySignal,
    /// Notebook content changed inside the frame (frame → host)
    ContentUpdate,
    /// User asked the notebook to save (frame → host)
    SaveRequest,
    /// Initial content and base URL for the notebook (host → frame)
    SetInitData,
}

impl MessageKind {
    /// Every well-known kind, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::ResizeRequest,
        Self::ReadySignal,
        Self::ContentUpdate,
        Self::SaveRequest,
        Self::SetInitData,
    ];

    /// Wire name used in the envelope `type` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResizeRequest => "NOTEBOOK_RESIZE_REQUEST",
            Self::ReadySignal => "NOTEBOOK_READY_SIGNAL",
            Self::ContentUpdate => "NOTEBOOK_CONTENT_UPDATE",
            Self::SaveRequest => "NOTEBOOK_SAVE_REQUEST",
            Self::SetInitData => "NOTEBOOK_SET_INIT_DATA",
        }
    }

    /// Look up a kind by its wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Whether the frame sends this kind to the host.
    pub const fn is_inbound(self) -> bool {
        !matches!(self, Self::SetInitData)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
