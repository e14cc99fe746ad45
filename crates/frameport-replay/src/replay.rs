//! Drive an embed with transcript entries and collect what the host saw.

use frameport_app::{FrameHost, InboundEvent, ResolvedConfig, UnloadDecision, WindowId};
use frameport_harness::{HookCall, RecordingHooks, SimEmbed, SimHost};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{Entry, ReplayError};

/// Window id used for foreign messages. The simulated page never hands it
/// out.
const FOREIGN_WINDOW: WindowId = WindowId(0);

/// Something the host observed while replaying a transcript line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Record {
    /// A message was posted to the frame
    Post {
        /// Transcript line
        line: usize,
        /// Posted data
        data: Value,
    },
    /// The handshake completed
    Ready {
        /// Transcript line
        line: usize,
        /// Content reported by the frame
        content: String,
    },
    /// The frame reported new content
    Content {
        /// Transcript line
        line: usize,
        /// New content
        content: String,
    },
    /// The frame asked for a save
    Save {
        /// Transcript line
        line: usize,
        /// Content to save
        content: String,
    },
    /// The unsaved-changes flag flipped
    Dirty {
        /// Transcript line
        line: usize,
        /// New value
        dirty: bool,
    },
    /// A page unload was answered
    Unload {
        /// Transcript line
        line: usize,
        /// Whether the unload was cancelled
        blocked: bool,
    },
}

/// A started embed over the simulated page.
pub struct Replay {
    embed: SimEmbed,
    posted: usize,
    calls: usize,
}

impl Replay {
    /// Attach an embed to a fresh simulated page at `page_location`.
    ///
    /// With `confirm_saves`, every save request is acknowledged as
    /// successful; otherwise saves go unreported.
    pub fn start(
        config: ResolvedConfig,
        page_location: &str,
        confirm_saves: bool,
    ) -> Result<Self, ReplayError> {
        let mut hooks = RecordingHooks::new();
        if confirm_saves {
            hooks.answer_saves_with(true);
        }
        let mut embed = SimEmbed::new(SimHost::new(page_location), hooks, config);
        embed.start(None)?;
        Ok(Self { embed, posted: 0, calls: 0 })
    }

    /// The embed being driven.
    pub fn embed(&self) -> &SimEmbed {
        &self.embed
    }

    /// Apply one entry and report what it caused, posts first.
    pub async fn step(&mut self, line: usize, entry: Entry) -> Vec<Record> {
        let mut records = Vec::new();
        match entry {
            Entry::Message { origin, foreign, data } => {
                let source = if foreign { Some(FOREIGN_WINDOW) } else { self.frame_window() };
                self.embed.handle_message(InboundEvent::new(source, origin, data)).await;
            },
            Entry::Unload => {
                let blocked = self.embed.before_unload() == UnloadDecision::Block;
                records.push(Record::Unload { line, blocked });
            },
        }
        self.embed.settle().await;

        let posted = &self.embed.host().posted()[self.posted..];
        records.extend(posted.iter().map(|m| Record::Post { line, data: m.data.clone() }));
        self.posted += posted.len();

        let calls = &self.embed.hooks().calls()[self.calls..];
        records.extend(calls.iter().filter_map(|call| observed(line, call)));
        self.calls += calls.len();

        debug!(line, records = records.len(), "replayed transcript entry");
        records
    }

    /// Apply every entry in order.
    pub async fn run(
        &mut self,
        entries: impl IntoIterator<Item = (usize, Entry)>,
    ) -> Vec<Record> {
        let mut records = Vec::new();
        for (line, entry) in entries {
            records.extend(self.step(line, entry).await);
        }
        records
    }

    fn frame_window(&self) -> Option<WindowId> {
        self.embed.frames().frame().and_then(|frame| self.embed.host().frame_window(frame))
    }
}

fn observed(line: usize, call: &HookCall) -> Option<Record> {
    match call {
        HookCall::Ready(payload) => Some(Record::Ready { line, content: payload.content.clone() }),
        HookCall::ContentUpdate(payload) => {
            Some(Record::Content { line, content: payload.content.clone() })
        },
        HookCall::Save(payload) => Some(Record::Save { line, content: payload.content.clone() }),
        HookCall::DirtyChange(dirty) => Some(Record::Dirty { line, dirty: *dirty }),
        HookCall::Message(_) => None,
    }
}
