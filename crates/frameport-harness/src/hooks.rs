//! Hooks that record every call.

use std::collections::VecDeque;

use frameport_app::{EmbedHooks, SaveOutcome};
use frameport_proto::{ContentPayload, InboundMessage, ReadyPayload};

/// One recorded hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookCall {
    /// `on_ready`
    Ready(ReadyPayload),
    /// `on_save`
    Save(ContentPayload),
    /// `on_content_update`
    ContentUpdate(ContentPayload),
    /// `on_message`, by kind
    Message(String),
    /// `on_dirty_change`
    DirtyChange(bool),
}

/// Records hook calls in order and answers save requests from a script.
///
/// Save requests beyond the scripted outcomes get the fallback answer, which
/// is [`SaveOutcome::Unreported`] unless set with
/// [`answer_saves_with`](Self::answer_saves_with).
#[derive(Debug, Default)]
pub struct RecordingHooks {
    calls: Vec<HookCall>,
    save_outcomes: VecDeque<SaveOutcome>,
    fallback_save: Option<bool>,
}

impl RecordingHooks {
    /// No calls recorded, no scripted saves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer to the next unanswered save request.
    pub fn answer_next_save(&mut self, outcome: impl Into<SaveOutcome>) {
        self.save_outcomes.push_back(outcome.into());
    }

    /// Answer unscripted save requests with `saved`.
    pub fn answer_saves_with(&mut self, saved: bool) {
        self.fallback_save = Some(saved);
    }

    /// Every call so far.
    pub fn calls(&self) -> &[HookCall] {
        &self.calls
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Values passed to `on_dirty_change`, in order.
    pub fn dirty_changes(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HookCall::DirtyChange(dirty) => Some(*dirty),
                _ => None,
            })
            .collect()
    }

    /// Kinds passed to `on_message`, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HookCall::Message(kind) => Some(kind.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of `on_ready` calls.
    pub fn ready_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, HookCall::Ready(_))).count()
    }

    /// Number of `on_save` calls.
    pub fn save_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, HookCall::Save(_))).count()
    }
}

impl EmbedHooks for RecordingHooks {
    fn on_ready(&mut self, payload: &ReadyPayload) {
        self.calls.push(HookCall::Ready(payload.clone()));
    }

    fn on_save(&mut self, payload: &ContentPayload) -> SaveOutcome {
        self.calls.push(HookCall::Save(payload.clone()));
        match self.save_outcomes.pop_front() {
            Some(outcome) => outcome,
            None => self.fallback_save.map_or(SaveOutcome::Unreported, SaveOutcome::Immediate),
        }
    }

    fn on_content_update(&mut self, payload: &ContentPayload) {
        self.calls.push(HookCall::ContentUpdate(payload.clone()));
    }

    fn on_message(&mut self, message: &InboundMessage) {
        self.calls.push(HookCall::Message(message.kind().to_string()));
    }

    fn on_dirty_change(&mut self, dirty: bool) {
        self.calls.push(HookCall::DirtyChange(dirty));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_answers_come_before_fallback() {
        let mut hooks = RecordingHooks::new();
        hooks.answer_next_save(false);
        hooks.answer_saves_with(true);

        let payload = ContentPayload::new("x");
        assert!(matches!(hooks.on_save(&payload), SaveOutcome::Immediate(false)));
        assert!(matches!(hooks.on_save(&payload), SaveOutcome::Immediate(true)));
        assert!(matches!(hooks.on_save(&payload), SaveOutcome::Immediate(true)));
        assert_eq!(hooks.save_count(), 3);
    }

    #[test]
    fn unscripted_saves_are_unreported() {
        let mut hooks = RecordingHooks::new();
        assert!(matches!(hooks.on_save(&ContentPayload::new("x")), SaveOutcome::Unreported));
    }

    #[test]
    fn filters_by_call_kind() {
        let mut hooks = RecordingHooks::new();
        hooks.on_dirty_change(true);
        hooks.on_content_update(&ContentPayload::new("a"));
        hooks.on_dirty_change(false);

        assert_eq!(hooks.dirty_changes(), vec![true, false]);
        assert_eq!(hooks.calls().len(), 3);

        hooks.clear();
        assert!(hooks.calls().is_empty());
    }
}
