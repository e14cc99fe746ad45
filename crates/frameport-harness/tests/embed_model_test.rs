//! Model-based property tests for the full embed.
//!
//! Random sequences of frame messages and host calls are applied both to a
//! running embed over the simulated page and to a small reference model.
//! After every step the mirrored content, saved content, dirty
//! notifications and delivered messages must agree.

use frameport_app::{EmbedOptions, InboundEvent, WindowId};
use frameport_harness::{
    NOTEBOOK_ORIGIN, SimEmbed, content_update, ready_signal, save_request, sim_embed,
};
use futures::executor::block_on;
use proptest::prelude::*;
use serde_json::json;

#[derive(Debug, Clone)]
enum Op {
    Ready(&'static str),
    Update(&'static str),
    Save(&'static str, Option<bool>),
    MarkSaved(Option<&'static str>),
    Send,
    ForeignWindow(&'static str),
    ForeignOrigin(&'static str),
}

fn content() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", "a", "b", "c"])
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => content().prop_map(Op::Ready),
        4 => content().prop_map(Op::Update),
        3 => (content(), prop::option::of(any::<bool>())).prop_map(|(c, ack)| Op::Save(c, ack)),
        1 => prop::option::of(content()).prop_map(Op::MarkSaved),
        2 => Just(Op::Send),
        1 => content().prop_map(Op::ForeignWindow),
        1 => content().prop_map(Op::ForeignOrigin),
    ]
}

/// Reference model of the observable embed state.
#[derive(Debug, Default)]
struct Model {
    ready: bool,
    mirrored: String,
    saved: String,
    queued: usize,
    delivered: usize,
    dirty: bool,
    transitions: Vec<bool>,
}

impl Model {
    fn apply(&mut self, op: &Op) {
        match op {
            Op::Ready(c) => {
                if !self.ready {
                    self.ready = true;
                    self.mirrored = (*c).to_string();
                    self.saved = (*c).to_string();
                    self.recompute();
                    self.delivered += self.queued;
                    self.queued = 0;
                }
            },
            Op::Update(c) => {
                self.mirrored = (*c).to_string();
                self.recompute();
            },
            Op::Save(c, ack) => {
                // Mirrored and saved content each recompute the flag.
                self.mirrored = (*c).to_string();
                self.recompute();
                if *ack == Some(true) {
                    self.saved = (*c).to_string();
                    self.recompute();
                }
            },
            Op::MarkSaved(c) => {
                self.saved = c.map_or_else(|| self.mirrored.clone(), String::from);
                self.recompute();
            },
            Op::Send => {
                if self.ready {
                    self.delivered += 1;
                } else {
                    self.queued += 1;
                }
            },
            Op::ForeignWindow(_) | Op::ForeignOrigin(_) => {},
        }
    }

    fn recompute(&mut self) {
        let dirty = self.mirrored != self.saved;
        if dirty != self.dirty {
            self.dirty = dirty;
            self.transitions.push(dirty);
        }
    }
}

fn apply(embed: &mut SimEmbed, op: &Op) {
    let window = embed.frames().frame().and_then(|f| embed.host().window_of(f));
    let update = |c: &str| json!({ "type": "NOTEBOOK_CONTENT_UPDATE", "payload": { "content": c } });

    match op {
        Op::Ready(c) => {
            let event = ready_signal(embed, c);
            block_on(embed.handle_message(event));
        },
        Op::Update(c) => {
            let event = content_update(embed, c);
            block_on(embed.handle_message(event));
        },
        Op::Save(c, ack) => {
            if let Some(ack) = ack {
                embed.hooks_mut().answer_next_save(*ack);
            }
            let event = save_request(embed, c);
            block_on(embed.handle_message(event));
        },
        Op::MarkSaved(c) => embed.mark_saved(c.map(String::from)),
        Op::Send => embed.send_custom("APP_TICK", json!({})),
        Op::ForeignWindow(c) => {
            let event = InboundEvent::new(Some(WindowId(u64::MAX)), NOTEBOOK_ORIGIN, update(c));
            block_on(embed.handle_message(event));
        },
        Op::ForeignOrigin(c) => {
            let event = InboundEvent::new(window, "https://evil.example", update(c));
            block_on(embed.handle_message(event));
        },
    }
}

#[test]
fn confirmed_save_reports_both_transitions() {
    let mut embed = sim_embed(EmbedOptions::new());
    embed.start(None).expect("start");
    let mut model = Model::default();

    let op = Op::Save("a", Some(true));
    apply(&mut embed, &op);
    model.apply(&op);

    assert_eq!(model.transitions, vec![true, false]);
    assert_eq!(embed.hooks().dirty_changes(), model.transitions);
}

proptest! {
    #[test]
    fn embed_matches_model(ops in prop::collection::vec(op(), 1..40)) {
        let mut embed = sim_embed(EmbedOptions::new());
        embed.start(None).expect("start");
        let mut model = Model::default();

        for op in &ops {
            apply(&mut embed, op);
            model.apply(op);

            prop_assert_eq!(embed.is_ready(), model.ready);
            prop_assert_eq!(embed.content(), model.mirrored.as_str());
            prop_assert_eq!(embed.saved_content(), model.saved.as_str());
            prop_assert_eq!(embed.is_dirty(), model.dirty);
            prop_assert_eq!(model.dirty, model.mirrored != model.saved);
            prop_assert_eq!(embed.engine().queued(), model.queued);
            prop_assert_eq!(embed.host().posted().len(), model.delivered);
            prop_assert_eq!(embed.hooks().dirty_changes(), model.transitions.clone());
        }
    }

    #[test]
    fn nothing_is_posted_before_ready(ops in prop::collection::vec(op(), 0..30)) {
        let mut embed = sim_embed(EmbedOptions::new());
        embed.start(None).expect("start");

        for op in ops.iter().filter(|op| !matches!(op, Op::Ready(_))) {
            apply(&mut embed, op);
        }

        prop_assert!(embed.host().posted().is_empty());
        prop_assert!(!embed.is_ready());
    }
}
