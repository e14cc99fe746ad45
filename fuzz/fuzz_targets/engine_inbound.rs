//! Fuzz the protocol engine with arbitrary message sequences.
//!
//! Each line of input is one message from the frame. The dirty flag must
//! always equal "mirrored differs from saved", and nothing may be posted
//! before the frame is ready.

#![no_main]

use frameport_core::{
    Ambient, EmbedOptions, EngineAction, Endpoint, InboundEvent, NoAttributes, ProtocolEngine,
    WindowId, config,
};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

const FRAME: WindowId = WindowId(1);
const ORIGIN: &str = "https://nb.example";

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let options = EmbedOptions::new().with_src("https://nb.example/index.html").with_content("#");
    let mut engine =
        ProtocolEngine::new(config::resolve(&options, &NoAttributes, &Ambient::default()));
    engine.bind(Endpoint::new(Some(FRAME), Some(ORIGIN.to_string()), "allow-scripts"));

    for line in text.lines() {
        let Ok(value) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        let was_ready = engine.is_ready();
        let actions = engine.handle_inbound(InboundEvent::new(Some(FRAME), ORIGIN, value));

        let posts = actions.iter().any(|a| matches!(a, EngineAction::PostMessage { .. }));
        assert!(!posts || engine.is_ready() || was_ready);
        assert_eq!(engine.is_dirty(), engine.content() != engine.saved_content());
    }
});
