//! Fuzz inbound message decoding.
//!
//! Decoding arbitrary JSON must never panic, and anything that decodes must
//! report the envelope's kind.

#![no_main]

use frameport_proto::InboundMessage;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    if let Ok(message) = InboundMessage::decode(&value) {
        assert_eq!(Some(message.kind()), value.get("type").and_then(Value::as_str));
    }
});
