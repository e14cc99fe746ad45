//! End-to-end replay of a transcript file's contents.

use frameport_app::EmbedOptions;
use frameport_core::{Ambient, NoAttributes, config};
use frameport_harness::{NOTEBOOK_SRC, PAGE_LOCATION};
use frameport_replay::{Record, Replay, parse_transcript};

const TRANSCRIPT: &str = r##"
{"origin": "https://nb.example", "data": {"type": "NOTEBOOK_RESIZE_REQUEST", "payload": {"height": 300}}}
{"origin": "https://nb.example", "data": {"type": "NOTEBOOK_READY_SIGNAL", "payload": {"content": "# a"}}}
{"origin": "https://evil.example", "data": {"type": "NOTEBOOK_CONTENT_UPDATE", "payload": {"content": "pwned"}}}
{"origin": "https://nb.example", "foreign": true, "data": {"type": "NOTEBOOK_CONTENT_UPDATE", "payload": {"content": "pwned"}}}
{"origin": "https://nb.example", "data": {"type": "NOTEBOOK_CONTENT_UPDATE", "payload": {"content": "# b"}}}
{"unload": true}
{"origin": "https://nb.example", "data": {"type": "NOTEBOOK_SAVE_REQUEST", "payload": {"content": "# b"}}}
{"unload": true}
"##;

#[tokio::test]
async fn replays_full_session() {
    let options = EmbedOptions::new().with_src(NOTEBOOK_SRC).with_navigation_guard(true);
    let config = config::resolve(&options, &NoAttributes, &Ambient::default());
    let mut replay = Replay::start(config, PAGE_LOCATION, true).expect("start");

    let entries = parse_transcript(TRANSCRIPT).expect("valid transcript");
    let records = replay.run(entries).await;

    assert_eq!(
        records,
        vec![
            Record::Ready { line: 3, content: "# a".to_string() },
            Record::Dirty { line: 6, dirty: true },
            Record::Content { line: 6, content: "# b".to_string() },
            Record::Unload { line: 7, blocked: true },
            Record::Save { line: 8, content: "# b".to_string() },
            Record::Dirty { line: 8, dirty: false },
            Record::Unload { line: 9, blocked: false },
        ]
    );
    assert_eq!(replay.embed().content(), "# b");

    let frame = replay.embed().frames().frame().expect("frame");
    let height = replay.embed().host().frame(frame).expect("frame").styles.get("height").cloned();
    assert_eq!(height.as_deref(), Some("302px"));
}
