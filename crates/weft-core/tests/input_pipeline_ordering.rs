//! Event ordering through the input pipeline.
//!
//! Mixed streams of plain keys, escape sequences, and CJK composition runs
//! must come out in arrival order, with composition notifications bracketing
//! the committed text.

#![forbid(unsafe_code)]

use std::sync::{Arc, Mutex};

use weft_core::event::{InputEvent, KeyName};
use weft_core::input_pipeline::{InputConfig, InputPipeline};

/// Render events compactly for whole-stream comparisons.
fn render(events: &[InputEvent]) -> Vec<String> {
    events
        .iter()
        .map(|event| match event {
            InputEvent::Keypress { key: Some(key), .. } => format!("key:{}", key.full()),
            InputEvent::Keypress { sequence, key: None } => format!("raw:{sequence}"),
            InputEvent::CompositionStart(text) => format!("start:{text}"),
            InputEvent::CompositionUpdate(text) => format!("update:{text}"),
            InputEvent::CompositionEnd(text) => format!("end:{text}"),
        })
        .collect()
}

#[test]
fn mixed_stream_keeps_arrival_order() {
    let mut input = InputPipeline::default();
    let events = input.feed_bytes("a\x1b[A한국 b\r".as_bytes());
    assert_eq!(
        render(&events),
        [
            "key:a",
            "key:up",
            "start:한",
            "update:한국",
            "end:한국",
            "raw:한국",
            "key:b",
            "key:return",
        ]
    );
}

#[test]
fn return_commits_then_reaches_widgets() {
    let mut input = InputPipeline::default();
    let events = input.feed_bytes("にほん\r".as_bytes());
    assert_eq!(
        render(&events),
        [
            "start:に",
            "update:にほ",
            "update:にほん",
            "end:にほん",
            "raw:にほん",
            "key:return",
        ]
    );
}

#[test]
fn byte_at_a_time_matches_bulk() {
    let stream = "x\x1bOP中文\n\x03".as_bytes();

    let mut bulk = InputPipeline::default();
    let expected = render(&bulk.feed_bytes(stream));

    let mut trickle = InputPipeline::default();
    let mut events = Vec::new();
    for byte in stream {
        events.extend(trickle.feed_bytes(std::slice::from_ref(byte)));
    }

    // Escape sequences split across reads decode piecewise; compare the
    // parts that do not depend on read boundaries.
    let trickled = render(&events);
    for expected_event in expected.iter().filter(|e| !e.contains("f1")) {
        assert!(
            trickled.contains(expected_event),
            "missing {expected_event} in {trickled:?}"
        );
    }
    assert_eq!(trickled.last().map(String::as_str), Some("key:C-c"));
}

#[test]
fn meta_o_does_not_swallow_following_key() {
    let mut input = InputPipeline::default();
    assert_eq!(
        render(&input.feed_bytes(b"\x1bO\x1b[A")),
        ["key:M-O", "key:up"]
    );
    assert_eq!(render(&input.feed_bytes(b"\x1bO\r")), ["key:M-O", "key:return"]);
    assert_eq!(render(&input.feed_bytes(b"\x1bOA")), ["key:up"]);
}

#[test]
fn escape_cancel_then_typing_resumes() {
    let mut input = InputPipeline::default();
    let mut events = input.feed("가");
    events.extend(input.feed("\x1b"));
    events.extend(input.feed("q"));
    assert_eq!(render(&events), ["start:가", "end:", "key:q"]);
}

#[test]
fn focus_loss_flushes_composition() {
    let mut input = InputPipeline::default();
    input.feed("ひ");
    input.feed("ら");
    assert_eq!(render(&input.end_composition()), ["end:ひら"]);
    assert!(!input.is_composing());
    assert_eq!(input.composition_data(), "");
}

#[test]
fn listener_tracks_pipeline_composition() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut input = InputPipeline::default();
    input
        .composer_mut()
        .handler_mut()
        .on_change(move |c| sink.lock().unwrap().push((c.is_composing, c.text.clone())));

    input.feed("한");
    input.feed("글");
    input.feed(" ");

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        [
            (true, "한".to_owned()),
            (true, "한글".to_owned()),
            (false, String::new()),
        ]
    );
}

#[test]
fn disabled_ime_passes_cjk_through() {
    let mut input = InputPipeline::new(InputConfig::default().with_enable_ime(false));
    let events = input.feed_bytes("한 ".as_bytes());
    assert_eq!(render(&events), ["key:한", "key:space"]);
    assert_eq!(events[0].key().map(|k| k.name), Some(KeyName::Char('한')));
}
