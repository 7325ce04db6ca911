#![no_main]

use libfuzzer_sys::fuzz_target;
use weft_core::event::InputEvent;
use weft_core::input_pipeline::InputPipeline;
use weft_core::key_decoder::{decode, split_sequences};

fuzz_target!(|data: &[u8]| {
    let mut input = InputPipeline::default();
    let mut events = input.feed_bytes(data);
    events.extend(input.end_composition());
    assert!(!input.is_composing());

    // Composition notifications never interleave with keypresses.
    let mut open = false;
    for event in &events {
        match event {
            InputEvent::CompositionStart(_) => open = true,
            InputEvent::CompositionEnd(_) => open = false,
            InputEvent::CompositionUpdate(_) => assert!(open),
            InputEvent::Keypress { .. } => assert!(!open),
        }
    }

    // Byte-at-a-time feeding must not panic either.
    let mut trickle = InputPipeline::default();
    for byte in data {
        let _ = trickle.feed_bytes(std::slice::from_ref(byte));
    }

    let text = String::from_utf8_lossy(data);
    for chunk in split_sequences(&text) {
        let _ = decode(chunk);
    }
});
