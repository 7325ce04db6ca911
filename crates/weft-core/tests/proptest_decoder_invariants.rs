//! Property-based invariants for the capability decoders and input layer.
//!
//! 1. **Total decoders**: terminfo, termcap, and key decoding return instead
//!    of panicking on arbitrary input.
//! 2. **Sentinels**: absent numbers and strings in a compiled image never
//!    surface as values.
//! 3. **Synthetic images**: whatever a well-formed image holds is what the
//!    store reports.
//! 4. **Composition**: cancel is idempotent, and every committed run is
//!    bracketed by start and end notifications in order.
//! 5. **Splitting**: `split_sequences` covers its input exactly.
//! 6. **Ordering**: events come out in chunk order, and each one is traceable
//!    to the chunk that produced it.

#![forbid(unsafe_code)]

use proptest::prelude::*;
use weft_core::capability_names::{CapKind, name_at};
use weft_core::event::InputEvent;
use weft_core::ime::ImeComposer;
use weft_core::input_pipeline::InputPipeline;
use weft_core::key_decoder::{decode, split_sequences};
use weft_core::{termcap, terminfo};

// ── Image builder ───────────────────────────────────────────────────────

/// Serialize a legacy little-endian terminfo image.
fn image(booleans: &[bool], numbers: &[i16], strings: &[Option<String>]) -> Vec<u8> {
    let names = b"prop|property test terminal\0";
    let mut table = Vec::new();
    let mut offsets = Vec::new();
    for s in strings {
        match s {
            Some(s) => {
                offsets.push(i16::try_from(table.len()).unwrap());
                table.extend_from_slice(s.as_bytes());
                table.push(0);
            }
            None => offsets.push(-1),
        }
    }

    let mut out = Vec::new();
    for v in [
        0o432_i16,
        names.len() as i16,
        booleans.len() as i16,
        numbers.len() as i16,
        strings.len() as i16,
        table.len() as i16,
    ] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(names);
    out.extend(booleans.iter().map(|&b| u8::from(b)));
    if out.len() % 2 == 1 {
        out.push(0);
    }
    for n in numbers {
        out.extend_from_slice(&n.to_le_bytes());
    }
    for o in &offsets {
        out.extend_from_slice(&o.to_le_bytes());
    }
    out.extend_from_slice(&table);
    out
}

fn ascii_string() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[ -~]{0,12}")
}

fn input_chunk() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("\x1b".to_owned()),
        Just("\r".to_owned()),
        Just(" ".to_owned()),
        Just("\u{3000}".to_owned()),
        Just("\x1b[A".to_owned()),
        "[a-z]",
        "[가-힣]",
        "[ぁ-ゖ]",
        "[一-龥]",
    ]
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn terminfo_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = terminfo::parse(&bytes, "prop");
    }

    #[test]
    fn terminfo_header_mutations_never_panic(
        header in prop::collection::vec(any::<u8>(), 10),
        body in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut bytes = vec![0x1a, 0x01];
        bytes.extend(header);
        bytes.extend(body);
        let _ = terminfo::parse(&bytes, "prop");
    }

    #[test]
    fn termcap_never_panics(text in "[ -~\n\t\\\\:|#=@^]{0,256}", term in "[a-z]{1,6}") {
        let _ = termcap::parse(&text, &term, "prop");
        let _ = termcap::unescape(&text);
    }

    #[test]
    fn key_decoder_never_panics(chunk in any::<String>()) {
        if let Some(key) = decode(&chunk) {
            prop_assert_eq!(key.sequence, chunk);
        }
    }

    #[test]
    fn split_covers_input(input in any::<String>()) {
        let chunks: Vec<&str> = split_sequences(&input).collect();
        prop_assert!(chunks.iter().all(|c| !c.is_empty()));
        prop_assert_eq!(chunks.concat(), input);
    }

    #[test]
    fn synthetic_image_round_trips(
        booleans in prop::collection::vec(any::<bool>(), 0..40),
        numbers in prop::collection::vec(-3i16..2000, 0..30),
        strings in prop::collection::vec(ascii_string(), 0..60),
    ) {
        let bytes = image(&booleans, &numbers, &strings);
        let store = terminfo::parse(&bytes, "prop").unwrap();

        prop_assert_eq!(store.primary_name(), Some("prop"));
        for (i, &set) in booleans.iter().enumerate() {
            if let Some(name) = name_at(CapKind::Boolean, i) {
                prop_assert_eq!(store.boolean(name), set);
            }
        }
        for (i, &n) in numbers.iter().enumerate() {
            if let Some(name) = name_at(CapKind::Number, i) {
                let expected = (n >= 0).then_some(i32::from(n));
                prop_assert_eq!(store.number(name), expected);
            }
        }
        for (i, s) in strings.iter().enumerate() {
            if let Some(name) = name_at(CapKind::String, i) {
                prop_assert_eq!(store.string(name), s.as_deref());
            }
        }
    }

    #[test]
    fn cancel_is_idempotent(chunks in prop::collection::vec(input_chunk(), 0..12)) {
        let mut ime = ImeComposer::new();
        for chunk in &chunks {
            ime.check(chunk);
        }
        ime.cancel();
        let once = ime.handler().composition().clone();
        ime.cancel();
        prop_assert_eq!(ime.handler().composition(), &once);
        prop_assert!(!ime.is_composing());
    }

    #[test]
    fn composition_events_are_bracketed(chunks in prop::collection::vec(input_chunk(), 0..24)) {
        let mut input = InputPipeline::default();
        let mut events = Vec::new();
        for chunk in &chunks {
            events.extend(input.feed(chunk));
        }
        events.extend(input.end_composition());

        let mut open = false;
        for event in &events {
            match event {
                InputEvent::CompositionStart(_) => {
                    prop_assert!(!open);
                    open = true;
                }
                InputEvent::CompositionUpdate(_) => prop_assert!(open),
                InputEvent::CompositionEnd(_) => {
                    prop_assert!(open);
                    open = false;
                }
                InputEvent::Keypress { key, .. } => {
                    prop_assert!(!open);
                    if let Some(key) = key {
                        prop_assert!(!key.is_composing);
                    }
                }
            }
        }
        prop_assert!(!open);
        prop_assert!(!input.is_composing());
    }

    #[test]
    fn events_follow_chunk_order(chunks in prop::collection::vec(input_chunk(), 0..24)) {
        let mut input = InputPipeline::default();
        let mut tagged: Vec<(usize, InputEvent)> = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            tagged.extend(input.feed(chunk).into_iter().map(|event| (index, event)));
        }

        prop_assert!(tagged.windows(2).all(|pair| pair[0].0 <= pair[1].0));

        // Every event belongs to the chunk that produced it: keypresses carry
        // that chunk or text committed by it, and a start carries the chunk.
        for (index, group) in tagged.chunk_by(|a, b| a.0 == b.0).map(|g| (g[0].0, g)) {
            let chunk = chunks[index].as_str();
            let mut committed: Option<&str> = None;
            for (_, event) in group {
                match event {
                    InputEvent::CompositionStart(text) => prop_assert_eq!(text.as_str(), chunk),
                    InputEvent::CompositionUpdate(text) => prop_assert!(text.ends_with(chunk)),
                    InputEvent::CompositionEnd(text) => committed = Some(text.as_str()),
                    InputEvent::Keypress { sequence, .. } => {
                        prop_assert!(
                            sequence == chunk || Some(sequence.as_str()) == committed,
                            "keypress {:?} does not come from chunk {:?}",
                            sequence,
                            chunk
                        );
                    }
                }
            }
        }
    }
}
