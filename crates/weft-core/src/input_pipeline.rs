#![forbid(unsafe_code)]

//! Input pipeline: IME composition in front of the key decoder.
//!
//! [`InputPipeline`] turns input chunks into [`InputEvent`]s, strictly in
//! arrival order. Each chunk first goes through the [`ImeComposer`]:
//!
//! - absorbed chunks produce `CompositionStart` / `CompositionUpdate`;
//! - a commit produces `CompositionEnd(text)`, then a keypress for the
//!   committed text, then a keypress for a CR/LF terminator if there was one;
//! - everything else is decoded by [`key_decoder::decode`] into a keypress.
//!
//! [`InputPipeline::feed_bytes`] accepts raw reads from a TTY: it carries
//! incomplete UTF-8 between reads and splits each read into key-sized chunks.
//!
//! # Example
//!
//! ```
//! use weft_core::event::InputEvent;
//! use weft_core::input_pipeline::InputPipeline;
//!
//! let mut input = InputPipeline::default();
//! let mut events = Vec::new();
//! for chunk in ["한", "글", " "] {
//!     events.extend(input.feed(chunk));
//! }
//! assert_eq!(events[0], InputEvent::CompositionStart("한".into()));
//! assert_eq!(events[1], InputEvent::CompositionUpdate("한글".into()));
//! assert_eq!(events[2], InputEvent::CompositionEnd("한글".into()));
//! assert!(matches!(&events[3], InputEvent::Keypress { sequence, .. } if sequence == "한글"));
//! ```

use crate::capability_resolver::parse_bool;
use crate::event::{InputEvent, KeyEvent};
use crate::ime::{ImeComposer, Transition};
use crate::key_decoder::{self, split_sequences};

#[cfg(feature = "tracing")]
use crate::logging::trace;
#[cfg(not(feature = "tracing"))]
use crate::trace;

const ENV_DISABLE_IME: &str = "WEFT_DISABLE_IME";

/// Input pipeline configuration.
///
/// # Environment Variables
///
/// - `WEFT_DISABLE_IME`: "1"/"true" turns composition detection off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    /// Run chunks through the composition state machine.
    pub enable_ime: bool,
    /// A lone ESC during composition cancels it instead of reaching widgets.
    pub escape_cancels_composition: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            enable_ime: true,
            escape_cancels_composition: true,
        }
    }
}

impl InputConfig {
    /// Load configuration from `WEFT_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load configuration through a custom lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(val) = get_env(ENV_DISABLE_IME)
            && let Some(disable) = parse_bool(&val)
        {
            config.enable_ime = !disable;
        }
        config
    }

    /// Enable or disable composition detection.
    #[must_use]
    pub fn with_enable_ime(mut self, enable: bool) -> Self {
        self.enable_ime = enable;
        self
    }

    /// Choose whether ESC cancels an open composition.
    #[must_use]
    pub fn with_escape_cancels_composition(mut self, cancels: bool) -> Self {
        self.escape_cancels_composition = cancels;
        self
    }
}

/// Stateful input decoder for one terminal session.
#[derive(Debug, Default)]
pub struct InputPipeline {
    config: InputConfig,
    composer: ImeComposer,
    /// Bytes of a UTF-8 sequence split across reads.
    pending: Vec<u8>,
}

impl InputPipeline {
    /// Create a pipeline.
    #[must_use]
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> InputConfig {
        self.config
    }

    /// True while a composition is open.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.composer.is_composing()
    }

    /// Uncommitted composition text.
    #[must_use]
    pub fn composition_data(&self) -> &str {
        self.composer.buffer()
    }

    /// The composition state machine, e.g. to register a change listener.
    pub fn composer_mut(&mut self) -> &mut ImeComposer {
        &mut self.composer
    }

    /// Process one chunk.
    pub fn feed(&mut self, chunk: &str) -> Vec<InputEvent> {
        if chunk.is_empty() {
            return Vec::new();
        }
        if !self.config.enable_ime {
            return vec![self.keypress(chunk.to_owned())];
        }

        if chunk == "\x1b" && self.config.escape_cancels_composition && self.is_composing() {
            trace!("composition cancelled by escape");
            self.composer.cancel();
            return vec![InputEvent::CompositionEnd(String::new())];
        }

        let step = self.composer.check(chunk);
        match step.transition {
            Transition::Passthrough => vec![self.keypress(step.payload)],
            Transition::Started => {
                trace!(buffer = self.composer.buffer(), "composition start");
                vec![InputEvent::CompositionStart(self.composer.buffer().to_owned())]
            }
            Transition::Updated => {
                trace!(buffer = self.composer.buffer(), "composition update");
                vec![InputEvent::CompositionUpdate(
                    self.composer.buffer().to_owned(),
                )]
            }
            Transition::Committed(text) => {
                trace!(text = %text, "composition end");
                let terminator = step.payload[text.len()..].to_owned();
                let mut events = vec![InputEvent::CompositionEnd(text.clone())];
                if !text.is_empty() {
                    events.push(self.committed_keypress(text));
                }
                if !terminator.is_empty() {
                    events.push(self.keypress(terminator));
                }
                events
            }
        }
    }

    /// Process a raw read from the terminal.
    ///
    /// Incomplete UTF-8 at the end of `bytes` is held for the next call;
    /// invalid bytes become U+FFFD.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Vec<InputEvent> {
        self.pending.extend_from_slice(bytes);
        let text = self.take_text();
        split_sequences(&text)
            .flat_map(|chunk| self.feed(chunk))
            .collect()
    }

    /// Commit an open composition immediately, e.g. on focus loss.
    ///
    /// Returns `[CompositionEnd(text)]`, or nothing when idle.
    pub fn end_composition(&mut self) -> Vec<InputEvent> {
        self.composer
            .end_composition()
            .map(InputEvent::CompositionEnd)
            .into_iter()
            .collect()
    }

    /// Discard an open composition.
    ///
    /// Returns `[CompositionEnd("")]`, or nothing when idle.
    pub fn cancel(&mut self) -> Vec<InputEvent> {
        if !self.is_composing() {
            return Vec::new();
        }
        self.composer.cancel();
        vec![InputEvent::CompositionEnd(String::new())]
    }

    fn keypress(&self, sequence: String) -> InputEvent {
        let key = key_decoder::decode(&sequence).map(|mut key| {
            key.is_composing = self.is_composing();
            key.composition_data = self.composition_data().to_owned();
            key
        });
        InputEvent::Keypress { sequence, key }
    }

    fn committed_keypress(&self, text: String) -> InputEvent {
        let key = key_decoder::decode(&text).map(|key| KeyEvent {
            is_composing: false,
            composition_data: text.clone(),
            ..key
        });
        InputEvent::Keypress {
            sequence: text,
            key,
        }
    }

    /// Drain `pending` into text, keeping an incomplete trailing sequence.
    fn take_text(&mut self) -> String {
        let mut text = String::new();
        let mut rest = self.pending.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }
        self.pending = rest.to_vec();
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyName, Modifiers};

    fn feed_all(pipeline: &mut InputPipeline, chunks: &[&str]) -> Vec<InputEvent> {
        chunks.iter().flat_map(|c| pipeline.feed(c)).collect()
    }

    fn key_of(event: &InputEvent) -> &KeyEvent {
        event.key().expect("keypress with a decoded key")
    }

    #[test]
    fn plain_keys_pass_through() {
        let mut input = InputPipeline::default();
        let events = feed_all(&mut input, &["a", "\r", "\x1b[A"]);
        assert_eq!(events.len(), 3);
        assert!(key_of(&events[0]).is_char('a'));
        assert_eq!(key_of(&events[1]).name, KeyName::Return);
        assert_eq!(key_of(&events[2]).name, KeyName::Up);
        assert!(!key_of(&events[0]).is_composing);
    }

    #[test]
    fn unrecognized_chunks_are_keypresses_without_key() {
        let mut input = InputPipeline::default();
        let events = input.feed("xyz");
        assert_eq!(
            events,
            [InputEvent::Keypress {
                sequence: "xyz".into(),
                key: None
            }]
        );
    }

    #[test]
    fn composition_event_sequence() {
        let mut input = InputPipeline::default();
        let events = feed_all(&mut input, &["한", "글", " "]);
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], InputEvent::CompositionStart("한".into()));
        assert_eq!(events[1], InputEvent::CompositionUpdate("한글".into()));
        assert_eq!(events[2], InputEvent::CompositionEnd("한글".into()));
        assert_eq!(
            events[3],
            InputEvent::Keypress {
                sequence: "한글".into(),
                key: None
            }
        );
        assert!(!input.is_composing());
    }

    #[test]
    fn single_character_commit_carries_composition_data() {
        let mut input = InputPipeline::default();
        let events = feed_all(&mut input, &["中", "\r"]);
        assert_eq!(events[1], InputEvent::CompositionEnd("中".into()));
        let committed = key_of(&events[2]);
        assert!(committed.is_char('中'));
        assert!(!committed.is_composing);
        assert_eq!(committed.composition_data, "中");
        assert_eq!(key_of(&events[3]).name, KeyName::Return);
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn keys_during_composition_are_absorbed() {
        let mut input = InputPipeline::default();
        let events = feed_all(&mut input, &["か", "\x01"]);
        assert_eq!(events[1], InputEvent::CompositionUpdate("か\x01".into()));
        assert_eq!(input.composition_data(), "か\x01");
    }

    #[test]
    fn escape_cancels_composition() {
        let mut input = InputPipeline::default();
        input.feed("한");
        assert_eq!(input.feed("\x1b"), [InputEvent::CompositionEnd(String::new())]);
        assert!(!input.is_composing());
        // Idle escape is a normal key.
        assert_eq!(key_of(&input.feed("\x1b")[0]).name, KeyName::Escape);
    }

    #[test]
    fn escape_can_join_composition_when_configured() {
        let config = InputConfig::default().with_escape_cancels_composition(false);
        let mut input = InputPipeline::new(config);
        input.feed("한");
        assert_eq!(
            input.feed("\x1b"),
            [InputEvent::CompositionUpdate("한\x1b".into())]
        );
    }

    #[test]
    fn disabled_ime_decodes_everything() {
        let mut input = InputPipeline::new(InputConfig::default().with_enable_ime(false));
        let events = input.feed("한");
        assert!(key_of(&events[0]).is_char('한'));
        assert!(!input.is_composing());
    }

    #[test]
    fn end_composition_and_cancel() {
        let mut input = InputPipeline::default();
        assert!(input.end_composition().is_empty());
        assert!(input.cancel().is_empty());

        input.feed("日");
        assert_eq!(
            input.end_composition(),
            [InputEvent::CompositionEnd("日".into())]
        );
        assert!(input.end_composition().is_empty());

        input.feed("日");
        assert_eq!(input.cancel(), [InputEvent::CompositionEnd(String::new())]);
        assert!(input.cancel().is_empty());
    }

    #[test]
    fn feed_bytes_splits_reads() {
        let mut input = InputPipeline::default();
        let events = input.feed_bytes(b"q\x1b[3~\x1bOP\x1bx");
        let names: Vec<String> = events.iter().map(|e| key_of(e).full()).collect();
        assert_eq!(names, ["q", "delete", "f1", "M-x"]);
    }

    #[test]
    fn feed_bytes_carries_split_utf8() {
        let mut input = InputPipeline::default();
        let bytes = "한 ".as_bytes();
        assert!(input.feed_bytes(&bytes[..2]).is_empty());
        let events = input.feed_bytes(&bytes[2..]);
        assert_eq!(events[0], InputEvent::CompositionStart("한".into()));
        assert_eq!(events[1], InputEvent::CompositionEnd("한".into()));
    }

    #[test]
    fn feed_bytes_replaces_invalid_utf8() {
        let mut input = InputPipeline::default();
        let events = input.feed_bytes(b"a\xffb");
        assert_eq!(events.len(), 3);
        assert!(key_of(&events[1]).is_char(char::REPLACEMENT_CHARACTER));
    }

    #[test]
    fn ctrl_keys_keep_modifiers() {
        let mut input = InputPipeline::default();
        let events = input.feed("\x03");
        let key = key_of(&events[0]);
        assert_eq!(key.modifiers, Modifiers::CTRL);
        assert!(key.is_char('c'));
    }

    #[test]
    fn config_from_env() {
        let config = InputConfig::from_env_with(|key| {
            (key == "WEFT_DISABLE_IME").then(|| "true".to_owned())
        });
        assert!(!config.enable_ime);
        assert!(InputConfig::from_env_with(|_| None).enable_ime);
    }
}
