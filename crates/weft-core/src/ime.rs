#![forbid(unsafe_code)]

//! IME composition.
//!
//! A raw TTY never reports input-method composition events; the terminal
//! only delivers finished characters. This module approximates composition
//! boundaries from the characters themselves:
//!
//! - [`ImeHandler`] is the explicit composition API used directly by widgets:
//!   start, update, commit, cancel, and cursor-relative edits within the
//!   uncommitted text.
//! - [`ImeComposer`] drives an `ImeHandler` from the input stream. A chunk
//!   that starts with a Hangul, Kana, or Han character (or the ideographic
//!   space) opens a composition; following chunks accumulate until a space,
//!   ideographic space, CR, or LF commits the run.
//!
//! # State machine
//!
//! ```text
//!             lead chunk                    other chunk
//!   Idle ───────────────────▶ Composing ◀──────────────┐
//!    ▲                            │  └──────────────────┘
//!    │  space / U+3000 / CR / LF  │
//!    └────────────────────────────┘  (commit; cancel also returns to Idle)
//! ```
//!
//! No operation fails. Cancelling or committing while idle is a no-op.
//!
//! # Cursor
//!
//! The cursor counts grapheme clusters, so a Hangul syllable typed as
//! decomposed jamo still moves as one unit.
//! [`ImeComposition::cursor_column`] converts it to terminal columns for
//! cursor rendering.

use std::fmt;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::event::{KeyEvent, KeyName};

#[cfg(feature = "tracing")]
use crate::logging::trace;
#[cfg(not(feature = "tracing"))]
use crate::trace;

/// Ideographic space, U+3000.
pub const IDEOGRAPHIC_SPACE: char = '\u{3000}';

/// True if `c` opens a composition.
///
/// Covers Hangul Jamo, Hangul Compatibility Jamo, Hangul Syllables,
/// Hiragana, Katakana, CJK Extension A, CJK Unified Ideographs, and the
/// ideographic space.
#[must_use]
pub const fn is_composition_lead(c: char) -> bool {
    matches!(
        c,
        '\u{1100}'..='\u{11FF}'
            | '\u{3130}'..='\u{318F}'
            | '\u{AC00}'..='\u{D7A3}'
            | '\u{3040}'..='\u{309F}'
            | '\u{30A0}'..='\u{30FF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | IDEOGRAPHIC_SPACE
    )
}

/// True if `chunk` commits an active composition.
#[must_use]
pub fn is_terminator(chunk: &str) -> bool {
    matches!(chunk, " " | "\u{3000}" | "\r" | "\n")
}

// ============================================================================
// Handler
// ============================================================================

/// Snapshot of a composition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImeComposition {
    /// True while a composition is open.
    pub is_composing: bool,
    /// Uncommitted text.
    pub text: String,
    /// Cursor position in grapheme clusters, `0..=grapheme_count()`.
    pub cursor: usize,
    /// Language tag, when known.
    pub lang: Option<String>,
}

impl ImeComposition {
    /// Number of grapheme clusters in `text`.
    #[must_use]
    pub fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Display column of the cursor, relative to the start of the text.
    #[must_use]
    pub fn cursor_column(&self) -> usize {
        self.text[..self.byte_offset(self.cursor)].width()
    }

    /// Display width of the whole text.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.width()
    }

    /// Byte offset of grapheme `index`, or the text length past the end.
    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }
}

/// What [`ImeHandler::process_key`] did with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Idle, or the key does not apply to the composition.
    Ignored,
    /// The key edited, moved within, or cancelled the composition.
    Handled,
    /// Return or linefeed closed the composition with this text.
    Committed(String),
}

impl KeyOutcome {
    /// True unless the key was ignored.
    #[must_use]
    pub fn handled(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Callback invoked after every composition change.
pub type ChangeListener = Box<dyn FnMut(&ImeComposition) + Send>;

/// Explicit composition API.
///
/// ```
/// use weft_core::ime::ImeHandler;
///
/// let mut ime = ImeHandler::new();
/// ime.start("한");
/// ime.update("한글", None);
/// assert_eq!(ime.composition().cursor_column(), 4);
/// assert_eq!(ime.commit(), "한글");
/// assert!(!ime.is_composing());
/// ```
#[derive(Default)]
pub struct ImeHandler {
    composition: ImeComposition,
    on_change: Option<ChangeListener>,
}

impl fmt::Debug for ImeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImeHandler")
            .field("composition", &self.composition)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl ImeHandler {
    /// Create an idle handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current composition state.
    #[must_use]
    pub fn composition(&self) -> &ImeComposition {
        &self.composition
    }

    /// True while a composition is open.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.composition.is_composing
    }

    /// Uncommitted text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.composition.text
    }

    /// Register the change listener, replacing any previous one.
    pub fn on_change(&mut self, listener: impl FnMut(&ImeComposition) + Send + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    /// Open a composition holding `initial`, cursor at the end.
    pub fn start(&mut self, initial: &str) {
        self.composition.is_composing = true;
        self.composition.text = initial.to_owned();
        self.composition.cursor = self.composition.grapheme_count();
        self.notify();
    }

    /// Replace the text; opens a composition if none is active.
    ///
    /// `cursor` defaults to the end and is clamped to the text.
    pub fn update(&mut self, text: &str, cursor: Option<usize>) {
        if !self.composition.is_composing {
            self.start(text);
            return;
        }
        self.composition.text = text.to_owned();
        let len = self.composition.grapheme_count();
        self.composition.cursor = cursor.map_or(len, |c| c.min(len));
        self.notify();
    }

    /// Close the composition and return its text. Empty when idle.
    pub fn commit(&mut self) -> String {
        if !self.composition.is_composing {
            return String::new();
        }
        let text = std::mem::take(&mut self.composition.text);
        self.reset();
        text
    }

    /// Discard the composition. No-op when idle.
    pub fn cancel(&mut self) {
        if self.composition.is_composing {
            self.composition.text.clear();
            self.reset();
        }
    }

    /// Set the language tag.
    pub fn set_language(&mut self, lang: impl Into<String>) {
        self.composition.lang = Some(lang.into());
        self.notify();
    }

    /// Apply an editing key to the open composition.
    ///
    /// Handles escape (cancel), return/linefeed (commit), left/right,
    /// backspace/delete, and plain character or space insertion at the
    /// cursor. A commit hands back the text; the listener has already seen
    /// the closed, empty composition by then.
    pub fn process_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if !self.composition.is_composing {
            return KeyOutcome::Ignored;
        }
        let cursor = self.composition.cursor;
        let len = self.composition.grapheme_count();
        match key.name {
            KeyName::Escape => self.cancel(),
            KeyName::Return | KeyName::Linefeed => return KeyOutcome::Committed(self.commit()),
            KeyName::Left if cursor > 0 => {
                self.composition.cursor -= 1;
                self.notify();
            }
            KeyName::Right if cursor < len => {
                self.composition.cursor += 1;
                self.notify();
            }
            KeyName::Backspace if cursor > 0 => {
                self.remove_grapheme(cursor - 1);
                self.composition.cursor -= 1;
                self.notify();
            }
            KeyName::Delete if cursor < len => {
                self.remove_grapheme(cursor);
                self.notify();
            }
            KeyName::Char(c) if !(key.ctrl() || key.meta() || key.alt()) => self.insert(c),
            KeyName::Space if key.modifiers.is_empty() => self.insert(' '),
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    fn insert(&mut self, c: char) {
        let at = self.composition.byte_offset(self.composition.cursor);
        self.composition.text.insert(at, c);
        // Inserting may merge with a neighbouring cluster (combining jamo).
        let before = self.composition.text[..at + c.len_utf8()]
            .graphemes(true)
            .count();
        self.composition.cursor = before;
        self.notify();
    }

    fn remove_grapheme(&mut self, index: usize) {
        let start = self.composition.byte_offset(index);
        let end = self.composition.byte_offset(index + 1);
        self.composition.text.replace_range(start..end, "");
    }

    fn reset(&mut self) {
        self.composition.is_composing = false;
        self.composition.cursor = 0;
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.composition);
        }
    }
}

// ============================================================================
// Composer
// ============================================================================

/// What a chunk did to the composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Idle and not a lead: the chunk passes through.
    Passthrough,
    /// A composition opened with the chunk.
    Started,
    /// The chunk was appended to the open composition.
    Updated,
    /// The composition committed this text.
    Committed(String),
}

/// Outcome of feeding one chunk to the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImeStep {
    /// True when the chunk was absorbed and nothing reaches the key decoder.
    pub skip: bool,
    /// What continues to the key decoder when `skip` is false. On commit
    /// this is the committed text plus the terminator if it was CR or LF.
    pub payload: String,
    /// The state change.
    pub transition: Transition,
}

impl ImeStep {
    fn absorbed(transition: Transition) -> Self {
        Self {
            skip: true,
            payload: String::new(),
            transition,
        }
    }
}

/// Chunk-driven composition state machine.
///
/// ```
/// use weft_core::ime::{ImeComposer, Transition};
///
/// let mut ime = ImeComposer::new();
/// assert!(ime.check("한").skip);
/// assert!(ime.check("글").skip);
/// let step = ime.check(" ");
/// assert!(!step.skip);
/// assert_eq!(step.payload, "한글");
/// assert_eq!(step.transition, Transition::Committed("한글".into()));
/// ```
#[derive(Debug, Default)]
pub struct ImeComposer {
    handler: ImeHandler,
}

impl ImeComposer {
    /// Create an idle composer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a composition is open.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.handler.is_composing()
    }

    /// Uncommitted text.
    #[must_use]
    pub fn buffer(&self) -> &str {
        self.handler.text()
    }

    /// The underlying handler.
    #[must_use]
    pub fn handler(&self) -> &ImeHandler {
        &self.handler
    }

    /// Mutable access to the handler, e.g. to register a listener.
    pub fn handler_mut(&mut self) -> &mut ImeHandler {
        &mut self.handler
    }

    /// Feed one chunk.
    pub fn check(&mut self, chunk: &str) -> ImeStep {
        if !self.handler.is_composing() {
            return match chunk.chars().next() {
                Some(c) if is_composition_lead(c) => {
                    trace!(chunk, "composition started");
                    self.handler.start(chunk);
                    ImeStep::absorbed(Transition::Started)
                }
                _ => ImeStep {
                    skip: false,
                    payload: chunk.to_owned(),
                    transition: Transition::Passthrough,
                },
            };
        }

        if is_terminator(chunk) {
            let text = self.handler.commit();
            trace!(text = %text, "composition committed");
            let mut payload = text.clone();
            if matches!(chunk, "\r" | "\n") {
                payload.push_str(chunk);
            }
            return ImeStep {
                skip: false,
                payload,
                transition: Transition::Committed(text),
            };
        }

        let mut text = self.handler.text().to_owned();
        text.push_str(chunk);
        self.handler.update(&text, None);
        ImeStep::absorbed(Transition::Updated)
    }

    /// Discard any open composition. Safe to call when idle.
    pub fn cancel(&mut self) {
        self.handler.cancel();
    }

    /// Commit immediately, returning the text if a composition was open.
    pub fn end_composition(&mut self) -> Option<String> {
        self.is_composing().then(|| self.handler.commit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::event::Modifiers;

    fn key(name: KeyName) -> KeyEvent {
        KeyEvent::new(name, "")
    }

    #[test]
    fn lead_ranges() {
        for c in ['ᄀ', 'ㄱ', '한', 'ひ', 'カ', '㐀', '中', IDEOGRAPHIC_SPACE] {
            assert!(is_composition_lead(c), "{c:?} should lead");
        }
        for c in ['a', ' ', '1', 'é', '\x1b', '🎉', 'ｱ'] {
            assert!(!is_composition_lead(c), "{c:?} should not lead");
        }
    }

    #[test]
    fn hangul_buffering() {
        let mut ime = ImeComposer::new();

        let step = ime.check("한");
        assert!(step.skip);
        assert_eq!(step.transition, Transition::Started);
        assert!(ime.is_composing());

        let step = ime.check("글");
        assert!(step.skip);
        assert_eq!(step.transition, Transition::Updated);
        assert_eq!(ime.buffer(), "한글");

        let step = ime.check(" ");
        assert!(!step.skip);
        assert_eq!(step.payload, "한글");
        assert!(!ime.is_composing());
        assert_eq!(ime.buffer(), "");
    }

    #[test]
    fn newline_terminator_is_appended() {
        let mut ime = ImeComposer::new();
        ime.check("日");
        ime.check("本");
        let step = ime.check("\r");
        assert_eq!(step.payload, "日本\r");
        assert_eq!(step.transition, Transition::Committed("日本".into()));

        ime.check("か");
        assert_eq!(ime.check("\n").payload, "か\n");
    }

    #[test]
    fn ideographic_space_commits() {
        let mut ime = ImeComposer::new();
        ime.check("カ");
        let step = ime.check("\u{3000}");
        assert_eq!(step.payload, "カ");
    }

    #[test]
    fn non_script_chunks_join_open_composition() {
        let mut ime = ImeComposer::new();
        ime.check("한");
        assert!(ime.check("a").skip);
        assert_eq!(ime.buffer(), "한a");
    }

    #[test]
    fn idle_passthrough() {
        let mut ime = ImeComposer::new();
        let step = ime.check("x");
        assert!(!step.skip);
        assert_eq!(step.payload, "x");
        assert_eq!(step.transition, Transition::Passthrough);
        assert_eq!(ime.check(" ").transition, Transition::Passthrough);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut ime = ImeComposer::new();
        ime.check("한");
        ime.cancel();
        let after_one = ime.handler().composition().clone();
        ime.cancel();
        assert_eq!(ime.handler().composition(), &after_one);
        assert!(!ime.is_composing());
        assert_eq!(ime.buffer(), "");
    }

    #[test]
    fn end_composition_flushes() {
        let mut ime = ImeComposer::new();
        assert_eq!(ime.end_composition(), None);
        ime.check("中");
        ime.check("文");
        assert_eq!(ime.end_composition(), Some("中文".into()));
        assert_eq!(ime.end_composition(), None);
    }

    #[test]
    fn handler_update_opens_composition() {
        let mut ime = ImeHandler::new();
        ime.update("abc", Some(1));
        assert!(ime.is_composing());
        assert_eq!(ime.composition().cursor, 3);
        ime.update("abcd", Some(10));
        assert_eq!(ime.composition().cursor, 4);
        ime.update("abcd", Some(2));
        assert_eq!(ime.composition().cursor, 2);
    }

    #[test]
    fn handler_cursor_edits() {
        let mut ime = ImeHandler::new();
        ime.start("가나다");
        assert!(ime.process_key(&key(KeyName::Left)).handled());
        assert!(ime.process_key(&key(KeyName::Backspace)).handled());
        assert_eq!(ime.text(), "가다");
        assert_eq!(ime.composition().cursor, 1);
        assert!(ime.process_key(&key(KeyName::Delete)).handled());
        assert_eq!(ime.text(), "가");
        assert!(!ime.process_key(&key(KeyName::Delete)).handled());
        assert!(ime.process_key(&key(KeyName::Char('라'))).handled());
        assert_eq!(ime.text(), "가라");
        assert_eq!(ime.composition().cursor, 2);
        assert!(!ime.process_key(&key(KeyName::Right)).handled());
        assert!(ime.process_key(&key(KeyName::Space)).handled());
        assert_eq!(ime.text(), "가라 ");
    }

    #[test]
    fn handler_ignores_modified_characters() {
        let mut ime = ImeHandler::new();
        ime.start("a");
        let ctrl_b = key(KeyName::Char('b')).with_modifiers(Modifiers::CTRL);
        assert!(!ime.process_key(&ctrl_b).handled());
        assert!(!ime.process_key(&key(KeyName::F(1))).handled());
        assert_eq!(ime.text(), "a");
    }

    #[test]
    fn handler_return_commits_and_escape_cancels() {
        let mut ime = ImeHandler::new();
        ime.start("x");
        assert_eq!(
            ime.process_key(&key(KeyName::Return)),
            KeyOutcome::Committed("x".into())
        );
        assert!(!ime.is_composing());
        assert!(!ime.process_key(&key(KeyName::Char('y'))).handled());

        ime.start("y");
        assert_eq!(ime.process_key(&key(KeyName::Escape)), KeyOutcome::Handled);
        assert!(!ime.is_composing());
        assert_eq!(ime.text(), "");
    }

    #[test]
    fn linefeed_commit_after_edits_returns_text() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut ime = ImeHandler::new();
        ime.on_change(move |c| sink.lock().unwrap().push((c.is_composing, c.text.clone())));

        ime.start("日");
        ime.process_key(&key(KeyName::Char('本')));
        let outcome = ime.process_key(&key(KeyName::Linefeed));
        assert_eq!(outcome, KeyOutcome::Committed("日本".into()));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.last(), Some(&(false, String::new())));
        assert_eq!(ime.process_key(&key(KeyName::Return)), KeyOutcome::Ignored);
    }

    #[test]
    fn cursor_counts_graphemes() {
        let mut ime = ImeHandler::new();
        // Decomposed jamo form one grapheme.
        ime.start("\u{1100}\u{1161}\u{11A8}a");
        assert_eq!(ime.composition().grapheme_count(), 2);
        assert_eq!(ime.composition().cursor, 2);
        ime.process_key(&key(KeyName::Left));
        ime.process_key(&key(KeyName::Backspace));
        assert_eq!(ime.text(), "a");
    }

    #[test]
    fn cursor_column_uses_display_width() {
        let mut ime = ImeHandler::new();
        ime.start("한a글");
        assert_eq!(ime.composition().cursor_column(), 5);
        ime.process_key(&key(KeyName::Left));
        assert_eq!(ime.composition().cursor_column(), 3);
        assert_eq!(ime.composition().width(), 5);
    }

    #[test]
    fn listener_sees_every_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut ime = ImeHandler::new();
        ime.on_change(move |c| sink.lock().unwrap().push(c.text.clone()));

        ime.start("a");
        ime.update("ab", None);
        ime.set_language("ko");
        ime.commit();
        ime.cancel();

        assert_eq!(*seen.lock().unwrap(), ["a", "ab", "ab", ""]);
        assert_eq!(ime.composition().lang.as_deref(), Some("ko"));
    }

    #[test]
    fn commit_when_idle_is_empty() {
        let mut ime = ImeHandler::new();
        assert_eq!(ime.commit(), "");
        assert!(!ime.process_key(&key(KeyName::Char('a'))).handled());
    }
}
