#![forbid(unsafe_code)]

//! Decoded input event types.
//!
//! [`KeyEvent`] is what the key decoder produces for one input chunk, and
//! [`InputEvent`] is what the input pipeline hands to widgets: a keypress or
//! one of the three composition notifications.
//!
//! # Design Notes
//!
//! - Key names render to the conventional lower-case strings (`"up"`,
//!   `"return"`, `"f5"`) through `Display`
//! - `META` is the ESC-prefix modifier; `ALT` comes from CSI modifier
//!   parameters
//! - `Modifiers` use bitflags for easy combination

use std::fmt;

use bitflags::bitflags;

/// Canonical key identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyName {
    /// A literal character, or the letter of a control combination.
    Char(char),
    /// NUL (Ctrl+@ / Ctrl+Space).
    Null,
    /// Carriage return.
    Return,
    /// Line feed.
    Linefeed,
    /// Horizontal tab.
    Tab,
    /// Backspace or DEL.
    Backspace,
    /// Lone escape.
    Escape,
    /// Space bar.
    Space,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Insert.
    Insert,
    /// Delete.
    Delete,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Function key F1-F12.
    F(u8),
    /// An escape sequence that was recognized as one but not classified.
    Unknown,
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Char(c) => return write!(f, "{c}"),
            Self::F(n) => return write!(f, "f{n}"),
            Self::Null => "null",
            Self::Return => "return",
            Self::Linefeed => "linefeed",
            Self::Tab => "tab",
            Self::Backspace => "backspace",
            Self::Escape => "escape",
            Self::Space => "space",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Home => "home",
            Self::End => "end",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::PageUp => "pageup",
            Self::PageDown => "pagedown",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt key, from a CSI modifier parameter.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Meta, sent as an ESC prefix.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// One decoded key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key.
    pub name: KeyName,
    /// The raw input that produced this event.
    pub sequence: String,
    /// Modifier keys.
    pub modifiers: Modifiers,
    /// True while an IME composition is in progress.
    pub is_composing: bool,
    /// Composition text attached by the IME layer, empty otherwise.
    pub composition_data: String,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub fn new(name: KeyName, sequence: impl Into<String>) -> Self {
        Self {
            name,
            sequence: sequence.into(),
            modifiers: Modifiers::NONE,
            is_composing: false,
            composition_data: String::new(),
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.name, KeyName::Char(ch) if ch == c)
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Meta (ESC prefix) is held.
    #[must_use]
    pub const fn meta(&self) -> bool {
        self.modifiers.contains(Modifiers::META)
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Check if Alt modifier is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Combined name in the `C-M-S-name` convention.
    ///
    /// Alt and Meta both render as `M-`.
    ///
    /// ```
    /// use weft_core::event::{KeyEvent, KeyName, Modifiers};
    ///
    /// let key = KeyEvent::new(KeyName::Char('a'), "\x1b\x01")
    ///     .with_modifiers(Modifiers::CTRL | Modifiers::META);
    /// assert_eq!(key.full(), "C-M-a");
    /// ```
    #[must_use]
    pub fn full(&self) -> String {
        let mut out = String::new();
        if self.ctrl() {
            out.push_str("C-");
        }
        if self.meta() || self.alt() {
            out.push_str("M-");
        }
        if self.shift() {
            out.push_str("S-");
        }
        out.push_str(&self.name.to_string());
        out
    }
}

/// Event delivered by the input pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A chunk reached the key decoder.
    ///
    /// `key` is `None` when the chunk is not a recognized key, such as
    /// committed multi-character composition text.
    Keypress {
        /// The chunk as fed to the decoder.
        sequence: String,
        /// The decoded key, if any.
        key: Option<KeyEvent>,
    },
    /// A composition began with this text.
    CompositionStart(String),
    /// The composition buffer now holds this text.
    CompositionUpdate(String),
    /// The composition finished with this text; empty when cancelled.
    CompositionEnd(String),
}

impl InputEvent {
    /// The decoded key for keypress events.
    #[must_use]
    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Keypress { key, .. } => key.as_ref(),
            _ => None,
        }
    }

    /// True for the three composition notifications.
    #[must_use]
    pub const fn is_composition(&self) -> bool {
        !matches!(self, Self::Keypress { .. })
    }
}
