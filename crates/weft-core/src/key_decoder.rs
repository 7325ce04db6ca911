#![forbid(unsafe_code)]

//! Key decoder.
//!
//! [`decode`] classifies one input chunk into a [`KeyEvent`]. It is a pure
//! function: no state survives between calls, it never blocks, and it never
//! fails. Input it cannot classify comes back as `None` (not a key) or as
//! [`KeyName::Unknown`] (an escape sequence of unrecognized shape).
//!
//! # Grammar
//!
//! | Chunk | Result |
//! |-------|--------|
//! | `\r` `\n` `\t` `\b` DEL ESC space | `return` `linefeed` `tab` `backspace` `backspace` `escape` `space` |
//! | other C0 control | Ctrl + letter (`\x01` is `C-a`), `null` for NUL |
//! | any other single character | that character |
//! | ESC + one character | the same rules plus Meta |
//! | ESC `[` ... | CSI, see [`decode`] |
//! | ESC `O` x | SS3: arrows, `home`/`end`, `f1`-`f4` |
//!
//! [`split_sequences`] cuts a run of input into chunks of that shape so a
//! burst of keys read at once decodes key by key.

use crate::event::{KeyEvent, KeyName, Modifiers};

const ESC: char = '\x1b';

/// Longest CSI sequence [`split_sequences`] keeps together.
pub const MAX_CSI_LEN: usize = 256;

/// Decode one input chunk.
///
/// CSI sequences ending in `~` carry a key code; with exactly two
/// `;`-separated parameters the first is a modifier mask (`2` shift, `3`
/// alt, `5` ctrl, combinations up to `14`) and the second the code.
///
/// ```
/// use weft_core::key_decoder::decode;
/// use weft_core::event::KeyName;
///
/// assert_eq!(decode("\r").unwrap().name, KeyName::Return);
/// assert_eq!(decode("\x1b[A").unwrap().name, KeyName::Up);
/// assert_eq!(decode("\x1b[3~").unwrap().name, KeyName::Delete);
/// assert_eq!(decode("\x1bOP").unwrap().name, KeyName::F(1));
///
/// let ctrl_a = decode("\x01").unwrap();
/// assert_eq!(ctrl_a.name, KeyName::Char('a'));
/// assert!(ctrl_a.ctrl());
///
/// assert!(decode("ab").is_none());
/// ```
#[must_use]
pub fn decode(chunk: &str) -> Option<KeyEvent> {
    let mut chars = chunk.chars();
    let first = chars.next()?;
    let rest = chars.as_str();

    if rest.is_empty() {
        let (name, modifiers) = single(first);
        return Some(KeyEvent::new(name, chunk).with_modifiers(modifiers));
    }

    if first != ESC {
        return None;
    }

    let mut tail = rest.chars();
    let second = tail.next()?;
    let body = tail.as_str();

    let (name, modifiers) = if body.is_empty() {
        let (name, modifiers) = single(second);
        (name, modifiers | Modifiers::META)
    } else {
        match second {
            '[' => csi(body),
            'O' => (ss3(body), Modifiers::NONE),
            _ => (KeyName::Unknown, Modifiers::NONE),
        }
    };
    Some(KeyEvent::new(name, chunk).with_modifiers(modifiers))
}

/// Bare keys with their own names.
fn special(c: char) -> Option<KeyName> {
    Some(match c {
        '\r' => KeyName::Return,
        '\n' => KeyName::Linefeed,
        '\t' => KeyName::Tab,
        '\x08' | '\x7f' => KeyName::Backspace,
        ESC => KeyName::Escape,
        ' ' => KeyName::Space,
        _ => return None,
    })
}

fn single(c: char) -> (KeyName, Modifiers) {
    if let Some(name) = special(c) {
        return (name, Modifiers::NONE);
    }
    match u32::from(c) {
        0 => (KeyName::Null, Modifiers::NONE),
        code @ 1..=0x1f => {
            // 0x01 -> 'a' ... 0x1a -> 'z', then '\\' ']' '^' '_'.
            let letter = char::from_u32(code + 64)
                .unwrap_or('@')
                .to_ascii_lowercase();
            (KeyName::Char(letter), Modifiers::CTRL)
        }
        _ => (KeyName::Char(c), Modifiers::NONE),
    }
}

fn csi(body: &str) -> (KeyName, Modifiers) {
    let parts: Vec<&str> = body.split(';').collect();
    let last = parts.last().copied().unwrap_or_default();
    let mut modifiers = Modifiers::NONE;

    if last.len() > 1
        && let Some(code) = last.strip_suffix('~')
    {
        if let [mask, _] = parts.as_slice() {
            modifiers = modifier_mask(mask);
        }
        if let Some(name) = csi_code(code) {
            return (name, modifiers);
        }
    }

    let name = match body {
        "A" => KeyName::Up,
        "B" => KeyName::Down,
        "C" => KeyName::Right,
        "D" => KeyName::Left,
        "Z" => return (KeyName::Tab, modifiers | Modifiers::SHIFT),
        "H" => KeyName::Home,
        "F" => KeyName::End,
        _ => KeyName::Unknown,
    };
    (name, modifiers)
}

/// Leading decimal digits, as a lenient integer parse.
fn leading_number(text: &str) -> Option<u32> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

fn modifier_mask(param: &str) -> Modifiers {
    let shift = Modifiers::SHIFT;
    let alt = Modifiers::ALT;
    let ctrl = Modifiers::CTRL;
    match leading_number(param) {
        Some(2 | 8) => shift,
        Some(3 | 9) => alt,
        Some(4 | 10) => shift | alt,
        Some(5 | 11) => ctrl,
        Some(6 | 12) => shift | ctrl,
        Some(7 | 13) => alt | ctrl,
        Some(14) => shift | alt | ctrl,
        _ => Modifiers::NONE,
    }
}

fn csi_code(code: &str) -> Option<KeyName> {
    Some(match code {
        "1" | "7" => KeyName::Home,
        "2" => KeyName::Insert,
        "3" => KeyName::Delete,
        "4" | "8" => KeyName::End,
        "5" => KeyName::PageUp,
        "6" => KeyName::PageDown,
        "11" => KeyName::F(1),
        "12" => KeyName::F(2),
        "13" => KeyName::F(3),
        "14" => KeyName::F(4),
        "15" => KeyName::F(5),
        "17" => KeyName::F(6),
        "18" => KeyName::F(7),
        "19" => KeyName::F(8),
        "20" => KeyName::F(9),
        "21" => KeyName::F(10),
        "23" => KeyName::F(11),
        "24" => KeyName::F(12),
        _ => return None,
    })
}

fn ss3(body: &str) -> KeyName {
    match body {
        "A" => KeyName::Up,
        "B" => KeyName::Down,
        "C" => KeyName::Right,
        "D" => KeyName::Left,
        "F" => KeyName::End,
        "H" => KeyName::Home,
        "P" => KeyName::F(1),
        "Q" => KeyName::F(2),
        "R" => KeyName::F(3),
        "S" => KeyName::F(4),
        _ => KeyName::Unknown,
    }
}

// ============================================================================
// Splitting
// ============================================================================

/// Split `input` into key-sized chunks.
///
/// CSI sequences run to their final byte (capped at [`MAX_CSI_LEN`]), SS3
/// sequences take one final byte (`@` through `~`; otherwise `ESC O` is a
/// meta pair), `ESC x` pairs stay together, and everything else is one
/// character per chunk. An incomplete trailing sequence is returned as it
/// stands.
///
/// ```
/// use weft_core::key_decoder::split_sequences;
///
/// let chunks: Vec<&str> = split_sequences("a\x1b[A\x1bOP\x1bx한").collect();
/// assert_eq!(chunks, ["a", "\x1b[A", "\x1bOP", "\x1bx", "한"]);
/// ```
#[must_use]
pub fn split_sequences(input: &str) -> Sequences<'_> {
    Sequences { rest: input }
}

/// Iterator returned by [`split_sequences`].
#[derive(Debug, Clone)]
pub struct Sequences<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Sequences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let len = sequence_len(self.rest)?;
        let (chunk, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(chunk)
    }
}

/// Byte length of the first chunk of `input`.
fn sequence_len(input: &str) -> Option<usize> {
    let mut chars = input.char_indices();
    let (_, first) = chars.next()?;
    let first_len = first.len_utf8();
    if first != ESC {
        return Some(first_len);
    }

    let Some((_, second)) = chars.next() else {
        return Some(first_len);
    };
    match second {
        // A second ESC starts its own chunk.
        ESC => Some(first_len),
        '[' => {
            for (i, c) in chars {
                if i >= MAX_CSI_LEN {
                    return Some(i);
                }
                match c {
                    '\x20'..='\x3f' => {}
                    '\x40'..='\x7e' => return Some(i + 1),
                    _ => return Some(i),
                }
            }
            Some(input.len())
        }
        // SS3 takes one final byte; anything else starts the next key.
        'O' => Some(match chars.next() {
            Some((i, c @ '\x40'..='\x7e')) => i + c.len_utf8(),
            Some(_) => first_len + 1,
            None => input.len(),
        }),
        _ => Some(first_len + second.len_utf8()),
    }
}
