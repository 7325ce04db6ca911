#![forbid(unsafe_code)]

//! Termcap text decoder.
//!
//! Parses classic colon-delimited termcap databases such as `/etc/termcap`
//! or an inline `TERMCAP` value:
//!
//! ```text
//! # comment
//! vt100|dec vt100:\
//!     :am:co#80:li#24:cl=\E[H\E[J:tc=ansi-base:
//! ```
//!
//! Comment lines are dropped and backslash-newline continuations joined, so
//! each logical line holds one entry. Fields are `name` (boolean),
//! `name#value` (number), `name=value` (string), `name@` (cancel), and
//! `tc=other` (include another entry). Earlier fields win over later ones and
//! over anything pulled in through `tc=`.
//!
//! Two-letter termcap codes are mapped onto terminfo long names through
//! [`crate::capability_names`], so a store decoded from termcap answers the
//! same queries as one decoded from terminfo. Codes with no standard meaning
//! are kept verbatim in the extended tables.

use std::collections::HashSet;

use crate::capability_names::{CapKind, from_termcap};
use crate::capability_store::{CapValue, CapabilityStore};
use crate::error::{CapsError, FormatReason, Result};

#[cfg(feature = "tracing")]
use crate::logging::{debug, trace};
#[cfg(not(feature = "tracing"))]
use crate::{debug, trace};

/// Maximum `tc=` nesting depth.
pub const MAX_TC_DEPTH: usize = 16;

/// One field of a termcap entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// A capability definition, value already unescaped.
    Cap(String, CapValue),
    /// `name@`: the capability is explicitly absent.
    Cancel(String),
    /// `tc=name`: include another entry.
    Include(String),
}

/// A single parsed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermcapEntry {
    /// Aliases from the first field, primary first.
    pub names: Vec<String>,
    /// Remaining fields in source order.
    pub fields: Vec<Field>,
}

impl TermcapEntry {
    /// True if `name` is one of this entry's aliases.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|alias| alias == name)
    }
}

/// A parsed termcap database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermcapDb {
    entries: Vec<TermcapEntry>,
}

impl TermcapDb {
    /// Parse every entry in `text`.
    ///
    /// Parsing itself never fails; lines that hold no aliases are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let entries = logical_lines(text)
            .iter()
            .filter_map(|line| parse_entry(line))
            .collect();
        Self { entries }
    }

    /// All entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[TermcapEntry] {
        &self.entries
    }

    /// The first entry listing `name` among its aliases.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TermcapEntry> {
        self.entries.iter().find(|entry| entry.matches(name))
    }

    /// Build the store for `term`, expanding `tc=` references.
    ///
    /// # Errors
    ///
    /// [`CapsError::NotFound`] if no entry names `term`; [`CapsError::Format`]
    /// if a `tc=` chain is too deep or names a missing entry.
    pub fn store_for(&self, term: &str, label: &str) -> Result<CapabilityStore> {
        let entry = self.find(term).ok_or_else(|| CapsError::not_found(term))?;
        debug!(label, term, aliases = ?entry.names, "termcap entry found");

        let mut merged = Merged::default();
        self.merge(entry, &mut merged, 0)
            .map_err(|reason| CapsError::format(label, reason))?;

        let mut builder = CapabilityStore::builder();
        builder.set_names(entry.names.iter().cloned());
        for (code, value) in merged.caps {
            match from_termcap(value.kind(), &code) {
                Some(name) => builder.set(name, value),
                None => builder.set_ext(&code, value),
            }
        }
        Ok(builder.build())
    }

    fn merge(
        &self,
        entry: &TermcapEntry,
        merged: &mut Merged,
        depth: usize,
    ) -> std::result::Result<(), FormatReason> {
        for field in &entry.fields {
            match field {
                Field::Cap(code, value) => merged.define(code, value),
                Field::Cancel(code) => merged.cancel(code),
                Field::Include(target) => {
                    if depth >= MAX_TC_DEPTH {
                        return Err(FormatReason::TcLoop(target.clone()));
                    }
                    let included = self
                        .find(target)
                        .ok_or_else(|| FormatReason::UnresolvedTc(target.clone()))?;
                    trace!(from = ?entry.names.first(), to = %target, depth, "termcap tc= expansion");
                    self.merge(included, merged, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

/// Capabilities accumulated while walking a `tc=` chain.
#[derive(Default)]
struct Merged {
    seen: HashSet<(CapKind, String)>,
    caps: Vec<(String, CapValue)>,
}

impl Merged {
    fn define(&mut self, code: &str, value: &CapValue) {
        if self.seen.insert((value.kind(), code.to_owned())) {
            self.caps.push((code.to_owned(), value.clone()));
        }
    }

    fn cancel(&mut self, code: &str) {
        for kind in [CapKind::Boolean, CapKind::Number, CapKind::String] {
            self.seen.insert((kind, code.to_owned()));
        }
    }
}

/// Parse `text` and build the store for `term`.
///
/// `label` names the source (file path or `TERMCAP`) in error messages.
///
/// # Errors
///
/// See [`TermcapDb::store_for`].
pub fn parse(text: &str, term: &str, label: &str) -> Result<CapabilityStore> {
    TermcapDb::parse(text).store_for(term, label)
}

/// Drop comment lines and join continuations, one entry per returned line.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for raw in text.lines() {
        let line = if current.is_empty() {
            if raw.starts_with('#') {
                continue;
            }
            raw
        } else {
            raw.trim_start_matches([' ', '\t'])
        };
        match line.strip_suffix('\\') {
            Some(body) => current.push_str(body),
            None => {
                current.push_str(line);
                lines.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn parse_entry(line: &str) -> Option<TermcapEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let mut parts = line.split(':');
    let names: Vec<String> = parts
        .next()?
        .split('|')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect();
    if names.is_empty() {
        return None;
    }
    let fields = parts.filter_map(parse_field).collect();
    Some(TermcapEntry { names, fields })
}

fn parse_field(part: &str) -> Option<Field> {
    let part = part.trim();
    // Codes such as `@7` start with a separator character.
    let split = part
        .char_indices()
        .skip(1)
        .find(|&(_, c)| matches!(c, '#' | '=' | '@'))
        .map_or(part.len(), |(i, _)| i);
    let (code, rest) = part.split_at(split);
    if code.is_empty() {
        return None;
    }
    let code = code.to_owned();
    match rest.chars().next() {
        None => Some(Field::Cap(code, CapValue::Bool(true))),
        Some('@') => Some(Field::Cancel(code)),
        Some('#') => parse_number(&rest[1..]).map(|n| Field::Cap(code, CapValue::Number(n))),
        Some('=') if code == "tc" => Some(Field::Include(rest[1..].to_owned())),
        Some(_) => Some(Field::Cap(
            code,
            CapValue::String(unescape(strip_padding(&rest[1..]))),
        )),
    }
}

/// Decimal, or octal with a leading zero.
fn parse_number(value: &str) -> Option<i32> {
    if value.len() > 1 && value.starts_with('0') {
        i32::from_str_radix(&value[1..], 8).ok()
    } else {
        value.parse().ok()
    }
}

/// Drop a leading padding delay such as `50` or `3.5*`.
fn strip_padding(value: &str) -> &str {
    let digits = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    if digits == 0 {
        return value;
    }
    let rest = &value[digits..];
    rest.strip_prefix('*').unwrap_or(rest)
}

/// Expand termcap string escapes.
///
/// Handles `\E` and `\e` (ESC), `\n \r \t \b \f \s`, octal `\NNN` and
/// `\0NNN`, `\\`, `\^`, `\:`, and caret notation `^X` (`^?` is DEL).
///
/// ```
/// use weft_core::termcap::unescape;
///
/// assert_eq!(unescape(r"\E[H\E[2J"), "\x1b[H\x1b[2J");
/// assert_eq!(unescape("^G"), "\x07");
/// assert_eq!(unescape(r"\177"), "\x7f");
/// ```
#[must_use]
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(next) = chars.next() else {
                    out.push('\\');
                    break;
                };
                match next {
                    'E' | 'e' => out.push('\x1b'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'b' => out.push('\x08'),
                    'f' => out.push('\x0c'),
                    's' => out.push(' '),
                    '0'..='7' => {
                        let mut digits = String::from(next);
                        while digits.len() < 3 {
                            match chars.peek() {
                                Some(&d @ '0'..='7') => {
                                    digits.push(d);
                                    chars.next();
                                }
                                _ => break,
                            }
                        }
                        // `\0NNN` carries three digits after the zero.
                        if digits.len() == 3 && digits.starts_with('0') {
                            if let Some(&d @ '0'..='7') = chars.peek() {
                                digits.remove(0);
                                digits.push(d);
                                chars.next();
                            }
                        }
                        let code = u32::from_str_radix(&digits, 8).unwrap_or(0);
                        out.push(char::from_u32(code).unwrap_or('\0'));
                    }
                    other => out.push(other),
                }
            }
            '^' => match chars.next() {
                Some('?') => out.push('\x7f'),
                Some(ctl) => out.push(char::from_u32(u32::from(ctl) & 31).unwrap_or('\0')),
                None => out.push('^'),
            },
            other => out.push(other),
        }
    }
    out
}
