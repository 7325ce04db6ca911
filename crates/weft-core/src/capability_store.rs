#![forbid(unsafe_code)]

//! Immutable terminal capability tables.
//!
//! A [`CapabilityStore`] holds what one terminal supports: its aliases plus
//! boolean, numeric, and string capabilities keyed by terminfo variable name
//! (`auto_right_margin`, `max_colors`, `cursor_address`). Capabilities without
//! a standard name live in separate extended tables.
//!
//! # Invariants
//!
//! 1. **Immutable once built** - stores are produced by
//!    [`CapabilityStoreBuilder::build`] and expose no mutators. Re-resolving a
//!    terminal yields a new store; see [`crate::shared_capabilities`].
//! 2. **Absence means unsupported** - a number or string that is not present
//!    is unsupported. Booleans are only stored when true.
//! 3. **Canonical keys** - standard entries are keyed by long name. Lookups
//!    also accept the short capname (`cup` for `cursor_address`).
//!
//! # Example
//!
//! ```
//! use weft_core::capability_store::CapabilityStore;
//!
//! let store = CapabilityStore::builder()
//!     .with_names(["xterm", "xterm-color"])
//!     .with_boolean("am", true)
//!     .with_number("colors", 8)
//!     .with_string("cup", "\x1b[%i%p1%d;%p2%dH")
//!     .build();
//!
//! assert!(store.boolean("auto_right_margin"));
//! assert_eq!(store.number("max_colors"), Some(8));
//! assert_eq!(store.string("cursor_address"), Some("\x1b[%i%p1%d;%p2%dH"));
//! assert_eq!(store.number("lines"), None);
//! ```

use std::collections::BTreeMap;

use crate::capability_names::{CapKind, canonical_name, name_at};

/// A single capability value, as produced by the text decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapValue {
    /// Boolean flag.
    Bool(bool),
    /// Numeric value.
    Number(i32),
    /// Escape sequence template.
    String(String),
}

impl CapValue {
    /// The table this value belongs in.
    #[must_use]
    pub const fn kind(&self) -> CapKind {
        match self {
            Self::Bool(_) => CapKind::Boolean,
            Self::Number(_) => CapKind::Number,
            Self::String(_) => CapKind::String,
        }
    }
}

/// Capability tables for one terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityStore {
    names: Vec<String>,
    booleans: BTreeMap<&'static str, bool>,
    numbers: BTreeMap<&'static str, i32>,
    strings: BTreeMap<&'static str, String>,
    ext_booleans: BTreeMap<String, bool>,
    ext_numbers: BTreeMap<String, i32>,
    ext_strings: BTreeMap<String, String>,
    ext_aliases: BTreeMap<String, String>,
}

impl CapabilityStore {
    /// Start building a store.
    #[must_use]
    pub fn builder() -> CapabilityStoreBuilder {
        CapabilityStoreBuilder::new()
    }

    // ── Names ──────────────────────────────────────────────────────────

    /// Terminal aliases, primary name first.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The primary terminal name.
    #[must_use]
    pub fn primary_name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    /// The long description `tic` places in the last alias slot.
    ///
    /// Only reported when the entry has more than one alias and the last one
    /// contains a space, which is how terminfo marks descriptions.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self.names.as_slice() {
            [_, .., last] if last.contains(' ') => Some(last.as_str()),
            _ => None,
        }
    }

    /// True if any alias starts with `prefix`.
    #[must_use]
    pub fn is_terminal(&self, prefix: &str) -> bool {
        self.names.iter().any(|name| name.starts_with(prefix))
    }

    // ── Standard capabilities ──────────────────────────────────────────

    /// Whether a boolean capability is set. Unknown names are `false`.
    #[must_use]
    pub fn boolean(&self, name: &str) -> bool {
        canonical_name(CapKind::Boolean, name)
            .and_then(|key| self.booleans.get(key))
            .copied()
            .unwrap_or(false)
    }

    /// A numeric capability, or `None` when unsupported.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<i32> {
        canonical_name(CapKind::Number, name).and_then(|key| self.numbers.get(key).copied())
    }

    /// A string capability, or `None` when unsupported.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        canonical_name(CapKind::String, name)
            .and_then(|key| self.strings.get(key))
            .map(String::as_str)
    }

    /// True if the named capability is present in any standard table.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.boolean(name) || self.number(name).is_some() || self.string(name).is_some()
    }

    /// All set boolean capabilities.
    #[must_use]
    pub fn booleans(&self) -> &BTreeMap<&'static str, bool> {
        &self.booleans
    }

    /// All supported numeric capabilities.
    #[must_use]
    pub fn numbers(&self) -> &BTreeMap<&'static str, i32> {
        &self.numbers
    }

    /// All supported string capabilities.
    #[must_use]
    pub fn strings(&self) -> &BTreeMap<&'static str, String> {
        &self.strings
    }

    // ── Extended capabilities ──────────────────────────────────────────

    /// Synthetic key for an extended name, if the image named it.
    #[must_use]
    pub fn ext_alias(&self, name: &str) -> Option<&str> {
        self.ext_aliases.get(name).map(String::as_str)
    }

    fn ext_key<'a>(&'a self, name: &'a str) -> &'a str {
        self.ext_alias(name).unwrap_or(name)
    }

    /// An extended boolean by synthetic key (`ext_bool_0`) or real name (`AX`).
    #[must_use]
    pub fn ext_boolean(&self, name: &str) -> bool {
        self.ext_booleans
            .get(self.ext_key(name))
            .copied()
            .unwrap_or(false)
    }

    /// An extended number by synthetic key or real name.
    #[must_use]
    pub fn ext_number(&self, name: &str) -> Option<i32> {
        self.ext_numbers.get(self.ext_key(name)).copied()
    }

    /// An extended string by synthetic key or real name.
    #[must_use]
    pub fn ext_string(&self, name: &str) -> Option<&str> {
        self.ext_strings.get(self.ext_key(name)).map(String::as_str)
    }

    /// All set extended booleans.
    #[must_use]
    pub fn ext_booleans(&self) -> &BTreeMap<String, bool> {
        &self.ext_booleans
    }

    /// All extended numbers.
    #[must_use]
    pub fn ext_numbers(&self) -> &BTreeMap<String, i32> {
        &self.ext_numbers
    }

    /// All extended strings.
    #[must_use]
    pub fn ext_strings(&self) -> &BTreeMap<String, String> {
        &self.ext_strings
    }

    /// Total number of capabilities held, standard and extended.
    #[must_use]
    pub fn len(&self) -> usize {
        self.booleans.len()
            + self.numbers.len()
            + self.strings.len()
            + self.ext_booleans.len()
            + self.ext_numbers.len()
            + self.ext_strings.len()
    }

    /// True when no capability is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`CapabilityStore`].
///
/// Decoders use the `set_*` methods; tests and hand-written profiles usually
/// chain the `with_*` forms.
#[derive(Debug, Clone, Default)]
pub struct CapabilityStoreBuilder {
    store: CapabilityStore,
}

impl CapabilityStoreBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the alias list.
    pub fn set_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store.names = names.into_iter().map(Into::into).collect();
    }

    /// Set a boolean by position in the standard table.
    ///
    /// Returns `false` if the index is past the end of the table.
    pub fn set_boolean_at(&mut self, index: usize, value: bool) -> bool {
        let Some(key) = name_at(CapKind::Boolean, index) else {
            return false;
        };
        if value {
            self.store.booleans.insert(key, true);
        } else {
            self.store.booleans.remove(key);
        }
        true
    }

    /// Set a number by position in the standard table.
    pub fn set_number_at(&mut self, index: usize, value: i32) -> bool {
        let Some(key) = name_at(CapKind::Number, index) else {
            return false;
        };
        self.store.numbers.insert(key, value);
        true
    }

    /// Set a string by position in the standard table.
    pub fn set_string_at(&mut self, index: usize, value: impl Into<String>) -> bool {
        let Some(key) = name_at(CapKind::String, index) else {
            return false;
        };
        self.store.strings.insert(key, value.into());
        true
    }

    /// Set a capability by name.
    ///
    /// Standard long names and capnames go to the standard tables; any other
    /// name is stored verbatim in the extended table of the value's kind.
    pub fn set(&mut self, name: &str, value: CapValue) {
        let kind = value.kind();
        match (canonical_name(kind, name), value) {
            (Some(key), CapValue::Bool(true)) => {
                self.store.booleans.insert(key, true);
            }
            (Some(key), CapValue::Bool(false)) => {
                self.store.booleans.remove(key);
            }
            (Some(key), CapValue::Number(n)) => {
                self.store.numbers.insert(key, n);
            }
            (Some(key), CapValue::String(s)) => {
                self.store.strings.insert(key, s);
            }
            (None, value) => self.set_ext(name, value),
        }
    }

    /// Set an extended capability under an explicit key.
    pub fn set_ext(&mut self, key: &str, value: CapValue) {
        match value {
            CapValue::Bool(true) => {
                self.store.ext_booleans.insert(key.to_owned(), true);
            }
            CapValue::Bool(false) => {
                self.store.ext_booleans.remove(key);
            }
            CapValue::Number(n) => {
                self.store.ext_numbers.insert(key.to_owned(), n);
            }
            CapValue::String(s) => {
                self.store.ext_strings.insert(key.to_owned(), s);
            }
        }
    }

    /// Record that extended name `name` refers to synthetic key `key`.
    pub fn alias_ext(&mut self, name: impl Into<String>, key: impl Into<String>) {
        self.store.ext_aliases.insert(name.into(), key.into());
    }

    /// Chaining form of [`set_names`](Self::set_names).
    #[must_use]
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_names(names);
        self
    }

    /// Chaining boolean setter.
    #[must_use]
    pub fn with_boolean(mut self, name: &str, value: bool) -> Self {
        self.set(name, CapValue::Bool(value));
        self
    }

    /// Chaining number setter.
    #[must_use]
    pub fn with_number(mut self, name: &str, value: i32) -> Self {
        self.set(name, CapValue::Number(value));
        self
    }

    /// Chaining string setter.
    #[must_use]
    pub fn with_string(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, CapValue::String(value.into()));
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> CapabilityStore {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CapabilityStore {
        CapabilityStore::builder()
            .with_names(["xterm", "xterm-color", "X11 terminal emulator"])
            .with_boolean("auto_right_margin", true)
            .with_boolean("bw", false)
            .with_number("cols", 80)
            .with_string("clear", "\x1b[H\x1b[2J")
            .build()
    }

    #[test]
    fn names_and_description() {
        let store = sample();
        assert_eq!(store.primary_name(), Some("xterm"));
        assert_eq!(store.description(), Some("X11 terminal emulator"));
        assert!(store.is_terminal("xterm"));
        assert!(!store.is_terminal("vt"));
    }

    #[test]
    fn single_alias_has_no_description() {
        let store = CapabilityStore::builder()
            .with_names(["dumb terminal"])
            .build();
        assert_eq!(store.description(), None);
    }

    #[test]
    fn long_and_short_names_resolve_to_same_entry() {
        let store = sample();
        assert!(store.boolean("am"));
        assert!(store.boolean("auto_right_margin"));
        assert_eq!(store.number("columns"), Some(80));
        assert_eq!(store.number("cols"), Some(80));
        assert_eq!(store.string("clear_screen"), store.string("clear"));
        assert!(store.strings().contains_key("clear_screen"));
    }

    #[test]
    fn false_booleans_are_not_stored() {
        let store = sample();
        assert!(!store.boolean("auto_left_margin"));
        assert!(!store.booleans().contains_key("auto_left_margin"));
        assert_eq!(store.booleans().len(), 1);
    }

    #[test]
    fn unknown_names_are_absent_not_errors() {
        let store = sample();
        assert!(!store.boolean("no_such_cap"));
        assert_eq!(store.number("no_such_cap"), None);
        assert_eq!(store.string("no_such_cap"), None);
        assert!(!store.has("no_such_cap"));
        assert!(store.has("cup") == store.string("cursor_address").is_some());
    }

    #[test]
    fn non_standard_names_go_to_extended_tables() {
        let store = CapabilityStore::builder()
            .with_boolean("XT", true)
            .with_string("Ms", "\x1b]52;%p1%s;%p2%s\x07")
            .build();
        assert!(store.booleans().is_empty());
        assert!(store.ext_boolean("XT"));
        assert_eq!(store.ext_string("Ms"), Some("\x1b]52;%p1%s;%p2%s\x07"));
    }

    #[test]
    fn ext_aliases_resolve_to_synthetic_keys() {
        let mut builder = CapabilityStore::builder();
        builder.set_ext("ext_str_0", CapValue::String("\x1b[3J".into()));
        builder.alias_ext("E3", "ext_str_0");
        let store = builder.build();
        assert_eq!(store.ext_string("ext_str_0"), Some("\x1b[3J"));
        assert_eq!(store.ext_string("E3"), Some("\x1b[3J"));
        assert_eq!(store.ext_alias("E3"), Some("ext_str_0"));
    }

    #[test]
    fn positional_setters_reject_out_of_range() {
        let mut builder = CapabilityStore::builder();
        assert!(builder.set_number_at(0, 132));
        assert!(!builder.set_number_at(39, 1));
        assert!(!builder.set_boolean_at(44, true));
        assert!(!builder.set_string_at(414, "x"));
        let store = builder.build();
        assert_eq!(store.number("columns"), Some(132));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_store() {
        let store = CapabilityStore::default();
        assert!(store.is_empty());
        assert_eq!(store.primary_name(), None);
    }
}
