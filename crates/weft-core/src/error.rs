#![forbid(unsafe_code)]

//! Capability loading errors.
//!
//! Every failure the terminfo/termcap layer can hit is a [`CapsError`]. None
//! of them reach widget code: the resolver records them as diagnostics and
//! falls back to the next source. Input decoding has no error type at all;
//! unrecognized input decodes to `None` or to [`crate::event::KeyName::Unknown`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Standard result type for capability decoding.
pub type Result<T> = std::result::Result<T, CapsError>;

/// Capability loading failure.
#[derive(Debug, Error)]
pub enum CapsError {
    /// The data was found but could not be decoded.
    #[error("{label}: malformed capability data: {reason}")]
    Format {
        /// Where the data came from (file path, `TERMCAP`, `<embedded>`).
        label: String,
        /// What was wrong with it.
        reason: FormatReason,
    },

    /// No terminfo file or termcap entry exists for the terminal.
    #[error("no capability entry for terminal {terminal:?}")]
    NotFound {
        /// The terminal name that was looked up.
        terminal: String,
    },

    /// A capability file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl CapsError {
    /// Build a [`CapsError::Format`].
    pub(crate) fn format(label: impl Into<String>, reason: FormatReason) -> Self {
        Self::Format {
            label: label.into(),
            reason,
        }
    }

    /// Build a [`CapsError::NotFound`].
    pub(crate) fn not_found(terminal: impl Into<String>) -> Self {
        Self::NotFound {
            terminal: terminal.into(),
        }
    }

    /// True for malformed data.
    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// True when the terminal has no entry anywhere.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The format reason, if this is a format error.
    #[must_use]
    pub const fn format_reason(&self) -> Option<&FormatReason> {
        match self {
            Self::Format { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Why a capability source failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatReason {
    /// The first two bytes are not a terminfo magic number.
    #[error("bad magic {0:#06x}")]
    BadMagic(u16),

    /// The header declares more data than the buffer holds.
    #[error("truncated: need {needed} bytes, have {actual}")]
    Truncated {
        /// Bytes required by the header.
        needed: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// Bytes follow the legacy sections but do not form an extended header.
    #[error("extended data without extended header")]
    MissingExtendedHeader,

    /// A header count is negative.
    #[error("negative {0} count in header")]
    NegativeCount(&'static str),

    /// A string offset points outside its table or the string is unterminated.
    #[error("string offset {offset} outside {len}-byte table")]
    BadStringOffset {
        /// Offending offset.
        offset: usize,
        /// Size of the string table.
        len: usize,
    },

    /// The extended header's string-table item count disagrees with its
    /// capability counts.
    #[error("extended table declares {declared} items, expected {expected}")]
    ExtendedItemCount {
        /// Item count from the header.
        declared: usize,
        /// Value strings plus capability names.
        expected: usize,
    },

    /// The names section is empty or not terminated.
    #[error("missing terminal names")]
    MissingNames,

    /// A termcap `tc=` chain is too deep or cyclic.
    #[error("termcap tc= chain through {0:?} exceeds depth limit")]
    TcLoop(String),

    /// A termcap `tc=` names an entry that does not exist.
    #[error("termcap tc={0} names no entry")]
    UnresolvedTc(String),
}
