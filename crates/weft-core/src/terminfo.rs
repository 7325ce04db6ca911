#![forbid(unsafe_code)]

//! Compiled terminfo decoder.
//!
//! Reads the binary images `tic` writes (`/usr/share/terminfo/x/xterm`) and
//! turns them into a [`CapabilityStore`].
//!
//! # Layout
//!
//! ```text
//! header      6 x u16: magic, names_size, bools, nums, strs, str_table_size
//! names       names_size bytes, NUL terminated, '|' separated
//! booleans    1 byte each
//! (pad)       1 byte if header + names + booleans is odd
//! numbers     2 bytes each (4 in the 32-bit format)
//! offsets     2 bytes each, into the string table
//! strings     str_table_size bytes
//! (pad)       to an even offset
//! extended    optional, see below
//! ```
//!
//! The extended section (written by `tic -x`) starts with a five-count header:
//! booleans, numbers, strings, table items, table bytes. It is followed by the
//! values, the string value offsets, the name offsets for every extended
//! capability, and one table holding value strings then names. Name offsets
//! are relative to the end of the value strings.
//!
//! Both magic numbers (`0o432` for 16-bit numbers, `0o1036` for 32-bit) are
//! accepted in either byte order. Negative numbers and string offsets (`-1`
//! absent, `-2` cancelled) never become values.

use crate::capability_names::CapKind;
use crate::capability_store::{CapValue, CapabilityStore};
use crate::error::{CapsError, FormatReason, Result};

#[cfg(feature = "tracing")]
use crate::logging::trace;
#[cfg(not(feature = "tracing"))]
use crate::trace;

/// Magic number of the classic format with 16-bit numbers.
pub const MAGIC_LEGACY: u16 = 0o432;

/// Magic number of the ncurses format with 32-bit numbers.
pub const MAGIC_32BIT: u16 = 0o1036;

const HEADER_LEN: usize = 12;
const EXT_HEADER_LEN: usize = 10;

/// Byte order of a compiled image, detected from its magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian, as `tic` writes on every platform.
    Little,
    /// Big-endian, accepted for images from unusual toolchains.
    Big,
}

impl ByteOrder {
    fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::Little => u16::from_le_bytes(bytes),
            Self::Big => u16::from_be_bytes(bytes),
        }
    }

    fn i32(self, bytes: [u8; 4]) -> i32 {
        match self {
            Self::Little => i32::from_le_bytes(bytes),
            Self::Big => i32::from_be_bytes(bytes),
        }
    }
}

/// Decoded legacy header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Byte order the image was written in.
    pub order: ByteOrder,
    /// Bytes per number: 2, or 4 for the 32-bit format.
    pub number_width: usize,
    /// Size of the names section including its NUL.
    pub names_size: usize,
    /// Number of boolean flags.
    pub bool_count: usize,
    /// Number of numeric entries.
    pub num_count: usize,
    /// Number of string offsets.
    pub str_count: usize,
    /// Size of the string table in bytes.
    pub str_table_size: usize,
}

impl Header {
    /// Bytes the legacy sections occupy, header included.
    #[must_use]
    pub fn legacy_len(&self) -> usize {
        HEADER_LEN
            + self.names_size
            + self.bool_count
            + self.bool_padding()
            + self.num_count * self.number_width
            + self.str_count * 2
            + self.str_table_size
    }

    fn bool_padding(&self) -> usize {
        (HEADER_LEN + self.names_size + self.bool_count) % 2
    }
}

/// Extended capabilities as stored in the image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedSection {
    /// Extended booleans, positional.
    pub booleans: Vec<bool>,
    /// Extended numbers, positional; `None` for absent values.
    pub numbers: Vec<Option<i32>>,
    /// Extended strings, positional; `None` for absent values.
    pub strings: Vec<Option<String>>,
    /// Names of every extended capability: booleans, then numbers, then strings.
    pub names: Vec<String>,
}

/// A compiled terminfo image decoded into positional arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminfoImage {
    /// The legacy header.
    pub header: Header,
    /// Terminal aliases, primary first.
    pub names: Vec<String>,
    /// Standard booleans, positional.
    pub booleans: Vec<bool>,
    /// Standard numbers, positional; `None` for absent values.
    pub numbers: Vec<Option<i32>>,
    /// Standard strings, positional; `None` for absent values.
    pub strings: Vec<Option<String>>,
    /// Extended section, when the image has one.
    pub extended: Option<ExtendedSection>,
}

impl TerminfoImage {
    /// Assign the positional arrays onto named capabilities.
    ///
    /// Positions past the end of the standard name tables are dropped.
    /// Extended entries get synthetic keys (`ext_bool_0`, ...) in encounter
    /// order, with their real names recorded as aliases.
    #[must_use]
    pub fn into_store(self) -> CapabilityStore {
        let mut builder = CapabilityStore::builder();
        builder.set_names(self.names);

        for (index, value) in self.booleans.into_iter().enumerate() {
            if value {
                builder.set_boolean_at(index, true);
            }
        }
        for (index, value) in self.numbers.into_iter().enumerate() {
            if let Some(value) = value {
                builder.set_number_at(index, value);
            }
        }
        for (index, value) in self.strings.into_iter().enumerate() {
            if let Some(value) = value {
                builder.set_string_at(index, value);
            }
        }

        if let Some(ext) = self.extended {
            let mut names = ext.names.into_iter();
            let mut assign = |kind: CapKind, index: usize, value: Option<CapValue>| {
                let key = format!("{}{index}", kind.ext_prefix());
                if let Some(name) = names.next() {
                    builder.alias_ext(name, key.clone());
                }
                if let Some(value) = value {
                    builder.set_ext(&key, value);
                }
            };
            for (index, value) in ext.booleans.into_iter().enumerate() {
                assign(CapKind::Boolean, index, Some(CapValue::Bool(value)));
            }
            for (index, value) in ext.numbers.into_iter().enumerate() {
                assign(CapKind::Number, index, value.map(CapValue::Number));
            }
            for (index, value) in ext.strings.into_iter().enumerate() {
                assign(CapKind::String, index, value.map(CapValue::String));
            }
        }

        builder.build()
    }
}

/// Decode a compiled image into a [`CapabilityStore`].
///
/// `label` names the source (usually the file path) in error messages.
///
/// # Errors
///
/// Returns [`CapsError::Format`] for a bad magic number, a buffer shorter
/// than its header declares, extended data without a usable extended header,
/// or string offsets outside their table. No partial store is returned.
pub fn parse(bytes: &[u8], label: &str) -> Result<CapabilityStore> {
    decode(bytes, label).map(TerminfoImage::into_store)
}

/// Decode a compiled image into its positional arrays.
///
/// # Errors
///
/// Same as [`parse`].
pub fn decode(bytes: &[u8], label: &str) -> Result<TerminfoImage> {
    let fail = |reason| CapsError::format(label, reason);
    let header = read_header(bytes).map_err(fail)?;

    let needed = header.legacy_len();
    if bytes.len() < needed {
        return Err(fail(FormatReason::Truncated {
            needed,
            actual: bytes.len(),
        }));
    }

    trace!(
        label,
        names = header.names_size,
        booleans = header.bool_count,
        numbers = header.num_count,
        strings = header.str_count,
        table = header.str_table_size,
        "terminfo header"
    );

    let mut reader = Reader::new(bytes, header.order);
    reader.skip(HEADER_LEN);

    let names = parse_names(reader.take(header.names_size)).map_err(fail)?;
    let booleans = reader.take(header.bool_count).iter().map(|&b| b != 0).collect();
    reader.skip(header.bool_padding());
    let numbers = reader.numbers(header.num_count, header.number_width);
    let offsets = reader.offsets(header.str_count);
    let table = reader.take(header.str_table_size);
    let strings = offsets
        .iter()
        .map(|&offset| string_at(table, offset))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(fail)?;

    reader.skip(reader.pos() % 2);
    let extended = if reader.remaining() == 0 {
        None
    } else {
        Some(parse_extended(&mut reader, header.number_width).map_err(fail)?)
    };

    Ok(TerminfoImage {
        header,
        names,
        booleans,
        numbers,
        strings,
        extended,
    })
}

fn read_header(bytes: &[u8]) -> std::result::Result<Header, FormatReason> {
    if bytes.len() < HEADER_LEN {
        return Err(FormatReason::Truncated {
            needed: HEADER_LEN,
            actual: bytes.len(),
        });
    }
    let raw = [bytes[0], bytes[1]];
    let (order, number_width) = match (u16::from_le_bytes(raw), u16::from_be_bytes(raw)) {
        (MAGIC_LEGACY, _) => (ByteOrder::Little, 2),
        (MAGIC_32BIT, _) => (ByteOrder::Little, 4),
        (_, MAGIC_LEGACY) => (ByteOrder::Big, 2),
        (_, MAGIC_32BIT) => (ByteOrder::Big, 4),
        (magic, _) => return Err(FormatReason::BadMagic(magic)),
    };

    let mut reader = Reader::new(bytes, order);
    reader.skip(2);
    let mut count = |what| reader.count(what);
    Ok(Header {
        order,
        number_width,
        names_size: count("names")?,
        bool_count: count("boolean")?,
        num_count: count("number")?,
        str_count: count("string")?,
        str_table_size: count("string table")?,
    })
}

fn parse_names(section: &[u8]) -> std::result::Result<Vec<String>, FormatReason> {
    let end = section
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(section.len());
    let names: Vec<String> = String::from_utf8_lossy(&section[..end])
        .split('|')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect();
    if names.is_empty() {
        return Err(FormatReason::MissingNames);
    }
    Ok(names)
}

fn parse_extended(
    reader: &mut Reader<'_>,
    number_width: usize,
) -> std::result::Result<ExtendedSection, FormatReason> {
    if reader.remaining() < EXT_HEADER_LEN {
        return Err(FormatReason::MissingExtendedHeader);
    }
    let bool_count = reader.count("extended boolean")?;
    let num_count = reader.count("extended number")?;
    let str_count = reader.count("extended string")?;
    let items = reader.count("extended table item")?;
    let table_size = reader.count("extended table")?;

    let name_count = bool_count + num_count + str_count;
    let needed = bool_count
        + bool_count % 2
        + num_count * number_width
        + (str_count + name_count) * 2
        + table_size;
    if reader.remaining() < needed {
        return Err(FormatReason::Truncated {
            needed: reader.pos() + needed,
            actual: reader.len(),
        });
    }

    trace!(
        booleans = bool_count,
        numbers = num_count,
        strings = str_count,
        items,
        table = table_size,
        "terminfo extended header"
    );

    let booleans = reader.take(bool_count).iter().map(|&b| b != 0).collect();
    reader.skip(bool_count % 2);
    let numbers = reader.numbers(num_count, number_width);
    let value_offsets = reader.offsets(str_count);
    let name_offsets = reader.offsets(name_count);

    // Writers count either every value slot or only the present values.
    let expected = str_count + name_count;
    let present = value_offsets.iter().filter(|&&offset| offset >= 0).count() + name_count;
    if items != expected && items != present {
        return Err(FormatReason::ExtendedItemCount {
            declared: items,
            expected,
        });
    }
    let table = reader.take(table_size);

    let strings = value_offsets
        .iter()
        .map(|&offset| string_at(table, offset))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Names start after the value strings.
    let names_base: usize = strings.iter().flatten().map(|s| s.len() + 1).sum();
    let name_table = table.get(names_base..).unwrap_or_default();
    let names = name_offsets
        .iter()
        .map(|&offset| string_at(name_table, offset).map(Option::unwrap_or_default))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ExtendedSection {
        booleans,
        numbers,
        strings,
        names,
    })
}

/// The NUL-terminated string at `offset`, or `None` for a negative offset.
///
/// Bytes map one-to-one onto `U+0000..=U+00FF` so 8-bit sequences survive.
fn string_at(table: &[u8], offset: i16) -> std::result::Result<Option<String>, FormatReason> {
    if offset < 0 {
        return Ok(None);
    }
    let start = offset as usize;
    let bad = FormatReason::BadStringOffset {
        offset: start,
        len: table.len(),
    };
    let tail = table.get(start..).ok_or_else(|| bad.clone())?;
    let end = tail.iter().position(|&b| b == 0).ok_or(bad)?;
    Ok(Some(tail[..end].iter().map(|&b| char::from(b)).collect()))
}

/// Bounds-checked cursor over an image.
///
/// Callers check sizes up front, so reads past the end yield zeros instead of
/// failing.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8], order: ByteOrder) -> Self {
        Self {
            bytes,
            pos: 0,
            order,
        }
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let start = self.pos.min(self.bytes.len());
        let end = self.pos.saturating_add(n).min(self.bytes.len());
        self.pos = self.pos.saturating_add(n);
        &self.bytes[start..end]
    }

    fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        let src = self.take(N);
        out[..src.len()].copy_from_slice(src);
        out
    }

    fn i16(&mut self) -> i16 {
        let raw = self.array::<2>();
        self.order.u16(raw) as i16
    }

    fn count(&mut self, what: &'static str) -> std::result::Result<usize, FormatReason> {
        usize::try_from(self.i16()).map_err(|_| FormatReason::NegativeCount(what))
    }

    fn numbers(&mut self, count: usize, width: usize) -> Vec<Option<i32>> {
        (0..count)
            .map(|_| {
                let value = if width == 4 {
                    let raw = self.array::<4>();
                    self.order.i32(raw)
                } else {
                    i32::from(self.i16())
                };
                (value >= 0).then_some(value)
            })
            .collect()
    }

    fn offsets(&mut self, count: usize) -> Vec<i16> {
        (0..count).map(|_| self.i16()).collect()
    }
}
