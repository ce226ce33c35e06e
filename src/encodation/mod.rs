//! Implementation of the data encodation using all specified modes.
//!
//! The data of a symbol is a list of [Segment]s. Every segment starts
//! with a 4 bit mode indicator and a character count, followed by the
//! packed characters. After the last segment a terminator and padding
//! fill the symbol's data capacity.
use alloc::{string::String, vec::Vec};

mod alphanumeric;
mod bit_buffer;
mod byte;
mod kanji;
mod mode;
mod numeric;
pub(crate) mod planner;
mod sjis;

#[cfg(test)]
mod tests;

pub use bit_buffer::BitBuffer;
pub use mode::Mode;
#[cfg(feature = "kanji")]
pub use sjis::SystemShiftJis;
pub use sjis::ShiftJis;

use crate::version::{best_version, segments_bit_length, ErrorCorrectionLevel, Version};
use crate::EncodingError;

/// Pad codewords which are alternately appended after the data.
const PAD_CODEWORDS: [u8; 2] = [0xEC, 0x11];

/// A run of data encoded in a single mode.
///
/// Segments can only be built through the constructors which check
/// that the data can be represented in the mode, a segment is always
/// valid.
///
/// ```rust
/// use qrsymbol::{EncodingError, Mode, Segment};
///
/// assert_eq!(Segment::numeric("0815")?.mode(), Mode::Numeric);
/// assert_eq!(
///     Segment::numeric("12a"),
///     Err(EncodingError::InvalidCharacter('a', Mode::Numeric))
/// );
/// # Ok::<(), EncodingError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment(SegmentData);

#[derive(Debug, Clone, PartialEq, Eq)]
enum SegmentData {
    Numeric(String),
    Alphanumeric(String),
    Byte(Vec<u8>),
    Kanji {
        text: String,
        /// 13 bit values
        values: Vec<u16>,
    },
}

impl Segment {
    /// Create a numeric segment, fails if `data` contains a non-digit.
    pub fn numeric(data: &str) -> Result<Self, EncodingError> {
        match data.chars().find(|c| !numeric::is_numeric(*c)) {
            Some(c) => Err(EncodingError::InvalidCharacter(c, Mode::Numeric)),
            None => Ok(Self(SegmentData::Numeric(data.into()))),
        }
    }

    /// Create an alphanumeric segment.
    ///
    /// Only `0-9`, `A-Z` (upper case) and ` $%*+-./:` are allowed.
    pub fn alphanumeric(data: &str) -> Result<Self, EncodingError> {
        match data.chars().find(|c| !alphanumeric::is_alphanumeric(*c)) {
            Some(c) => Err(EncodingError::InvalidCharacter(c, Mode::Alphanumeric)),
            None => Ok(Self(SegmentData::Alphanumeric(data.into()))),
        }
    }

    /// Create a byte segment, any data is allowed. Text should be UTF-8.
    pub fn byte(data: impl Into<Vec<u8>>) -> Self {
        Self(SegmentData::Byte(data.into()))
    }

    /// Create a Kanji segment, every character must map into the Shift JIS Kanji ranges.
    pub fn kanji(data: &str, mapper: &dyn ShiftJis) -> Result<Self, EncodingError> {
        let values = data
            .chars()
            .map(|c| kanji::value(c, mapper).ok_or(EncodingError::InvalidCharacter(c, Mode::Kanji)))
            .collect::<Result<Vec<u16>, _>>()?;
        Ok(Self(SegmentData::Kanji {
            text: data.into(),
            values,
        }))
    }

    /// Create a segment in `mode`.
    ///
    /// The Kanji mode needs a mapper, without one an error is returned.
    pub fn with_mode(
        mode: Mode,
        data: &str,
        kanji: Option<&dyn ShiftJis>,
    ) -> Result<Self, EncodingError> {
        match mode {
            Mode::Numeric => Self::numeric(data),
            Mode::Alphanumeric => Self::alphanumeric(data),
            Mode::Byte => Ok(Self::byte(data)),
            Mode::Kanji => match kanji {
                Some(mapper) => Self::kanji(data, mapper),
                None => match data.chars().next() {
                    Some(c) => Err(EncodingError::InvalidCharacter(c, Mode::Kanji)),
                    None => Ok(Self(SegmentData::Kanji {
                        text: String::new(),
                        values: Vec::new(),
                    })),
                },
            },
        }
    }

    pub fn mode(&self) -> Mode {
        match &self.0 {
            SegmentData::Numeric(_) => Mode::Numeric,
            SegmentData::Alphanumeric(_) => Mode::Alphanumeric,
            SegmentData::Byte(_) => Mode::Byte,
            SegmentData::Kanji { .. } => Mode::Kanji,
        }
    }

    /// Number of characters, for byte segments the number of bytes.
    ///
    /// This is the value of the character count indicator.
    pub fn len(&self) -> usize {
        match &self.0 {
            SegmentData::Numeric(s) | SegmentData::Alphanumeric(s) => s.len(),
            SegmentData::Byte(b) => b.len(),
            SegmentData::Kanji { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bits of the packed characters, without mode and count indicators.
    pub fn bit_length(&self) -> usize {
        self.mode().bit_length(self.len())
    }

    /// The encoded data as bytes, UTF-8 for all modes except byte mode.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.0 {
            SegmentData::Numeric(s)
            | SegmentData::Alphanumeric(s)
            | SegmentData::Kanji { text: s, .. } => s.as_bytes(),
            SegmentData::Byte(b) => b,
        }
    }

    /// Append the packed characters to `buf`.
    pub fn write_into(&self, buf: &mut BitBuffer) {
        match &self.0 {
            SegmentData::Numeric(s) => numeric::write(s, buf),
            SegmentData::Alphanumeric(s) => alphanumeric::write(s, buf),
            SegmentData::Byte(b) => byte::write(b, buf),
            SegmentData::Kanji { values, .. } => kanji::write(values, buf),
        }
    }
}

/// Encode segments into the data codewords of a symbol.
///
/// Writes the segments with their headers, a terminator if there is
/// space, pads to a byte boundary and fills the rest of the data
/// capacity with alternating pad codewords.
pub(crate) fn encode_data(
    segments: &[Segment],
    version: Version,
    level: ErrorCorrectionLevel,
) -> Result<Vec<u8>, EncodingError> {
    let capacity = version.data_bits(level);
    if segments_bit_length(segments, version) > capacity {
        return Err(EncodingError::DataTooLong {
            version,
            level,
            required: best_version(segments, level),
        });
    }

    let mut buf = BitBuffer::with_capacity(capacity);
    for segment in segments {
        let mode = segment.mode();
        buf.put(mode.indicator() as u32, 4);
        buf.put(segment.len() as u32, mode.char_count_bits(version));
        segment.write_into(&mut buf);
    }

    if buf.len() + 4 <= capacity {
        buf.put(0, 4);
    }
    while buf.len() % 8 != 0 {
        buf.put_bit(false);
    }
    let pad_len = (capacity - buf.len()) / 8;
    for pad in PAD_CODEWORDS.iter().cycle().take(pad_len) {
        buf.put(*pad as u32, 8);
    }
    debug_assert_eq!(buf.len(), capacity);
    Ok(buf.into_bytes())
}
