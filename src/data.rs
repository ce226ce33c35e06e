//! Data part encoding
//!
//! The bytes encoded into a QR Code symbol consist of two parts,
//! the first part are actual information one wants to encode,
//! the second part error correction bytes.
//!
//! The functions in this module can be used to compute the segments,
//! the data codewords and the final codeword sequence.
//!
//! There is no reason for an end user of the library to call them directly
//! but they can be useful if one needs to work on a lower level.
use alloc::vec::Vec;

pub use crate::encodation::planner::{raw_split, segments_for};
pub use crate::encodation::{BitBuffer, Mode, Segment, ShiftJis};
use crate::errorcode;
use crate::version::{ErrorCorrectionLevel, Version};
use crate::EncodingError;

/// Encode segments to the data codewords of a symbol.
///
/// The result includes terminator and padding, so its length is the
/// number of data codewords of `version` and `level`.
pub fn encode_data(
    segments: &[Segment],
    version: Version,
    level: ErrorCorrectionLevel,
) -> Result<Vec<u8>, EncodingError> {
    crate::encodation::encode_data(segments, version, level)
}

/// Compute the full codeword sequence, data and error correction
/// codewords interleaved as they are placed in the symbol.
pub fn codewords(
    segments: &[Segment],
    version: Version,
    level: ErrorCorrectionLevel,
) -> Result<Vec<u8>, EncodingError> {
    let data = encode_data(segments, version, level)?;
    Ok(errorcode::interleave(&data, version, level))
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_codewords_hello_world() {
    let segments = segments_for("HELLO WORLD", Version::MIN, None).unwrap();
    let cw = codewords(&segments, Version::MIN, ErrorCorrectionLevel::M).unwrap();
    assert_eq!(cw.len(), 26);
    assert_eq!(&cw[..4], &[0x20, 0x5B, 0x0B, 0x78]);
    assert_eq!(&cw[16..], &[196, 35, 39, 119, 235, 215, 231, 226, 93, 23]);
}

#[test]
fn test_invalid_data_never_reaches_encoder() {
    let mapper = |c: char| -> Option<u16> { (c == '点').then_some(0x935F) };
    let cases = [
        (Mode::Numeric, "12a", Some('a')),
        (Mode::Numeric, "0042", None),
        (Mode::Alphanumeric, "abc", Some('a')),
        (Mode::Alphanumeric, "AB-C", None),
        (Mode::Kanji, "点x", Some('x')),
        (Mode::Kanji, "点点", None),
        (Mode::Byte, "any thing", None),
    ];
    for (mode, text, invalid) in cases {
        let segment = Segment::with_mode(mode, text, Some(&mapper));
        match invalid {
            Some(c) => assert_eq!(segment, Err(EncodingError::InvalidCharacter(c, mode))),
            None => {
                let segments = [segment.unwrap()];
                let data = encode_data(&segments, Version::MIN, ErrorCorrectionLevel::M).unwrap();
                assert_eq!(data[0] >> 4, mode.indicator());
            }
        }
    }
}
