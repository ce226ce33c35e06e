//! Input data of a symbol.
//!
//! Either plain text, which is split into segments automatically, or
//! a list of [SegmentHint]s, where the caller decides the segmentation
//! and optionally the mode of each segment.
use alloc::{string::String, vec::Vec};

use crate::encodation::{Mode, Segment, ShiftJis};
use crate::EncodingError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum HintData {
    Text(String),
    Bytes(Vec<u8>),
}

/// A caller provided segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentHint {
    data: HintData,
    mode: Option<Mode>,
}

impl SegmentHint {
    /// A text segment, the mode is inferred unless set with [mode](Self::mode).
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            data: HintData::Text(text.into()),
            mode: None,
        }
    }

    /// A binary segment, encoded in byte mode unless another mode is set.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            data: HintData::Bytes(bytes.into()),
            mode: None,
        }
    }

    /// Request a mode for this segment.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    fn is_empty(&self) -> bool {
        match &self.data {
            HintData::Text(t) => t.is_empty(),
            HintData::Bytes(b) => b.is_empty(),
        }
    }

    /// Turn the hint into a segment.
    ///
    /// Returns `None` for empty hints.
    pub(crate) fn resolve(
        &self,
        kanji: Option<&dyn ShiftJis>,
    ) -> Result<Option<Segment>, EncodingError> {
        if self.is_empty() {
            return Ok(None);
        }
        let text = match (&self.data, self.mode) {
            (HintData::Bytes(bytes), None | Some(Mode::Byte)) => {
                return Ok(Some(Segment::byte(bytes.clone())));
            }
            (HintData::Bytes(bytes), Some(mode)) => core::str::from_utf8(bytes).map_err(|_| {
                EncodingError::IncompatibleMode {
                    mode,
                    suggested: Mode::Byte,
                }
            })?,
            (HintData::Text(text), _) => text.as_str(),
        };
        let mode = match self.mode {
            None => Mode::best_for(text, kanji),
            Some(Mode::Kanji) if kanji.is_none() => Mode::Byte,
            Some(mode) if !mode.can_encode(text, kanji) => {
                return Err(EncodingError::IncompatibleMode {
                    mode,
                    suggested: Mode::best_for(text, kanji),
                })
            }
            Some(mode) => mode,
        };
        Segment::with_mode(mode, text, kanji).map(Some)
    }
}

/// Data to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Text which is segmented automatically.
    Text(String),
    /// Explicitly segmented data.
    Segments(Vec<SegmentHint>),
}

impl Input {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(t) => t.is_empty(),
            Self::Segments(s) => s.iter().all(|h| h.is_empty()),
        }
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Self::Text(text.into())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<SegmentHint>> for Input {
    fn from(hints: Vec<SegmentHint>) -> Self {
        Self::Segments(hints)
    }
}

impl From<SegmentHint> for Input {
    fn from(hint: SegmentHint) -> Self {
        Self::Segments(alloc::vec![hint])
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn kanji_mapper(c: char) -> Option<u16> {
    match c {
        '点' => Some(0x935F),
        _ => None,
    }
}

#[test]
fn test_inferred_mode() {
    let seg = SegmentHint::text("0123").resolve(None).unwrap();
    assert_eq!(seg, Some(Segment::numeric("0123").unwrap()));
    let seg = SegmentHint::text("abc").resolve(None).unwrap();
    assert_eq!(seg, Some(Segment::byte("abc")));
    let seg = SegmentHint::text("点").resolve(Some(&kanji_mapper)).unwrap();
    assert_eq!(seg.map(|s| s.mode()), Some(Mode::Kanji));
}

#[test]
fn test_empty_hint_skipped() {
    assert_eq!(SegmentHint::text("").resolve(None), Ok(None));
    assert_eq!(
        SegmentHint::bytes(Vec::<u8>::new()).mode(Mode::Numeric).resolve(None),
        Ok(None)
    );
    assert!(Input::from(alloc::vec![SegmentHint::text("")]).is_empty());
}

#[test]
fn test_kanji_without_mapper_is_byte() {
    let seg = SegmentHint::text("点").mode(Mode::Kanji).resolve(None).unwrap();
    assert_eq!(seg, Some(Segment::byte("点")));
}

#[test]
fn test_incompatible_mode() {
    assert_eq!(
        SegmentHint::text("12a").mode(Mode::Numeric).resolve(None),
        Err(EncodingError::IncompatibleMode {
            mode: Mode::Numeric,
            suggested: Mode::Byte
        })
    );
    assert_eq!(
        SegmentHint::text("12A").mode(Mode::Numeric).resolve(None),
        Err(EncodingError::IncompatibleMode {
            mode: Mode::Numeric,
            suggested: Mode::Alphanumeric
        })
    );
}

#[test]
fn test_bytes_with_mode() {
    let seg = SegmentHint::bytes(&b"42"[..]).mode(Mode::Numeric).resolve(None);
    assert_eq!(seg, Ok(Some(Segment::numeric("42").unwrap())));
    let seg = SegmentHint::bytes(&[0xFFu8, 0x00][..])
        .mode(Mode::Alphanumeric)
        .resolve(None);
    assert_eq!(
        seg,
        Err(EncodingError::IncompatibleMode {
            mode: Mode::Alphanumeric,
            suggested: Mode::Byte
        })
    );
    let seg = SegmentHint::bytes(&[0xFFu8, 0x00][..]).resolve(None);
    assert_eq!(seg, Ok(Some(Segment::byte(&[0xFFu8, 0x00][..]))));
}
