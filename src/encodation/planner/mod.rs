//! This modules finds an optimal segmentation of text.
//!
//! The input is first split into maximal runs of characters of the same
//! class (digits, other alphanumerics, Kanji, everything else). Every
//! run can be encoded in a few modes, for example digits in numeric,
//! alphanumeric or byte mode. The shortest path search in
//! [shortest_path] picks a mode per run so that the total number of
//! bits is minimal. Neighbouring runs in the same mode become one segment.
use alloc::vec::Vec;
use core::ops::Range;

use flagset::FlagSet;
use log::trace;

use super::{alphanumeric, kanji, numeric, Mode, Segment, ShiftJis};
use crate::version::Version;
use crate::EncodingError;

mod shortest_path;

/// A maximal run of characters of the same class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Run {
    /// The class of all characters, also the most compact mode for the run.
    pub class: Mode,
    /// Byte range in the input.
    pub range: Range<usize>,
    /// Number of characters.
    pub chars: usize,
}

impl Run {
    /// Number of characters in `mode`, bytes for byte mode.
    pub fn len_in(&self, mode: Mode) -> usize {
        match mode {
            Mode::Byte => self.range.len(),
            _ => self.chars,
        }
    }

    /// Modes which can encode the run.
    pub fn candidates(&self) -> FlagSet<Mode> {
        match self.class {
            Mode::Numeric => Mode::Numeric | Mode::Alphanumeric | Mode::Byte,
            Mode::Alphanumeric => Mode::Alphanumeric | Mode::Byte,
            Mode::Kanji => Mode::Kanji | Mode::Byte,
            Mode::Byte => Mode::Byte.into(),
        }
    }
}

fn classify(c: char, kanji: Option<&dyn ShiftJis>) -> Mode {
    if numeric::is_numeric(c) {
        Mode::Numeric
    } else if alphanumeric::is_alphanumeric(c) {
        Mode::Alphanumeric
    } else if kanji.is_some_and(|mapper| kanji::value(c, mapper).is_some()) {
        Mode::Kanji
    } else {
        Mode::Byte
    }
}

/// Split `text` into maximal runs of the same character class.
///
/// Without a Kanji mapper no character is classified as Kanji.
pub(crate) fn runs(text: &str, kanji: Option<&dyn ShiftJis>) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for (pos, c) in text.char_indices() {
        let class = classify(c, kanji);
        let end = pos + c.len_utf8();
        match runs.last_mut() {
            Some(run) if run.class == class => {
                run.range.end = end;
                run.chars += 1;
            }
            _ => runs.push(Run {
                class,
                range: pos..end,
                chars: 1,
            }),
        }
    }
    runs
}

/// Create a segment for the text of consecutive runs in `mode`.
fn segment_for(
    text: &str,
    range: Range<usize>,
    mode: Mode,
    kanji: Option<&dyn ShiftJis>,
) -> Result<Segment, EncodingError> {
    Segment::with_mode(mode, &text[range], kanji)
}

/// Split text into one segment per run, every run in its own class's mode.
///
/// No optimization is done, this is useful to estimate the needed version.
pub fn raw_split(text: &str, kanji: Option<&dyn ShiftJis>) -> Result<Vec<Segment>, EncodingError> {
    runs(text, kanji)
        .into_iter()
        .map(|run| segment_for(text, run.range, run.class, kanji))
        .collect()
}

/// Compute the segmentation of `text` with the fewest bits for a symbol of `version`.
///
/// The version matters since the character count indicators' widths depend on it.
pub fn segments_for(
    text: &str,
    version: Version,
    kanji: Option<&dyn ShiftJis>,
) -> Result<Vec<Segment>, EncodingError> {
    let runs = runs(text, kanji);
    let modes = shortest_path::optimize(&runs, version);
    debug_assert_eq!(modes.len(), runs.len());
    trace!("planned modes {:?} for {} runs", modes, runs.len());

    let mut segments = Vec::new();
    let mut i = 0;
    while i < runs.len() {
        let mode = modes[i];
        let start = runs[i].range.start;
        let mut end = runs[i].range.end;
        i += 1;
        while i < runs.len() && modes[i] == mode {
            end = runs[i].range.end;
            i += 1;
        }
        segments.push(segment_for(text, start..end, mode, kanji)?);
    }
    Ok(segments)
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_runs() {
    let r = runs("123ABCabc456", None);
    let classes: Vec<Mode> = r.iter().map(|r| r.class).collect();
    assert_eq!(
        classes,
        vec![Mode::Numeric, Mode::Alphanumeric, Mode::Byte, Mode::Numeric]
    );
    assert_eq!(r[0].range, 0..3);
    assert_eq!(r[2].range, 6..9);
    assert_eq!(r[3].range, 9..12);
}

#[test]
fn test_runs_multibyte() {
    let mapper = |c: char| if c == '点' { Some(0x935Fu16) } else { None };
    let r = runs("点点1ä", Some(&mapper));
    assert_eq!(r.len(), 3);
    assert_eq!(r[0].class, Mode::Kanji);
    assert_eq!(r[0].chars, 2);
    assert_eq!(r[0].range, 0..6);
    assert_eq!(r[0].len_in(Mode::Kanji), 2);
    assert_eq!(r[0].len_in(Mode::Byte), 6);
    assert_eq!(r[2].class, Mode::Byte);
    assert_eq!(r[2].range, 7..9);

    // without mapper Kanji is treated as bytes
    let r = runs("点点1ä", None);
    assert_eq!(r[0].class, Mode::Byte);
}

#[test]
fn test_raw_split() {
    let segments = raw_split("ABC123", None).unwrap();
    assert_eq!(
        segments,
        vec![
            Segment::alphanumeric("ABC").unwrap(),
            Segment::numeric("123").unwrap()
        ]
    );
    assert!(raw_split("", None).unwrap().is_empty());
}
