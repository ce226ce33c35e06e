//! QR Code (ISO/IEC 18004) symbol encoding.
//!
//! This crate turns text or bytes into the module grid of a QR Code,
//! Model 2, versions 1 to 40. Rendering the grid into an image is left
//! to the caller, see [Bitmap::pixels].
//!
//! ```rust
//! let code = qrsymbol::QrCode::encode("Hello, World!")?;
//! assert_eq!(code.version().number(), 1);
//! for (x, y) in code.modules().pixels() {
//!     // draw a dark square at (x, y)
//! }
//! # Ok::<(), qrsymbol::EncodingError>(())
//! ```
//!
//! Text input is split into segments of different modes (numeric,
//! alphanumeric, byte, Kanji) such that the number of bits is minimal.
//! The Kanji mode needs a Shift JIS mapper, see [Options::kanji].
extern crate alloc;

use alloc::vec::Vec;

use log::debug;

pub mod data;
mod encodation;
mod error;
pub mod errorcode;
mod input;
mod options;
mod placement;
mod version;

#[cfg(feature = "kanji")]
pub use encodation::SystemShiftJis;
pub use encodation::{Mode, Segment, ShiftJis};
pub use error::EncodingError;
pub use input::{Input, SegmentHint};
pub use options::Options;
pub use placement::{Bitmap, MaskPattern};
pub use version::{best_version, capacity, ErrorCorrectionLevel, Version};

use placement::{Matrix, Visitor};

struct CodewordPlacer(Vec<u8>);

impl Visitor for CodewordPlacer {
    fn visit(&mut self, idx: usize, bits: [&mut bool; 8]) {
        let codeword = self.0.get(idx).copied().unwrap_or(0);
        for (i, bit) in bits.into_iter().enumerate() {
            // 0 = MSB
            // 7 = LSB
            *bit = ((codeword >> (7 - i)) & 1) == 1;
        }
    }
}

/// A finished QR Code symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    version: Version,
    level: ErrorCorrectionLevel,
    mask: MaskPattern,
    modules: Bitmap,
    segments: Vec<Segment>,
}

impl QrCode {
    /// Encode text with default options.
    pub fn encode(text: &str) -> Result<Self, EncodingError> {
        create(text, &Options::default())
    }

    /// Encode the input with the given options.
    pub fn with_options(
        input: impl Into<Input>,
        options: &Options<'_>,
    ) -> Result<Self, EncodingError> {
        create(input, options)
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn error_correction_level(&self) -> ErrorCorrectionLevel {
        self.level
    }

    pub fn mask_pattern(&self) -> MaskPattern {
        self.mask
    }

    /// Number of modules per side.
    pub fn size(&self) -> usize {
        self.modules.size()
    }

    /// The modules of the symbol, without quiet zone.
    pub fn modules(&self) -> &Bitmap {
        &self.modules
    }

    /// The segments the data was encoded in.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

fn plan_segments(input: &Input, options: &Options<'_>) -> Result<Vec<Segment>, EncodingError> {
    let kanji = options.kanji;
    match input {
        Input::Text(text) => {
            // the segmentation depends on the version, start with an estimate
            let estimate = match options.version {
                Some(version) => version,
                None => best_version(&data::raw_split(text, kanji)?, options.level)
                    .unwrap_or(Version::MAX),
            };
            data::segments_for(text, estimate, kanji)
        }
        Input::Segments(hints) => hints
            .iter()
            .filter_map(|hint| hint.resolve(kanji).transpose())
            .collect(),
    }
}

fn choose_version(segments: &[Segment], options: &Options<'_>) -> Result<Version, EncodingError> {
    let level = options.level;
    match (options.version, best_version(segments, level)) {
        (requested, None) => Err(EncodingError::DataTooLong {
            version: requested.unwrap_or(Version::MAX),
            level,
            required: None,
        }),
        (Some(requested), Some(required)) if requested < required => {
            Err(EncodingError::DataTooLong {
                version: requested,
                level,
                required: Some(required),
            })
        }
        (Some(requested), _) => Ok(requested),
        (None, Some(required)) => Ok(required),
    }
}

/// Encode the input as a QR Code.
///
/// Fails if the input is empty, if a segment hint can not be encoded in
/// its mode, or if the data does not fit into the requested version
/// (or version 40 if none is requested).
pub fn create(input: impl Into<Input>, options: &Options<'_>) -> Result<QrCode, EncodingError> {
    let input = input.into();
    if input.is_empty() {
        return Err(EncodingError::InputRequired);
    }
    let level = options.level;
    let segments = plan_segments(&input, options)?;
    let version = choose_version(&segments, options)?;
    debug!(
        "encoding {} segments {:?} in version {} with level {:?}",
        segments.len(),
        segments.iter().map(|s| s.mode()).collect::<Vec<_>>(),
        version,
        level
    );

    let codewords = data::codewords(&segments, version, level)?;
    let mut matrix = Matrix::new(version, level);
    matrix.traverse(&mut CodewordPlacer(codewords));

    let mask = match options.mask {
        Some(mask) => mask,
        None => placement::best_mask(&mut matrix, level),
    };
    debug!("using mask {}", mask.index());
    matrix.apply_mask(mask);
    matrix.draw_format_info(level, mask);

    Ok(QrCode {
        version,
        level,
        mask,
        modules: matrix.bitmap(),
        segments,
    })
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
struct CodewordReader(Vec<u8>);

#[cfg(test)]
impl Visitor for CodewordReader {
    fn visit(&mut self, _idx: usize, bits: [&mut bool; 8]) {
        let codeword = bits.iter().fold(0u8, |acc, b| (acc << 1) | **b as u8);
        self.0.push(codeword);
    }
}

#[cfg(test)]
fn read_codewords(code: &QrCode) -> Vec<u8> {
    let mut matrix = Matrix::from_bitmap(code.modules(), code.version(), code.error_correction_level());
    matrix.apply_mask(code.mask_pattern());
    let mut reader = CodewordReader(Vec::new());
    matrix.traverse(&mut reader);
    reader.0
}

#[cfg(test)]
fn kanji_mapper(c: char) -> Option<u16> {
    match c {
        '点' => Some(0x935F),
        '茗' => Some(0xE4AA),
        _ => None,
    }
}

#[test]
fn test_numeric_version_1() {
    let code = QrCode::encode("1234567").unwrap();
    assert_eq!(code.version(), Version::MIN);
    assert_eq!(code.error_correction_level(), ErrorCorrectionLevel::M);
    assert_eq!(code.size(), 21);
    assert_eq!(code.segments(), &[Segment::numeric("1234567").unwrap()]);
}

#[test]
fn test_alphanumeric_high_level() {
    let text = "A".repeat(40);
    let options = Options::new().error_correction_level(ErrorCorrectionLevel::H);
    let code = create(text.as_str(), &options).unwrap();
    assert_eq!(code.version(), Version::new(4).unwrap());
    assert_eq!(code.size(), 33);
}

#[test]
fn test_too_long() {
    let text = "a".repeat(3000);
    assert_eq!(
        QrCode::encode(&text),
        Err(EncodingError::DataTooLong {
            version: Version::MAX,
            level: ErrorCorrectionLevel::M,
            required: None,
        })
    );
}

#[test]
fn test_requested_version_too_small() {
    let text = "A".repeat(40);
    let options = Options::new()
        .version(Version::MIN)
        .error_correction_level(ErrorCorrectionLevel::H);
    assert_eq!(
        create(text.as_str(), &options),
        Err(EncodingError::DataTooLong {
            version: Version::MIN,
            level: ErrorCorrectionLevel::H,
            required: Some(Version::new(4).unwrap()),
        })
    );
}

#[test]
fn test_requested_version_bigger() {
    let options = Options::new().version(Version::new(10).unwrap());
    let code = create("1234567", &options).unwrap();
    assert_eq!(code.version(), Version::new(10).unwrap());
    assert_eq!(code.size(), 57);
}

#[test]
fn test_empty_input() {
    assert_eq!(QrCode::encode(""), Err(EncodingError::InputRequired));
    assert_eq!(
        create(Vec::<SegmentHint>::new(), &Options::default()),
        Err(EncodingError::InputRequired)
    );
    assert_eq!(
        create(alloc::vec![SegmentHint::text("")], &Options::default()),
        Err(EncodingError::InputRequired)
    );
}

#[test]
fn test_bad_mask() {
    assert_eq!(MaskPattern::new(8), Err(EncodingError::BadMaskPattern(8)));
}

#[test]
fn test_requested_mask_and_format_info() {
    let level = ErrorCorrectionLevel::Q;
    for mask in MaskPattern::all() {
        let options = Options::new().mask_pattern(mask).error_correction_level(level);
        let code = create("HELLO WORLD", &options).unwrap();
        assert_eq!(code.mask_pattern(), mask);
        let bits = version::format_bits(level, mask);
        let m = code.modules();
        // lower left copy, bits 8 to 14
        for i in 8..15 {
            assert_eq!(m.get(code.size() - 15 + i, 8), (bits >> i) & 1 == 1);
        }
        // top right copy, bits 0 to 7
        for i in 0..8 {
            assert_eq!(m.get(8, code.size() - 1 - i), (bits >> i) & 1 == 1);
        }
    }
}

#[test]
fn test_codewords_read_back() {
    let inputs = [
        ("01234567", ErrorCorrectionLevel::M),
        ("HELLO WORLD", ErrorCorrectionLevel::Q),
        ("https://example.com/?q=1234567890", ErrorCorrectionLevel::L),
        ("Grüße aus Köln, 12345 Einwohner!", ErrorCorrectionLevel::H),
    ];
    for (text, level) in inputs {
        let options = Options::new().error_correction_level(level);
        let code = create(text, &options).unwrap();
        let expected = data::codewords(code.segments(), code.version(), level).unwrap();
        assert_eq!(read_codewords(&code), expected, "{}", text);
    }
}

#[test]
fn test_larger_version_read_back() {
    let text = "The quick brown fox jumps over the lazy dog 0123456789. ".repeat(12);
    let code = QrCode::encode(&text).unwrap();
    assert!(code.version().number() >= 7);
    let expected = data::codewords(code.segments(), code.version(), code.error_correction_level())
        .unwrap();
    assert_eq!(read_codewords(&code), expected);
}

#[test]
fn test_function_patterns_present() {
    let code = QrCode::encode("function patterns").unwrap();
    let m = code.modules();
    let size = code.size();
    for (row, col) in [(0, 0), (size - 7, 0), (0, size - 7)] {
        assert!(m.get(row, col));
        assert!(m.get(row + 3, col + 3));
        assert!(!m.get(row + 1, col + 1));
    }
    // the dark module
    assert!(m.get(size - 8, 8));
}

#[test]
fn test_segments_reconstruct_input() {
    let text = "Invoice 2024-0042: 1500 EUR, 点茗点茗点茗点茗 ok";
    let options = Options::new().kanji(&kanji_mapper);
    let code = create(text, &options).unwrap();
    let bytes: Vec<u8> = code
        .segments()
        .iter()
        .flat_map(|s| s.as_bytes().iter().copied())
        .collect();
    assert_eq!(bytes, text.as_bytes());
    assert!(code.segments().iter().any(|s| s.mode() == Mode::Kanji));
}

#[test]
fn test_segment_hints() {
    let hints = alloc::vec![
        SegmentHint::text("HELLO "),
        SegmentHint::text("12345").mode(Mode::Numeric),
        SegmentHint::bytes(&[0xFFu8, 0xFE][..]),
        SegmentHint::text(""),
    ];
    let code = create(hints, &Options::default()).unwrap();
    let modes: Vec<Mode> = code.segments().iter().map(|s| s.mode()).collect();
    assert_eq!(modes, alloc::vec![Mode::Alphanumeric, Mode::Numeric, Mode::Byte]);

    let result = create(SegmentHint::text("abc").mode(Mode::Numeric), &Options::default());
    assert_eq!(
        result,
        Err(EncodingError::IncompatibleMode {
            mode: Mode::Numeric,
            suggested: Mode::Byte,
        })
    );
}

#[test]
fn test_deterministic() {
    let a = QrCode::encode("same input, same symbol").unwrap();
    let b = QrCode::encode("same input, same symbol").unwrap();
    assert_eq!(a, b);
}

#[cfg(feature = "kanji")]
#[test]
fn test_system_kanji_mapper() {
    let options = Options::new().kanji(&SystemShiftJis);
    let code = create("点茗", &options).unwrap();
    assert_eq!(code.segments().len(), 1);
    assert_eq!(code.segments()[0].mode(), Mode::Kanji);
}
