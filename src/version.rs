//! Symbol versions, error correction levels and their capacities.
//!
//! QR Code comes in 40 sizes called versions. Version `v` has
//! `4 v + 17` modules per side. For every version there are four
//! error correction levels which decide how many of the codewords
//! are used for error correction.
use core::fmt;
use core::str::FromStr;

use arrayvec::ArrayVec;

use crate::encodation::{Mode, Segment};
use crate::placement::MaskPattern;
use crate::EncodingError;

#[cfg(test)]
use enum_iterator::{all, Sequence};

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Generator polynomial for the BCH code of the format information.
const G15: u32 = 0b101_0011_0111;
/// Mask for the format information, avoids an all zero value.
const G15_MASK: u32 = 0b101_0100_0001_0010;
/// Generator polynomial for the BCH code of the version information.
const G18: u32 = 0b1_1111_0010_0101;

/// A symbol version between 1 and 40.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    /// Create a version, fails if `number` is not between 1 and 40.
    pub fn new(number: u8) -> Result<Self, EncodingError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&number) {
            Ok(Self(number))
        } else {
            Err(EncodingError::InvalidVersion(number as usize))
        }
    }

    /// Iterate over all versions, smallest first.
    pub fn all() -> impl Iterator<Item = Version> {
        (Self::MIN.0..=Self::MAX.0).map(Version)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// Number of modules per side.
    pub fn size(&self) -> usize {
        4 * self.0 as usize + 17
    }

    /// Index of the character count indicator table (versions 1-9, 10-26, 27-40).
    pub(crate) fn tier(&self) -> usize {
        match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        }
    }

    /// Number of codewords (data and error correction) the symbol holds.
    pub fn total_codewords(&self) -> usize {
        // all modules minus finder patterns with separators, format
        // information, timing patterns, alignment patterns and version information
        let v = self.0 as usize;
        let mut modules = (16 * v + 128) * v + 64;
        if v >= 2 {
            let num_align = v / 7 + 2;
            modules -= (25 * num_align - 10) * num_align - 55;
            if v >= 7 {
                modules -= 36;
            }
        }
        modules / 8
    }

    /// Number of data codewords for the given error correction level.
    pub fn data_codewords(&self, level: ErrorCorrectionLevel) -> usize {
        self.total_codewords() - level.total_ec_codewords(*self)
    }

    /// Number of bits available for segments (data codewords times eight).
    pub fn data_bits(&self, level: ErrorCorrectionLevel) -> usize {
        self.data_codewords(level) * 8
    }

    /// Row/column coordinates of the alignment pattern centers.
    ///
    /// The patterns are placed at all combinations of these coordinates
    /// except for the three finder pattern corners.
    pub fn alignment_coordinates(&self) -> ArrayVec<usize, 7> {
        let mut coords = ArrayVec::new();
        if self.0 == 1 {
            return coords;
        }
        let count = self.0 as usize / 7 + 2;
        let size = self.size();
        let step = if size == 145 {
            26
        } else {
            (size - 13).div_ceil(2 * count - 2) * 2
        };
        coords.push(6);
        for i in (1..count).rev() {
            coords.push(size - 7 - (i - 1) * step);
        }
        coords
    }

    /// Get the 18 bit version information, only present for versions 7 and up.
    pub fn encoded_bits(&self) -> Option<u32> {
        if self.0 < 7 {
            return None;
        }
        let data = (self.0 as u32) << 12;
        Some(data | bch_remainder(data, G18))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Version {
    type Error = EncodingError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

/// The error correction level of a symbol.
///
/// A higher level makes the symbol more robust against damage but
/// leaves less space for data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(test, derive(Sequence))]
pub enum ErrorCorrectionLevel {
    /// Recovers about 7% of the codewords
    L,
    /// Recovers about 15% of the codewords
    #[default]
    M,
    /// Recovers about 25% of the codewords
    Q,
    /// Recovers about 30% of the codewords
    H,
}

/// Number of error correction blocks, indexed by version and level (L, M, Q, H).
#[rustfmt::skip]
const EC_BLOCKS: [[u8; 4]; 40] = [
    [1, 1, 1, 1],     [1, 1, 1, 1],     [1, 1, 2, 2],     [1, 2, 2, 4],
    [1, 2, 4, 4],     [2, 4, 4, 4],     [2, 4, 6, 5],     [2, 4, 6, 6],
    [2, 5, 8, 8],     [4, 5, 8, 8],     [4, 5, 8, 11],    [4, 8, 10, 11],
    [4, 9, 12, 16],   [4, 9, 16, 16],   [6, 10, 12, 18],  [6, 10, 17, 16],
    [6, 11, 16, 19],  [6, 13, 18, 21],  [7, 14, 21, 25],  [8, 16, 20, 25],
    [8, 17, 23, 25],  [9, 17, 23, 34],  [9, 18, 25, 30],  [10, 20, 27, 32],
    [12, 21, 29, 35], [12, 23, 34, 37], [12, 25, 34, 40], [13, 26, 35, 42],
    [14, 28, 38, 45], [15, 29, 40, 48], [16, 31, 43, 51], [17, 33, 45, 54],
    [18, 35, 48, 57], [19, 37, 51, 60], [19, 38, 53, 63], [20, 40, 56, 66],
    [21, 43, 59, 70], [22, 45, 62, 74], [24, 47, 65, 77], [25, 49, 68, 81],
];

/// Total number of error correction codewords, indexed by version and level (L, M, Q, H).
#[rustfmt::skip]
const EC_CODEWORDS: [[u16; 4]; 40] = [
    [7, 10, 13, 17],        [10, 16, 22, 28],       [15, 26, 36, 44],       [20, 36, 52, 64],
    [26, 48, 72, 88],       [36, 64, 96, 112],      [40, 72, 108, 130],     [48, 88, 132, 156],
    [60, 110, 160, 192],    [72, 130, 192, 224],    [80, 150, 224, 264],    [96, 176, 260, 308],
    [104, 198, 288, 352],   [120, 216, 320, 384],   [132, 240, 360, 432],   [144, 280, 408, 480],
    [168, 308, 448, 532],   [180, 338, 504, 588],   [196, 364, 546, 650],   [224, 416, 600, 700],
    [224, 442, 644, 750],   [252, 476, 690, 816],   [270, 504, 750, 900],   [300, 560, 810, 960],
    [312, 588, 870, 1050],  [336, 644, 952, 1110],  [360, 700, 1020, 1200], [390, 728, 1050, 1260],
    [420, 784, 1140, 1350], [450, 812, 1200, 1440], [480, 868, 1290, 1530], [510, 924, 1350, 1620],
    [540, 980, 1440, 1710], [570, 1036, 1530, 1800], [570, 1064, 1590, 1890], [600, 1120, 1680, 1980],
    [630, 1204, 1770, 2100], [660, 1260, 1860, 2220], [720, 1316, 1950, 2310], [750, 1372, 2040, 2430],
];

impl ErrorCorrectionLevel {
    /// The two bits used in the format information.
    pub fn bits(&self) -> u8 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::L => 0,
            Self::M => 1,
            Self::Q => 2,
            Self::H => 3,
        }
    }

    /// Total number of error correction codewords in a symbol.
    pub fn total_ec_codewords(&self, version: Version) -> usize {
        EC_CODEWORDS[version.0 as usize - 1][self.index()] as usize
    }

    /// Number of error correction blocks the data is split into.
    pub fn ec_blocks(&self, version: Version) -> usize {
        EC_BLOCKS[version.0 as usize - 1][self.index()] as usize
    }

    /// Parse a level like [FromStr], but use `default` if parsing fails.
    pub fn from_str_or(s: &str, default: Self) -> Self {
        s.parse().unwrap_or(default)
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = EncodingError;

    /// Accepts `l`, `m`, `q`, `h` and `low`, `medium`, `quartile`, `high`,
    /// ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::L),
            "m" | "medium" => Ok(Self::M),
            "q" | "quartile" => Ok(Self::Q),
            "h" | "high" => Ok(Self::H),
            _ => Err(EncodingError::InvalidErrorCorrectionLevel(s.into())),
        }
    }
}

/// Get the number of characters of `mode` a symbol can hold.
///
/// With `mode` set to `None` the segments are assumed to be of mixed
/// modes and the number of available data bits is returned.
pub fn capacity(version: Version, level: ErrorCorrectionLevel, mode: Option<Mode>) -> usize {
    let data_bits = version.data_bits(level);
    let mode = match mode {
        Some(mode) => mode,
        None => return data_bits,
    };
    let usable = data_bits - 4 - mode.char_count_bits(version);
    match mode {
        Mode::Numeric => usable * 3 / 10,
        Mode::Alphanumeric => usable * 2 / 11,
        Mode::Kanji => usable / 13,
        Mode::Byte => usable / 8,
    }
}

/// Number of bits the segments need in a symbol of the given version,
/// including mode and character count indicators.
pub fn segments_bit_length(segments: &[Segment], version: Version) -> usize {
    segments
        .iter()
        .map(|s| 4 + s.mode().char_count_bits(version) + s.bit_length())
        .sum()
}

/// Find the smallest version which can hold the segments.
///
/// Returns `None` if not even the biggest version is big enough.
pub fn best_version(segments: &[Segment], level: ErrorCorrectionLevel) -> Option<Version> {
    match segments {
        [] => Some(Version::MIN),
        [segment] => Version::all().find(|v| segment.len() <= capacity(*v, level, Some(segment.mode()))),
        _ => Version::all().find(|v| segments_bit_length(segments, *v) <= capacity(*v, level, None)),
    }
}

/// Get the 15 bit format information for the level and mask.
pub fn format_bits(level: ErrorCorrectionLevel, mask: MaskPattern) -> u16 {
    let data = (((level.bits() as u32) << 3) | mask.index() as u32) << 10;
    ((data | bch_remainder(data, G15)) ^ G15_MASK) as u16
}

/// Position of the highest set bit plus one, zero for zero.
fn bch_digit(data: u32) -> u32 {
    u32::BITS - data.leading_zeros()
}

/// Remainder of the polynomial division of `data` by `generator` over GF(2).
fn bch_remainder(data: u32, generator: u32) -> u32 {
    let gen_digit = bch_digit(generator);
    let mut d = data;
    while bch_digit(d) >= gen_digit {
        d ^= generator << (bch_digit(d) - gen_digit);
    }
    d
}

#[test]
fn test_size() {
    for v in Version::all() {
        assert_eq!(v.size(), 4 * v.number() as usize + 17);
    }
    assert_eq!(Version::MIN.size(), 21);
    assert_eq!(Version::MAX.size(), 177);
}

#[test]
fn test_invalid_version() {
    assert_eq!(Version::new(0), Err(EncodingError::InvalidVersion(0)));
    assert_eq!(Version::new(41), Err(EncodingError::InvalidVersion(41)));
    assert_eq!(Version::new(40), Ok(Version::MAX));
    assert_eq!(Version::all().count(), 40);
}

#[test]
fn test_total_codewords() {
    let expected = [
        (1, 26),
        (2, 44),
        (6, 172),
        (7, 196),
        (14, 581),
        (21, 1156),
        (32, 2465),
        (40, 3706),
    ];
    for (v, n) in expected {
        assert_eq!(Version::new(v).unwrap().total_codewords(), n, "version {}", v);
    }
}

#[test]
fn test_ec_tables_consistent() {
    for v in Version::all() {
        for level in all::<ErrorCorrectionLevel>() {
            let blocks = level.ec_blocks(v);
            let ec = level.total_ec_codewords(v);
            assert_eq!(ec % blocks, 0, "{:?} {:?}", v, level);
            assert!(v.data_codewords(level) >= blocks);
        }
    }
}

#[test]
fn test_capacity_version_1() {
    use ErrorCorrectionLevel::*;
    let v = Version::MIN;
    let expected = [
        (L, [41, 25, 17, 10]),
        (M, [34, 20, 14, 8]),
        (Q, [27, 16, 11, 7]),
        (H, [17, 10, 7, 4]),
    ];
    for (level, [num, alnum, byte, kanji]) in expected {
        assert_eq!(capacity(v, level, Some(Mode::Numeric)), num);
        assert_eq!(capacity(v, level, Some(Mode::Alphanumeric)), alnum);
        assert_eq!(capacity(v, level, Some(Mode::Byte)), byte);
        assert_eq!(capacity(v, level, Some(Mode::Kanji)), kanji);
    }
    assert_eq!(capacity(v, M, None), 128);
}

#[test]
fn test_capacity_version_40() {
    let v = Version::MAX;
    assert_eq!(capacity(v, ErrorCorrectionLevel::L, Some(Mode::Numeric)), 7089);
    assert_eq!(capacity(v, ErrorCorrectionLevel::L, Some(Mode::Alphanumeric)), 4296);
    assert_eq!(capacity(v, ErrorCorrectionLevel::L, Some(Mode::Byte)), 2953);
    assert_eq!(capacity(v, ErrorCorrectionLevel::H, Some(Mode::Byte)), 1273);
}

#[test]
fn test_alignment_coordinates() {
    let coords = |v: u8| Version::new(v).unwrap().alignment_coordinates().to_vec();
    assert_eq!(coords(1), Vec::<usize>::new());
    assert_eq!(coords(2), vec![6, 18]);
    assert_eq!(coords(7), vec![6, 22, 38]);
    assert_eq!(coords(16), vec![6, 26, 50, 74]);
    assert_eq!(coords(32), vec![6, 34, 60, 86, 112, 138]);
    assert_eq!(coords(36), vec![6, 24, 50, 76, 102, 128, 154]);
    assert_eq!(coords(40), vec![6, 30, 58, 86, 114, 142, 170]);
}

#[test]
fn test_format_bits_standard_vector() {
    assert_eq!(
        format_bits(ErrorCorrectionLevel::M, MaskPattern::new(0).unwrap()),
        0x5412
    );
}

#[test]
fn test_format_bits_table() {
    use ErrorCorrectionLevel::*;
    #[rustfmt::skip]
    let table = [
        (M, [0x5412, 0x5125, 0x5E7C, 0x5B4B, 0x45F9, 0x40CE, 0x4F97, 0x4AA0]),
        (L, [0x77C4, 0x72F3, 0x7DAA, 0x789D, 0x662F, 0x6318, 0x6C41, 0x6976]),
        (H, [0x1689, 0x13BE, 0x1CE7, 0x19D0, 0x0762, 0x0255, 0x0D0C, 0x083B]),
        (Q, [0x355F, 0x3068, 0x3F31, 0x3A06, 0x24B4, 0x2183, 0x2EDA, 0x2BED]),
    ];
    for (level, row) in table {
        for (mask, bits) in MaskPattern::all().zip(row) {
            assert_eq!(format_bits(level, mask), bits, "{:?} {:?}", level, mask);
        }
    }
}

#[test]
fn test_version_bits() {
    assert_eq!(Version::new(6).unwrap().encoded_bits(), None);
    assert_eq!(Version::new(7).unwrap().encoded_bits(), Some(0x07C94));
    assert_eq!(Version::new(8).unwrap().encoded_bits(), Some(0x085BC));
    assert_eq!(Version::new(40).unwrap().encoded_bits(), Some(0x28C69));
    for v in Version::all().skip(6) {
        let bits = v.encoded_bits().unwrap();
        assert!(bits < 1 << 18);
        assert_eq!(bits >> 12, v.number() as u32);
    }
}

#[test]
fn test_parse_level() {
    use ErrorCorrectionLevel::*;
    assert_eq!("l".parse::<ErrorCorrectionLevel>(), Ok(L));
    assert_eq!("Medium".parse::<ErrorCorrectionLevel>(), Ok(M));
    assert_eq!("QUARTILE".parse::<ErrorCorrectionLevel>(), Ok(Q));
    assert_eq!("h".parse::<ErrorCorrectionLevel>(), Ok(H));
    assert_eq!(
        "x".parse::<ErrorCorrectionLevel>(),
        Err(EncodingError::InvalidErrorCorrectionLevel("x".into()))
    );
    assert_eq!(ErrorCorrectionLevel::from_str_or("nope", Q), Q);
    assert_eq!(ErrorCorrectionLevel::from_str_or("high", Q), H);
    assert_eq!(ErrorCorrectionLevel::default(), M);
}

#[test]
fn test_best_version_single_segment() {
    let seg = Segment::numeric("1234567").unwrap();
    assert_eq!(
        best_version(&[seg], ErrorCorrectionLevel::M),
        Some(Version::MIN)
    );

    let seg = Segment::alphanumeric(&"A".repeat(40)).unwrap();
    let v = best_version(&[seg], ErrorCorrectionLevel::H).unwrap();
    assert_eq!(v, Version::new(4).unwrap());
    assert!(capacity(v, ErrorCorrectionLevel::H, Some(Mode::Alphanumeric)) >= 40);
}

#[test]
fn test_best_version_too_much() {
    let seg = Segment::byte(vec![0u8; 1274]);
    assert_eq!(best_version(&[seg], ErrorCorrectionLevel::H), None);
    let seg = Segment::byte(vec![0u8; 1273]);
    assert_eq!(
        best_version(&[seg], ErrorCorrectionLevel::H),
        Some(Version::MAX)
    );
}

#[test]
fn test_best_version_mixed() {
    let segs = [
        Segment::numeric("12345678901234567890").unwrap(),
        Segment::byte(b"hello world".to_vec()),
    ];
    // 4 + 10 + 67 + 4 + 8 + 88 = 181 bits, version 1-M has 128, version 2-M 224
    assert_eq!(segments_bit_length(&segs, Version::MIN), 181);
    assert_eq!(
        best_version(&segs, ErrorCorrectionLevel::M),
        Some(Version::new(2).unwrap())
    );
    assert_eq!(best_version(&[], ErrorCorrectionLevel::M), Some(Version::MIN));
}
