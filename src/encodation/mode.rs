use core::str::FromStr;

use flagset::{flags, FlagSet};

use super::{alphanumeric, kanji, numeric, ShiftJis};
use crate::version::Version;
use crate::EncodingError;

flags! {
    /// List of data modes.
    ///
    /// A QR Code can switch between modes at segment boundaries. Each
    /// mode packs a different character set. The value of a
    /// flag is the 4 bit mode indicator written before a segment.
    pub enum Mode: u8 {
        Numeric      = 0b0001,
        Alphanumeric = 0b0010,
        Byte         = 0b0100,
        Kanji        = 0b1000,
    }
}

impl Mode {
    /// Get the 4 bit mode indicator.
    pub fn indicator(&self) -> u8 {
        match self {
            Self::Numeric => 0b0001,
            Self::Alphanumeric => 0b0010,
            Self::Byte => 0b0100,
            Self::Kanji => 0b1000,
        }
    }

    /// Width of the character count indicator in a symbol of the given version.
    pub fn char_count_bits(&self, version: Version) -> usize {
        let widths = match self {
            Self::Numeric => [10, 12, 14],
            Self::Alphanumeric => [9, 11, 13],
            Self::Byte => [8, 16, 16],
            Self::Kanji => [8, 10, 12],
        };
        widths[version.tier()]
    }

    /// Number of bits needed for `len` characters, without headers.
    ///
    /// For [Mode::Byte] `len` counts bytes.
    pub fn bit_length(&self, len: usize) -> usize {
        match self {
            Self::Numeric => numeric::bit_length(len),
            Self::Alphanumeric => alphanumeric::bit_length(len),
            Self::Byte => len * 8,
            Self::Kanji => kanji::bit_length(len),
        }
    }

    /// Get flag set with all modes activated.
    pub fn all() -> FlagSet<Self> {
        FlagSet::full()
    }

    /// Check if every character of `text` can be encoded in this mode.
    ///
    /// Kanji mode needs a Shift JIS mapper, without one nothing is
    /// encodable in it.
    pub fn can_encode(&self, text: &str, kanji: Option<&dyn ShiftJis>) -> bool {
        match self {
            Self::Numeric => text.chars().all(numeric::is_numeric),
            Self::Alphanumeric => text.chars().all(alphanumeric::is_alphanumeric),
            Self::Byte => true,
            Self::Kanji => match kanji {
                Some(mapper) => text.chars().all(|c| kanji::value(c, mapper).is_some()),
                None => false,
            },
        }
    }

    /// Pick the most compact mode which can encode all of `text`.
    pub fn best_for(text: &str, kanji: Option<&dyn ShiftJis>) -> Self {
        [Self::Numeric, Self::Alphanumeric, Self::Kanji]
            .into_iter()
            .find(|mode| mode.can_encode(text, kanji))
            .unwrap_or(Self::Byte)
    }
}

impl FromStr for Mode {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "numeric" => Ok(Self::Numeric),
            "alphanumeric" => Ok(Self::Alphanumeric),
            "byte" => Ok(Self::Byte),
            "kanji" => Ok(Self::Kanji),
            _ => Err(EncodingError::InvalidMode(s.into())),
        }
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_char_count_bits() {
    let v = |n| Version::new(n).unwrap();
    let expected = [
        (Mode::Numeric, [10, 12, 14]),
        (Mode::Alphanumeric, [9, 11, 13]),
        (Mode::Byte, [8, 16, 16]),
        (Mode::Kanji, [8, 10, 12]),
    ];
    for (mode, widths) in expected {
        assert_eq!(mode.char_count_bits(v(1)), widths[0]);
        assert_eq!(mode.char_count_bits(v(9)), widths[0]);
        assert_eq!(mode.char_count_bits(v(10)), widths[1]);
        assert_eq!(mode.char_count_bits(v(26)), widths[1]);
        assert_eq!(mode.char_count_bits(v(27)), widths[2]);
        assert_eq!(mode.char_count_bits(v(40)), widths[2]);
    }
}

#[test]
fn test_indicator_matches_flag() {
    for mode in Mode::all() {
        assert_eq!(FlagSet::from(mode).bits(), mode.indicator());
    }
    assert_eq!(Mode::all().into_iter().count(), 4);
}

#[test]
fn test_best_for() {
    assert_eq!(Mode::best_for("0123", None), Mode::Numeric);
    assert_eq!(Mode::best_for("AB-12", None), Mode::Alphanumeric);
    assert_eq!(Mode::best_for("ab", None), Mode::Byte);
    assert_eq!(Mode::best_for("点", None), Mode::Byte);
    let mapper = |c: char| if c == '点' { Some(0x935Fu16) } else { None };
    assert_eq!(Mode::best_for("点点", Some(&mapper)), Mode::Kanji);
    assert_eq!(Mode::best_for("点a", Some(&mapper)), Mode::Byte);
}

#[test]
fn test_parse_mode() {
    assert_eq!("Numeric".parse::<Mode>(), Ok(Mode::Numeric));
    assert_eq!("BYTE".parse::<Mode>(), Ok(Mode::Byte));
    assert_eq!("kanji".parse::<Mode>(), Ok(Mode::Kanji));
    assert_eq!(
        "ascii".parse::<Mode>(),
        Err(EncodingError::InvalidMode("ascii".into()))
    );
}
