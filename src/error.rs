use alloc::string::String;

use thiserror::Error;

use crate::encodation::Mode;
use crate::version::{ErrorCorrectionLevel, Version};

/// Errors that can happen while building a symbol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The input contains no data.
    #[error("no input data given")]
    InputRequired,
    /// A character can not be encoded in the requested mode.
    #[error("character {0:?} can not be encoded in {1:?} mode")]
    InvalidCharacter(char, Mode),
    /// A segment hint names a mode which can not represent its data.
    #[error("data can not be encoded in {mode:?} mode, use {suggested:?} instead")]
    IncompatibleMode { mode: Mode, suggested: Mode },
    /// The version number is outside of 1 to 40.
    #[error("invalid version {0}, must be between 1 and 40")]
    InvalidVersion(usize),
    /// The mask pattern index is outside of 0 to 7.
    #[error("invalid mask pattern {0}, must be between 0 and 7")]
    BadMaskPattern(u8),
    /// The error correction level could not be parsed.
    #[error("unknown error correction level {0:?}")]
    InvalidErrorCorrectionLevel(String),
    /// The mode name could not be parsed.
    #[error("unknown mode {0:?}")]
    InvalidMode(String),
    /// The data does not fit into the symbol.
    ///
    /// `required` is the smallest version which can hold the data,
    /// it is `None` if even version 40 is too small.
    #[error("data too long for version {version} with level {level:?}{}", required_hint(.required))]
    DataTooLong {
        version: Version,
        level: ErrorCorrectionLevel,
        required: Option<Version>,
    },
}

fn required_hint(required: &Option<Version>) -> String {
    match required {
        Some(v) => alloc::format!(", needs at least version {}", v),
        None => String::new(),
    }
}

#[test]
fn display_messages() {
    use alloc::string::ToString;

    let err = EncodingError::DataTooLong {
        version: Version::MIN,
        level: ErrorCorrectionLevel::H,
        required: Some(Version::new(4).unwrap()),
    };
    assert_eq!(
        err.to_string(),
        "data too long for version 1 with level H, needs at least version 4"
    );
    let err = EncodingError::DataTooLong {
        version: Version::MAX,
        level: ErrorCorrectionLevel::L,
        required: None,
    };
    assert_eq!(err.to_string(), "data too long for version 40 with level L");
    assert_eq!(
        EncodingError::BadMaskPattern(9).to_string(),
        "invalid mask pattern 9, must be between 0 and 7"
    );
}
