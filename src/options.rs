use core::fmt;

use crate::encodation::ShiftJis;
use crate::placement::MaskPattern;
use crate::version::{ErrorCorrectionLevel, Version};

/// Settings for building a symbol.
///
/// All settings are optional. By default the smallest fitting version,
/// error correction level M and the mask with the lowest penalty are
/// used, and no Kanji mode is available.
///
/// ```rust
/// # use qrsymbol::{ErrorCorrectionLevel, Options, Version};
/// let options = Options::new()
///     .version(Version::new(5)?)
///     .error_correction_level(ErrorCorrectionLevel::Q);
/// let code = qrsymbol::create("HELLO", &options)?;
/// assert_eq!(code.version(), Version::new(5)?);
/// # Ok::<(), qrsymbol::EncodingError>(())
/// ```
#[derive(Clone, Copy, Default)]
pub struct Options<'a> {
    pub(crate) version: Option<Version>,
    pub(crate) level: ErrorCorrectionLevel,
    pub(crate) mask: Option<MaskPattern>,
    pub(crate) kanji: Option<&'a dyn ShiftJis>,
}

impl<'a> Options<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use exactly this version, encoding fails if the data does not fit.
    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn error_correction_level(mut self, level: ErrorCorrectionLevel) -> Self {
        self.level = level;
        self
    }

    /// Use this mask instead of searching the best one.
    pub fn mask_pattern(mut self, mask: MaskPattern) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Enable the Kanji mode with the given Shift JIS mapper.
    pub fn kanji(mut self, mapper: &'a dyn ShiftJis) -> Self {
        self.kanji = Some(mapper);
        self
    }
}

impl fmt::Debug for Options<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("version", &self.version)
            .field("level", &self.level)
            .field("mask", &self.mask)
            .field("kanji", &self.kanji.is_some())
            .finish()
    }
}

#[test]
fn test_builder() {
    let mapper = |_c: char| -> Option<u16> { None };
    let options = Options::new()
        .version(Version::MAX)
        .error_correction_level(ErrorCorrectionLevel::H)
        .mask_pattern(MaskPattern::new(3).unwrap())
        .kanji(&mapper);
    assert_eq!(options.version, Some(Version::MAX));
    assert_eq!(options.level, ErrorCorrectionLevel::H);
    assert_eq!(options.mask, MaskPattern::new(3).ok());
    assert!(options.kanji.is_some());

    let options = Options::default();
    assert_eq!(options.version, None);
    assert_eq!(options.level, ErrorCorrectionLevel::M);
    assert!(options.kanji.is_none());
}
