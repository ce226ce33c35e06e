//! Conversion of characters to Shift JIS for the Kanji mode.
//!
//! The crate does not ship a Shift JIS table by default. A mapper can be
//! any closure `Fn(char) -> Option<u16>`, or [SystemShiftJis] when the
//! `kanji` feature is enabled.

/// Map a character to its double byte Shift JIS code.
pub trait ShiftJis {
    /// Get the code, `None` if the character has no Shift JIS representation.
    fn to_shift_jis(&self, c: char) -> Option<u16>;
}

impl<F: Fn(char) -> Option<u16>> ShiftJis for F {
    fn to_shift_jis(&self, c: char) -> Option<u16> {
        self(c)
    }
}

/// Shift JIS mapper backed by the tables of `encoding_rs`.
#[cfg(feature = "kanji")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShiftJis;

#[cfg(feature = "kanji")]
impl ShiftJis for SystemShiftJis {
    fn to_shift_jis(&self, c: char) -> Option<u16> {
        let mut buf = [0; 4];
        let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(c.encode_utf8(&mut buf));
        match (had_errors, &*bytes) {
            (false, [hi, lo]) => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }
}

#[test]
fn closure_mapper() {
    let mapper = |c: char| if c == '点' { Some(0x935Fu16) } else { None };
    let dyn_mapper: &dyn ShiftJis = &mapper;
    assert_eq!(dyn_mapper.to_shift_jis('点'), Some(0x935F));
    assert_eq!(dyn_mapper.to_shift_jis('a'), None);
}

#[cfg(feature = "kanji")]
#[test]
fn system_mapper() {
    assert_eq!(SystemShiftJis.to_shift_jis('点'), Some(0x935F));
    assert_eq!(SystemShiftJis.to_shift_jis('茗'), Some(0xE4AA));
    // single byte in Shift JIS
    assert_eq!(SystemShiftJis.to_shift_jis('a'), None);
}
