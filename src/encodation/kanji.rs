//! Kanji mode.
//!
//! Characters are first converted to their double byte Shift JIS code,
//! then compacted into 13 bits. Only the codes in `0x8140..=0x9FFC` and
//! `0xE040..=0xEBBF` are supported.
use super::{BitBuffer, ShiftJis};

/// Get the 13 bit value for `c`, `None` if the mapper does not map it
/// into the Kanji ranges.
pub(crate) fn value(c: char, mapper: &dyn ShiftJis) -> Option<u16> {
    let code = mapper.to_shift_jis(c)?;
    let offset = match code {
        0x8140..=0x9FFC => code - 0x8140,
        0xE040..=0xEBBF => code - 0xC140,
        _ => return None,
    };
    Some((offset >> 8) * 0xC0 + (offset & 0xFF))
}

pub(crate) fn bit_length(len: usize) -> usize {
    len * 13
}

pub(super) fn write(values: &[u16], buf: &mut BitBuffer) {
    for v in values {
        buf.put(*v as u32, 13);
    }
}

#[cfg(test)]
fn test_mapper(c: char) -> Option<u16> {
    match c {
        '点' => Some(0x935F),
        '茗' => Some(0xE4AA),
        'a' => Some(0x0061),
        _ => None,
    }
}

#[test]
fn test_values() {
    assert_eq!(value('点', &test_mapper), Some(0x0D9F));
    assert_eq!(value('茗', &test_mapper), Some(0x1AAA));
    // single byte codes are outside of the Kanji ranges
    assert_eq!(value('a', &test_mapper), None);
    assert_eq!(value('x', &test_mapper), None);
}

#[test]
fn test_write() {
    let mut buf = BitBuffer::new();
    write(&[0x0D9F, 0x1AAA], &mut buf);
    assert_eq!(buf.len(), bit_length(2));
    // 0110110011111 1101010101010 padded with zeros
    assert_eq!(buf.bytes(), &[0b0110_1100, 0b1111_1110, 0b1010_1010, 0b1000_0000]);
}
