//! Numeric mode, digits are packed in groups of three into 10 bits.
use super::BitBuffer;

pub(crate) fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

/// Bits for `len` digits, a trailing group of two needs 7, a single digit 4.
pub(crate) fn bit_length(len: usize) -> usize {
    10 * (len / 3) + [0, 4, 7][len % 3]
}

/// Write the digits, `data` must only contain ASCII digits.
pub(super) fn write(data: &str, buf: &mut BitBuffer) {
    for group in data.as_bytes().chunks(3) {
        let value = group
            .iter()
            .fold(0u32, |acc, d| acc * 10 + (d - b'0') as u32);
        buf.put(value, [0, 4, 7, 10][group.len()]);
    }
}

#[test]
fn test_bit_length() {
    assert_eq!(bit_length(0), 0);
    assert_eq!(bit_length(1), 4);
    assert_eq!(bit_length(2), 7);
    assert_eq!(bit_length(3), 10);
    assert_eq!(bit_length(8), 27);
    assert_eq!(bit_length(20), 67);
}

#[test]
fn test_write_01234567() {
    let mut buf = BitBuffer::new();
    write("01234567", &mut buf);
    // 012 -> 0000001100, 345 -> 0101011001, 67 -> 1000011
    assert_eq!(buf.len(), 27);
    let bits: alloc::string::String = (0..buf.len())
        .map(|i| if buf.get(i).unwrap() { '1' } else { '0' })
        .collect();
    assert_eq!(bits, "000000110001010110011000011");
}

#[test]
fn test_leading_zeros_kept() {
    let mut buf = BitBuffer::new();
    write("007", &mut buf);
    assert_eq!(buf.len(), 10);
    assert_eq!(buf.bytes(), &[0b0000_0001, 0b1100_0000]);
}
