use super::BitBuffer;

/// The 45 characters of the alphanumeric mode, position is the value.
const CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Get the value of `c` in the alphanumeric mode.
pub(crate) fn value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    CHARSET.iter().position(|ch| *ch == c as u8).map(|i| i as u8)
}

pub(crate) fn is_alphanumeric(c: char) -> bool {
    value(c).is_some()
}

pub(crate) fn bit_length(len: usize) -> usize {
    11 * (len / 2) + 6 * (len % 2)
}

/// Write pairs as `45 a + b` into 11 bits, a single trailing character into 6 bits.
///
/// `data` must only contain characters of the alphanumeric charset.
pub(super) fn write(data: &str, buf: &mut BitBuffer) {
    let values: alloc::vec::Vec<u32> = data
        .chars()
        .map(|c| value(c).expect("validated alphanumeric data, this is a bug") as u32)
        .collect();
    for pair in values.chunks(2) {
        match pair {
            [a, b] => buf.put(45 * a + b, 11),
            [a] => buf.put(*a, 6),
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_values() {
    assert_eq!(value('0'), Some(0));
    assert_eq!(value('9'), Some(9));
    assert_eq!(value('A'), Some(10));
    assert_eq!(value('Z'), Some(35));
    assert_eq!(value(' '), Some(36));
    assert_eq!(value(':'), Some(44));
    assert_eq!(value('a'), None);
    assert_eq!(value('#'), None);
    assert_eq!(value('Ä'), None);
}

#[test]
fn test_write_hello_world() {
    let mut buf = BitBuffer::new();
    write("HELLO WORLD", &mut buf);
    assert_eq!(buf.len(), bit_length(11));
    assert_eq!(buf.len(), 61);
    // HE = 17 * 45 + 14 = 779
    let first: u32 = (0..11).fold(0, |acc, i| (acc << 1) | buf.get(i).unwrap() as u32);
    assert_eq!(first, 779);
    // trailing D = 13 in 6 bits
    let last: u32 = (55..61).fold(0, |acc, i| (acc << 1) | buf.get(i).unwrap() as u32);
    assert_eq!(last, 13);
}
