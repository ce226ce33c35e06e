use alloc::vec::Vec;

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Append-only sequence of bits, stored MSB first in bytes.
///
/// Unused bits of the last byte are always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Number of bits written.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append the lowest `width` bits of `value`, most significant first.
    pub fn put(&mut self, value: u32, width: usize) {
        debug_assert!(width <= 32);
        debug_assert!(width == 32 || value >> width == 0, "value too wide");
        for i in (0..width).rev() {
            self.put_bit((value >> i) & 1 == 1);
        }
    }

    pub fn put_bit(&mut self, bit: bool) {
        let offset = self.len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 0x80 >> offset;
        }
        self.len += 1;
    }

    /// Get the bit at `index`.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some((self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[test]
fn test_put() {
    let mut buf = BitBuffer::new();
    assert!(buf.is_empty());
    buf.put(0b0001, 4);
    buf.put(8, 10);
    assert_eq!(buf.len(), 14);
    assert_eq!(buf.bytes(), &[0b0001_0000, 0b0010_0000]);
    buf.put(0xFF, 8);
    assert_eq!(buf.len(), 22);
    assert_eq!(buf.bytes().len(), 3);
    assert_eq!(buf.bytes(), &[0x10, 0x23, 0xFC]);
}

#[test]
fn test_get() {
    let mut buf = BitBuffer::with_capacity(16);
    buf.put(0b101, 3);
    assert_eq!(buf.get(0), Some(true));
    assert_eq!(buf.get(1), Some(false));
    assert_eq!(buf.get(2), Some(true));
    assert_eq!(buf.get(3), None);
}

#[test]
fn test_length_invariant() {
    let mut buf = BitBuffer::new();
    let mut bits = 0;
    for width in [1, 7, 13, 4, 10, 11, 6, 8, 3] {
        buf.put(1, width);
        bits += width;
        assert_eq!(buf.len(), bits);
        assert_eq!(buf.bytes().len(), bits.div_ceil(8));
        let used = bits % 8;
        if used != 0 {
            let last = *buf.bytes().last().unwrap();
            assert_eq!(last & (0xFF >> used), 0, "trailing bits must be zero");
        }
    }
}
