use super::BitBuffer;

pub(super) fn write(data: &[u8], buf: &mut BitBuffer) {
    for byte in data {
        buf.put(*byte as u32, 8);
    }
}

#[test]
fn test_write() {
    let mut buf = BitBuffer::new();
    write("ab".as_bytes(), &mut buf);
    assert_eq!(buf.len(), 16);
    assert_eq!(buf.bytes(), b"ab");
}
