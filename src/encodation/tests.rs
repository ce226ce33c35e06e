use alloc::{string::String, vec, vec::Vec};

use pretty_assertions::assert_eq;

use super::planner::{raw_split, segments_for};
use super::{encode_data, BitBuffer, Mode, Segment};
use crate::version::{ErrorCorrectionLevel, Version};
use crate::EncodingError;

fn kanji_mapper(c: char) -> Option<u16> {
    match c {
        '点' => Some(0x935F),
        '茗' => Some(0xE4AA),
        _ => None,
    }
}

fn concat(segments: &[Segment]) -> Vec<u8> {
    segments.iter().flat_map(|s| s.as_bytes().iter().copied()).collect()
}

#[test]
fn test_numeric_annex_example() {
    let segments = [Segment::numeric("01234567").unwrap()];
    let data = encode_data(&segments, Version::MIN, ErrorCorrectionLevel::M).unwrap();
    assert_eq!(
        data,
        vec![
            0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11
        ]
    );
}

#[test]
fn test_alphanumeric_hello_world() {
    let segments = [Segment::alphanumeric("HELLO WORLD").unwrap()];
    let data = encode_data(&segments, Version::MIN, ErrorCorrectionLevel::M).unwrap();
    assert_eq!(
        data,
        vec![
            0x20, 0x5B, 0x0B, 0x78, 0xD1, 0x72, 0xDC, 0x4D, 0x43, 0x40, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11
        ]
    );
}

#[test]
fn test_byte_segment_header() {
    let segments = [Segment::byte("ab")];
    let data = encode_data(&segments, Version::MIN, ErrorCorrectionLevel::H).unwrap();
    // 0100 00000010 01100001 01100010 0000
    assert_eq!(&data[..4], &[0x40, 0x26, 0x16, 0x20]);
    assert_eq!(data.len(), 9);
    assert_eq!(&data[4..], &[0xEC, 0x11, 0xEC, 0x11, 0xEC]);
}

#[test]
fn test_no_padding_when_full() {
    // 4 + 8 + 112 = 124 bits, the terminator fills version 1-M
    let segments = [Segment::byte(vec![0xFFu8; 14])];
    let data = encode_data(&segments, Version::MIN, ErrorCorrectionLevel::M).unwrap();
    assert_eq!(data.len(), 16);
    assert_eq!(data[0], 0x40);
    assert_eq!(data[1], 0xEF);
    assert_eq!(data[15], 0xF0);
}

#[test]
fn test_data_too_long() {
    let segments = [Segment::byte(vec![0u8; 15])];
    assert_eq!(
        encode_data(&segments, Version::MIN, ErrorCorrectionLevel::M),
        Err(EncodingError::DataTooLong {
            version: Version::MIN,
            level: ErrorCorrectionLevel::M,
            required: Some(Version::new(2).unwrap()),
        })
    );
}

#[test]
fn test_empty_segments_only_padding() {
    let data = encode_data(&[], Version::MIN, ErrorCorrectionLevel::L).unwrap();
    assert_eq!(data.len(), 19);
    assert_eq!(&data[..3], &[0x00, 0xEC, 0x11]);
}

#[test]
fn test_invalid_characters() {
    assert_eq!(
        Segment::numeric("12a"),
        Err(EncodingError::InvalidCharacter('a', Mode::Numeric))
    );
    assert_eq!(
        Segment::alphanumeric("ABc"),
        Err(EncodingError::InvalidCharacter('c', Mode::Alphanumeric))
    );
    assert_eq!(
        Segment::kanji("点a", &kanji_mapper),
        Err(EncodingError::InvalidCharacter('a', Mode::Kanji))
    );
    assert_eq!(
        Segment::with_mode(Mode::Kanji, "点", None),
        Err(EncodingError::InvalidCharacter('点', Mode::Kanji))
    );
}

#[test]
fn test_bit_length_matches_written_bits() {
    let segments = [
        Segment::numeric("").unwrap(),
        Segment::numeric("1").unwrap(),
        Segment::numeric("12").unwrap(),
        Segment::numeric("1234567890").unwrap(),
        Segment::alphanumeric("A").unwrap(),
        Segment::alphanumeric("HELLO WORLD").unwrap(),
        Segment::byte("grüße"),
        Segment::byte(Vec::<u8>::new()),
        Segment::kanji("点茗点", &kanji_mapper).unwrap(),
    ];
    for segment in segments.iter() {
        let mut buf = BitBuffer::new();
        segment.write_into(&mut buf);
        assert_eq!(buf.len(), segment.bit_length(), "{:?}", segment);
    }
}

#[test]
fn test_segment_len() {
    assert_eq!(Segment::byte("grüße").len(), 7);
    assert_eq!(Segment::kanji("点茗", &kanji_mapper).unwrap().len(), 2);
    assert_eq!(Segment::numeric("0042").unwrap().len(), 4);
    assert!(Segment::byte(Vec::<u8>::new()).is_empty());
}

#[test]
fn test_segmentation_reconstructs_input() {
    let inputs = [
        "",
        "hello",
        "HELLO WORLD 1234567890",
        "abc123456789012345XYZ%%%点点点ünïcödé",
        "0000000000000000000000000000000000000000abc",
        "点茗点茗 and ascii 42",
    ];
    for text in inputs {
        for version in [1, 10, 27] {
            let version = Version::new(version).unwrap();
            let segments = segments_for(text, version, Some(&kanji_mapper)).unwrap();
            assert_eq!(concat(&segments), text.as_bytes(), "{}", text);
            let segments = segments_for(text, version, None).unwrap();
            assert_eq!(concat(&segments), text.as_bytes(), "{}", text);
        }
        let segments = raw_split(text, Some(&kanji_mapper)).unwrap();
        assert_eq!(concat(&segments), text.as_bytes(), "{}", text);
    }
}

#[test]
fn test_segmentation_merges_neighbours() {
    let segments = segments_for("ABC1DEF", Version::MIN, None).unwrap();
    assert_eq!(segments, vec![Segment::alphanumeric("ABC1DEF").unwrap()]);

    let segments = segments_for("abcAdef", Version::MIN, None).unwrap();
    assert_eq!(segments, vec![Segment::byte("abcAdef")]);
}

#[test]
fn test_segmentation_beats_single_byte_segment() {
    let text = "Order 12345678901234567890 for ACME-42: Übergröße";
    let version = Version::MIN;
    let bits = |segments: &[Segment]| -> usize {
        segments
            .iter()
            .map(|s| 4 + s.mode().char_count_bits(version) + s.bit_length())
            .sum()
    };
    let optimized = segments_for(text, version, None).unwrap();
    assert!(bits(&optimized) <= bits(&[Segment::byte(text)]));
    assert!(optimized.iter().any(|s| s.mode() == Mode::Numeric));
}

#[test]
fn test_kanji_segment_encoding() {
    let segments = [Segment::kanji("点茗", &kanji_mapper).unwrap()];
    let data = encode_data(&segments, Version::MIN, ErrorCorrectionLevel::H).unwrap();
    // 1000 00000010 0110110011111 1101010101010 0000
    let bits: String = data[..6]
        .iter()
        .map(|b| alloc::format!("{:08b}", b))
        .collect();
    assert_eq!(&bits[..42], "100000000010011011001111111010101010100000");
}
