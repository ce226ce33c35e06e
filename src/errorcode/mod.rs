//! Reed-Solomon error correction codes.
//!
//! The error correction in a QR Code is done using Reed-Solomon codes.
//!
//! Assuming you have never heard of coding theory: By putting some redundancy
//! into the symbol one can recover from, say, detection or printing errors
//! when trying to read it. A clever way to add redundancy is the Reed-Solomon
//! code. The details are relatively math heavy and involve, for example,
//! "higher" algebra (Galois fields). Any book about coding theory should cover
//! it, for example "Error Correction Coding: Mathematical Methods and
//! Algorithms" by Moon.
//!
//! Only the computation of the error code (called _encoding_) is implemented.
//!
//! Depending on the version and error correction level the data codewords
//! are split into blocks. QR Code uses up to two groups of blocks, the blocks
//! of the second group hold one data codeword more than the ones in the first
//! group. All blocks get the same number of error correction codewords.
mod galois;
mod polynomial;

use alloc::{vec, vec::Vec};

use crate::version::{ErrorCorrectionLevel, Version};

pub use polynomial::generator as generator_polynomial;

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Compute the error correction codewords for one block.
///
/// `generator` is the generator polynomial, its degree is the number of
/// error correction codewords. The result always has this length.
pub fn ec_codewords(data: &[u8], generator: &[u8]) -> Vec<u8> {
    // Let d be the data polynomial and g the generator polynomial
    // of degree k. We compute the remainder r of the division
    //
    //     d(x) * x^k = q(x) g(x) + r(x).
    //
    // Then d(x) * x^k - r(x) is divisible by g, the data is followed by
    // the coefficients of r as error code.
    let ec_len = generator.len() - 1;
    let mut padded = Vec::with_capacity(data.len() + ec_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + ec_len, 0);
    let remainder = polynomial::rem(&padded, generator);
    let mut ecc = vec![0; ec_len - remainder.len()];
    ecc.extend_from_slice(&remainder);
    ecc
}

/// Layout of the error correction blocks for a version and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSetup {
    /// Number of blocks in the first group
    pub blocks_in_group1: usize,
    /// Number of blocks in the second group
    pub blocks_in_group2: usize,
    /// Data codewords of a block in the first group, the second group has one more
    pub data_per_block: usize,
    /// Error correction codewords per block
    pub ec_per_block: usize,
}

impl BlockSetup {
    pub fn new(version: Version, level: ErrorCorrectionLevel) -> Self {
        let total = version.total_codewords();
        let data = version.data_codewords(level);
        let blocks = level.ec_blocks(version);
        let blocks_in_group2 = total % blocks;
        let data_per_block = data / blocks;
        let ec_per_block = total / blocks - data_per_block;
        debug_assert_eq!(ec_per_block * blocks, level.total_ec_codewords(version));
        Self {
            blocks_in_group1: blocks - blocks_in_group2,
            blocks_in_group2,
            data_per_block,
            ec_per_block,
        }
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks_in_group1 + self.blocks_in_group2
    }

    fn block_len(&self, block: usize) -> usize {
        if block < self.blocks_in_group1 {
            self.data_per_block
        } else {
            self.data_per_block + 1
        }
    }
}

/// Compute the final codeword sequence of a symbol.
///
/// The data is split into blocks, for each block an error code is computed.
/// The result contains the data codewords interleaved block by block,
/// followed by the interleaved error codes.
///
/// # Panics
///
/// If `data` does not have exactly the number of data codewords of
/// the version and level.
pub fn interleave(data: &[u8], version: Version, level: ErrorCorrectionLevel) -> Vec<u8> {
    let setup = BlockSetup::new(version, level);
    assert_eq!(
        data.len(),
        version.data_codewords(level),
        "wrong number of data codewords, this is a bug"
    );
    let generator = generator_polynomial(setup.ec_per_block);

    let mut data_blocks = Vec::with_capacity(setup.num_blocks());
    let mut ec_blocks = Vec::with_capacity(setup.num_blocks());
    let mut offset = 0;
    for block in 0..setup.num_blocks() {
        let len = setup.block_len(block);
        let block_data = &data[offset..offset + len];
        ec_blocks.push(ec_codewords(block_data, &generator));
        data_blocks.push(block_data);
        offset += len;
    }

    let mut result = Vec::with_capacity(version.total_codewords());
    for i in 0..setup.data_per_block + 1 {
        // blocks of the first group are exhausted one step earlier
        result.extend(data_blocks.iter().filter_map(|b| b.get(i)));
    }
    for i in 0..setup.ec_per_block {
        result.extend(ec_blocks.iter().map(|b| b[i]));
    }
    debug_assert_eq!(result.len(), version.total_codewords());
    result
}

#[test]
fn ec_block_hello_world() {
    // "HELLO WORLD", version 1-M
    let data = [
        0x20, 0x5B, 0x0B, 0x78, 0xD1, 0x72, 0xDC, 0x4D, 0x43, 0x40, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
        0x11,
    ];
    let ecc = ec_codewords(&data, &generator_polynomial(10));
    assert_eq!(ecc, vec![196, 35, 39, 119, 235, 215, 231, 226, 93, 23]);
}

#[test]
fn ec_block_numeric_annex() {
    // "01234567", version 1-M
    let data = [
        0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
        0x11,
    ];
    let ecc = ec_codewords(&data, &generator_polynomial(10));
    assert_eq!(
        ecc,
        vec![0xA5, 0x24, 0xD4, 0xC1, 0xED, 0x36, 0xC7, 0x87, 0x2C, 0x55]
    );
}

#[test]
fn ec_codewords_keep_leading_zeros() {
    let g = generator_polynomial(5);
    let ecc = ec_codewords(&[0, 0, 0], &g);
    assert_eq!(ecc, vec![0; 5]);
    for data in [[1u8, 2, 3], [255, 0, 7], [0, 0, 1]] {
        assert_eq!(ec_codewords(&data, &g).len(), 5);
    }
}

#[test]
fn ec_codewords_make_codeword_divisible() {
    let g = generator_polynomial(13);
    let data: Vec<u8> = (0..20).map(|i| (i * 37 + 11) as u8).collect();
    let mut codeword = data.clone();
    codeword.extend(ec_codewords(&data, &g));
    assert!(polynomial::rem(&codeword, &g).is_empty());
}

#[test]
fn block_setup_version_5_q() {
    // 2 blocks of 15 and 2 blocks of 16 data codewords, 18 EC codewords each
    let setup = BlockSetup::new(Version::new(5).unwrap(), ErrorCorrectionLevel::Q);
    assert_eq!(
        setup,
        BlockSetup {
            blocks_in_group1: 2,
            blocks_in_group2: 2,
            data_per_block: 15,
            ec_per_block: 18,
        }
    );
}

#[test]
fn block_setup_consistency() {
    for version in Version::all() {
        for level in enum_iterator::all::<ErrorCorrectionLevel>() {
            let setup = BlockSetup::new(version, level);
            let data = setup.blocks_in_group1 * setup.data_per_block
                + setup.blocks_in_group2 * (setup.data_per_block + 1);
            assert_eq!(data, version.data_codewords(level), "{:?} {:?}", version, level);
            assert_eq!(
                data + setup.num_blocks() * setup.ec_per_block,
                version.total_codewords()
            );
        }
    }
}

#[test]
fn interleave_order() {
    // version 5-Q: blocks of 15, 15, 16, 16 data codewords
    let version = Version::new(5).unwrap();
    let level = ErrorCorrectionLevel::Q;
    let data: Vec<u8> = (0..62).collect();
    let out = interleave(&data, version, level);
    assert_eq!(out.len(), 134);
    assert_eq!(&out[..8], &[0, 15, 30, 46, 1, 16, 31, 47]);
    // after 15 rounds only the long blocks are left
    assert_eq!(&out[56..62], &[14, 29, 44, 60, 45, 61]);

    let ecc0 = ec_codewords(&data[..15], &generator_polynomial(18));
    let ecc3 = ec_codewords(&data[46..], &generator_polynomial(18));
    assert_eq!(out[62], ecc0[0]);
    assert_eq!(out[65], ecc3[0]);
    assert_eq!(out[133], ecc3[17]);
}

#[test]
fn interleave_single_block() {
    let version = Version::MIN;
    let level = ErrorCorrectionLevel::M;
    let data = [
        0x20, 0x5B, 0x0B, 0x78, 0xD1, 0x72, 0xDC, 0x4D, 0x43, 0x40, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
        0x11,
    ];
    let out = interleave(&data, version, level);
    assert_eq!(&out[..16], &data);
    assert_eq!(&out[16..], &[196, 35, 39, 119, 235, 215, 231, 226, 93, 23]);
}
