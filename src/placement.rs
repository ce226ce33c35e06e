//! Arrangement of modules in a QR Code symbol.
//!
//! The module contains the struct [Matrix] which holds the function
//! patterns (finder, timing and alignment patterns, format and version
//! information) and can be used to iterate over the module positions
//! of each codeword, i.e., how the dark squares are mapped to the
//! encoded data as bytes. The matrix is internal to the encoder.
//!
//! An abstract bitmap struct [Bitmap] is the final output of encoding
//! and the only public part. It also contains helpers for rendering.
use alloc::{vec, vec::Vec};

use crate::version::{format_bits, ErrorCorrectionLevel, Version};

mod mask;

pub use mask::MaskPattern;
pub(crate) use mask::best_mask;

/// Trait for a visitor to the symbol's data modules.
///
/// Each codeword consists of eight modules. During traversal the
/// visitor is called with pointers to the codewords' modules, most
/// significant bit first.
pub(crate) trait Visitor {
    /// Visit the next codeword's modules.
    fn visit(&mut self, codeword_index: usize, bits: [&mut bool; 8]);
}

/// The module grid of a symbol under construction.
///
/// Modules belonging to function patterns are marked as reserved,
/// they are neither used for data nor masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Matrix {
    size: usize,
    modules: Vec<bool>,
    reserved: Vec<bool>,
}

impl Matrix {
    /// Create a matrix with all function patterns of `version`.
    ///
    /// The format information is written for mask 0 to reserve its
    /// modules, it must be rewritten once the mask is known.
    pub(crate) fn new(version: Version, level: ErrorCorrectionLevel) -> Self {
        let size = version.size();
        let mut matrix = Self {
            size,
            modules: vec![false; size * size],
            reserved: vec![false; size * size],
        };
        matrix.draw_finder_patterns();
        matrix.draw_timing_patterns();
        matrix.draw_alignment_patterns(version);
        matrix.draw_version_info(version);
        matrix.draw_format_info(level, MaskPattern::default());
        matrix
    }

    #[cfg(test)]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn get(&self, row: usize, col: usize) -> bool {
        self.modules[row * self.size + col]
    }

    #[cfg(test)]
    pub(crate) fn is_reserved(&self, row: usize, col: usize) -> bool {
        self.reserved[row * self.size + col]
    }

    fn set(&mut self, row: usize, col: usize, dark: bool) {
        self.modules[row * self.size + col] = dark;
        self.reserved[row * self.size + col] = true;
    }

    fn draw_finder_patterns(&mut self) {
        let size = self.size as isize;
        for (row, col) in [(0, 0), (size - 7, 0), (0, size - 7)] {
            // the pattern plus its light separator
            for r in -1..=7 {
                if !(0..size).contains(&(row + r)) {
                    continue;
                }
                for c in -1..=7 {
                    if !(0..size).contains(&(col + c)) {
                        continue;
                    }
                    let dark = ((0..=6).contains(&r) && (c == 0 || c == 6))
                        || ((0..=6).contains(&c) && (r == 0 || r == 6))
                        || ((2..=4).contains(&r) && (2..=4).contains(&c));
                    self.set((row + r) as usize, (col + c) as usize, dark);
                }
            }
        }
    }

    fn draw_timing_patterns(&mut self) {
        for i in 8..self.size - 8 {
            let dark = i % 2 == 0;
            self.set(i, 6, dark);
            self.set(6, i, dark);
        }
    }

    fn draw_alignment_patterns(&mut self, version: Version) {
        let coords = version.alignment_coordinates();
        let last = coords.len().saturating_sub(1);
        for (i, row) in coords.iter().enumerate() {
            for (j, col) in coords.iter().enumerate() {
                // these overlap with the finder patterns
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                for r in -2..=2isize {
                    for c in -2..=2isize {
                        let dark = r.abs() == 2 || c.abs() == 2 || (r == 0 && c == 0);
                        let y = (*row as isize + r) as usize;
                        let x = (*col as isize + c) as usize;
                        self.set(y, x, dark);
                    }
                }
            }
        }
    }

    fn draw_version_info(&mut self, version: Version) {
        let bits = match version.encoded_bits() {
            Some(bits) => bits,
            None => return,
        };
        for i in 0..18 {
            let dark = (bits >> i) & 1 == 1;
            let row = i / 3;
            let col = i % 3 + self.size - 11;
            self.set(row, col, dark);
            self.set(col, row, dark);
        }
    }

    /// Write the format information for `level` and `mask`, both copies,
    /// and the dark module next to the lower left finder pattern.
    pub(crate) fn draw_format_info(&mut self, level: ErrorCorrectionLevel, mask: MaskPattern) {
        let bits = format_bits(level, mask);
        let size = self.size;
        for i in 0..15 {
            let dark = (bits >> i) & 1 == 1;

            // vertical, top left and lower left
            let row = match i {
                0..=5 => i,
                6..=7 => i + 1,
                _ => size - 15 + i,
            };
            self.set(row, 8, dark);

            // horizontal, top right and top left
            let col = match i {
                0..=7 => size - i - 1,
                8 => 15 - i,
                _ => 14 - i,
            };
            self.set(8, col, dark);
        }
        self.set(size - 8, 8, true);
    }

    /// Positions of the data modules in placement order.
    ///
    /// Starting in the lower right corner, pairs of columns are filled
    /// upwards and downwards in turn. The vertical timing pattern column
    /// is skipped.
    fn data_path(&self) -> Vec<usize> {
        let size = self.size;
        let mut path = Vec::with_capacity(size * size);
        let mut upwards = true;
        let mut right = size - 1;
        while right >= 1 {
            if right == 6 {
                right -= 1;
            }
            for step in 0..size {
                let row = if upwards { size - 1 - step } else { step };
                for col in [right, right - 1] {
                    let idx = row * size + col;
                    if !self.reserved[idx] {
                        path.push(idx);
                    }
                }
            }
            upwards = !upwards;
            if right < 2 {
                break;
            }
            right -= 2;
        }
        path
    }

    /// Traverse the data modules in codeword order and call the visitor.
    ///
    /// Remainder modules after the last full codeword are set to light.
    pub(crate) fn traverse<V: Visitor>(&mut self, visitor: &mut V) {
        let path = self.data_path();
        let mut chunks = path.chunks_exact(8);
        for (codeword_idx, chunk) in chunks.by_ref().enumerate() {
            let mut indices = [0; 8];
            indices.copy_from_slice(chunk);
            visitor.visit(codeword_idx, self.bits_mut(indices));
        }
        for idx in chunks.remainder() {
            self.modules[*idx] = false;
        }
    }

    /// Get mutable references to the modules at `indices`.
    fn bits_mut(&mut self, indices: [usize; 8]) -> [&mut bool; 8] {
        let mut refs = [None, None, None, None, None, None, None, None];
        let mut perm: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];
        perm.sort_unstable_by_key(|i| indices[*i as usize]);

        let mut prev = 0;
        let mut rest: &mut [bool] = &mut self.modules;
        for perm_idx in perm.iter() {
            let idx = indices[*perm_idx as usize];
            let (e, new_rest) = rest[(idx - prev)..]
                .split_first_mut()
                .expect("module index out of range, this is a bug");
            refs[*perm_idx as usize] = Some(e);
            rest = new_rest;
            prev = idx + 1;
        }

        refs.map(|r| r.expect("duplicate module index, this is a bug"))
    }

    /// Get the content of the matrix as a bitmap.
    pub(crate) fn bitmap(&self) -> Bitmap {
        Bitmap {
            size: self.size,
            bits: self.modules.clone(),
        }
    }

    /// Recreate the matrix of a finished symbol.
    #[cfg(test)]
    pub(crate) fn from_bitmap(
        bitmap: &Bitmap,
        version: Version,
        level: ErrorCorrectionLevel,
    ) -> Self {
        let mut matrix = Self::new(version, level);
        assert_eq!(matrix.size, bitmap.size);
        matrix.modules.copy_from_slice(&bitmap.bits);
        matrix
    }

    #[cfg(test)]
    pub(crate) fn from_modules(size: usize, modules: Vec<bool>) -> Self {
        assert_eq!(modules.len(), size * size);
        Self {
            size,
            modules,
            reserved: vec![false; size * size],
        }
    }
}

/// The modules of a finished symbol.
///
/// The quiet zone is not included, renderers must add a light border
/// of at least four modules.
///
/// A finished symbol is read only, the matrix it was built in is not
/// reachable from outside of the crate.
///
/// ```compile_fail
/// use qrsymbol::placement::Matrix;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bitmap {
    size: usize,
    bits: Vec<bool>,
}

impl Bitmap {
    /// Number of modules per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check if the module in `row` and `col` is dark.
    ///
    /// # Panics
    ///
    /// If the position is outside of the symbol.
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(row < self.size && col < self.size, "module outside of symbol");
        self.bits[row * self.size + col]
    }

    /// Get an iterator over the dark modules' coordinates `(x, y)`.
    ///
    /// The coordinate system is centered in the top left corner starting
    /// in `(0, 0)` with a horizontal x-axis and vertical y-axis.
    /// The modules are returned in order, incrementing x before y.
    ///
    /// # Example
    ///
    /// ```rust
    /// let code = qrsymbol::QrCode::encode("Foo").unwrap();
    /// for (x, y) in code.modules().pixels() {
    ///     // place square/circle at (x, y) to render the symbol
    /// }
    /// ```
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.size;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_i, b)| **b)
            .map(move |(i, _b)| (i % w, i / w))
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
struct FirstCodewordVisitor;

#[cfg(test)]
impl Visitor for FirstCodewordVisitor {
    fn visit(&mut self, cw: usize, bits: [&mut bool; 8]) {
        for bit in bits {
            *bit = cw == 0;
        }
    }
}

#[cfg(test)]
fn free_modules(matrix: &Matrix) -> usize {
    matrix.reserved.iter().filter(|r| !**r).count()
}

#[test]
fn test_finder_patterns() {
    let m = Matrix::new(Version::MIN, ErrorCorrectionLevel::M);
    for (row, col) in [(0, 0), (14, 0), (0, 14)] {
        // outer ring, light ring, 3x3 core
        assert!(m.get(row, col));
        assert!(m.get(row + 6, col + 6));
        assert!(!m.get(row + 1, col + 1));
        assert!(!m.get(row + 5, col + 3));
        assert!(m.get(row + 2, col + 2));
        assert!(m.get(row + 3, col + 3));
        assert!(m.get(row + 4, col + 4));
    }
    // separators
    assert!(!m.get(7, 0));
    assert!(!m.get(0, 7));
    assert!(!m.get(13, 7));
    assert!(!m.get(7, 13));
    assert!(m.is_reserved(7, 7));
}

#[test]
fn test_timing_and_dark_module() {
    let m = Matrix::new(Version::MIN, ErrorCorrectionLevel::M);
    for i in 8..13 {
        assert_eq!(m.get(6, i), i % 2 == 0);
        assert_eq!(m.get(i, 6), i % 2 == 0);
        assert!(m.is_reserved(6, i));
    }
    assert!(m.get(13, 8));
    assert!(m.is_reserved(13, 8));
}

#[test]
fn test_alignment_pattern_version_2() {
    let m = Matrix::new(Version::new(2).unwrap(), ErrorCorrectionLevel::M);
    assert!(m.get(18, 18));
    assert!(!m.get(17, 18));
    assert!(!m.get(19, 19));
    assert!(m.get(16, 16));
    assert!(m.get(20, 18));
    assert!(m.is_reserved(16, 20));
    assert!(!m.is_reserved(15, 15));
}

#[test]
fn test_format_info_placement() {
    let mut m = Matrix::new(Version::MIN, ErrorCorrectionLevel::M);
    let mask = MaskPattern::new(5).unwrap();
    m.draw_format_info(ErrorCorrectionLevel::L, mask);
    let bits = format_bits(ErrorCorrectionLevel::L, mask);
    let size = m.size();
    let bit = |i: usize| (bits >> i) & 1 == 1;
    // bits 0-7 along column 8 from the top, skipping the timing row
    let vertical = [(0, 8), (1, 8), (2, 8), (3, 8), (4, 8), (5, 8), (7, 8), (8, 8)];
    for (i, (r, c)) in vertical.iter().enumerate() {
        assert_eq!(m.get(*r, *c), bit(i));
    }
    // bits 8-14 in the lower left
    for i in 8..15 {
        assert_eq!(m.get(size - 15 + i, 8), bit(i));
    }
    // bits 0-7 in the top right, 8-14 in the top left skipping the timing column
    for i in 0..8 {
        assert_eq!(m.get(8, size - 1 - i), bit(i));
    }
    assert_eq!(m.get(8, 7), bit(8));
    for i in 9..15 {
        assert_eq!(m.get(8, 14 - i), bit(i));
    }
}

#[test]
fn test_version_info_placement() {
    let version = Version::new(7).unwrap();
    let m = Matrix::new(version, ErrorCorrectionLevel::M);
    let bits = version.encoded_bits().unwrap();
    let size = m.size();
    for i in 0..18 {
        let dark = (bits >> i) & 1 == 1;
        assert_eq!(m.get(i / 3, size - 11 + i % 3), dark);
        assert_eq!(m.get(size - 11 + i % 3, i / 3), dark);
    }
}

#[test]
fn test_data_modules_match_codewords() {
    // remainder bits per version range from ISO/IEC 18004 Table 1
    let remainder = |v: u8| match v {
        1 => 0,
        2..=6 => 7,
        7..=13 => 0,
        14..=20 => 3,
        21..=27 => 4,
        28..=34 => 3,
        _ => 0,
    };
    for version in Version::all() {
        let m = Matrix::new(version, ErrorCorrectionLevel::M);
        assert_eq!(
            free_modules(&m),
            version.total_codewords() * 8 + remainder(version.number()),
            "version {}",
            version
        );
        assert_eq!(m.data_path().len(), free_modules(&m));
    }
}

#[test]
fn test_first_codeword_position() {
    let mut m = Matrix::new(Version::MIN, ErrorCorrectionLevel::M);
    m.traverse(&mut FirstCodewordVisitor);
    // the first codeword fills a 2x4 block in the lower right corner
    let mut dark = Vec::new();
    for row in 9..21 {
        for col in 9..21 {
            if m.get(row, col) {
                dark.push((row, col));
            }
        }
    }
    assert_eq!(
        dark,
        vec![
            (17, 19),
            (17, 20),
            (18, 19),
            (18, 20),
            (19, 19),
            (19, 20),
            (20, 19),
            (20, 20)
        ]
    );
}

#[test]
fn test_traverse_turns_at_top() {
    // version 1: columns 20 and 19 hold three codewords going up, the
    // fourth codeword starts at the top of columns 18 and 17 going down
    struct Mark(usize);
    impl Visitor for Mark {
        fn visit(&mut self, cw: usize, bits: [&mut bool; 8]) {
            for bit in bits {
                *bit = cw == 3;
            }
            self.0 += 1;
        }
    }
    let mut m = Matrix::new(Version::MIN, ErrorCorrectionLevel::M);
    let mut visitor = Mark(0);
    m.traverse(&mut visitor);
    assert_eq!(visitor.0, 26);
    for row in 9..13 {
        assert!(m.get(row, 18) && m.get(row, 17));
    }
    assert!(!m.get(13, 18));
    assert!(!m.get(12, 20));
}

#[test]
fn test_pixels() {
    let m = Matrix::from_modules(2, vec![true, false, false, true]);
    let bitmap = m.bitmap();
    assert_eq!(bitmap.size(), 2);
    assert!(bitmap.get(1, 1));
    assert_eq!(bitmap.pixels().collect::<Vec<_>>(), vec![(0, 0), (1, 1)]);
}
