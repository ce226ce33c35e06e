//! Data masking and mask evaluation.
//!
//! The data modules are XORed with one of eight patterns to avoid
//! structures which confuse readers, like large uniform areas or
//! shapes resembling the finder pattern. Every pattern is tried and
//! the one with the lowest penalty score wins.
use log::trace;

use super::Matrix;
use crate::version::ErrorCorrectionLevel;
use crate::EncodingError;

#[cfg(test)]
use alloc::{vec, vec::Vec};
#[cfg(test)]
use pretty_assertions::assert_eq;

/// Penalty weights for the four rules.
const N1: usize = 3;
const N2: usize = 3;
const N3: usize = 40;
const N4: usize = 10;

/// One of the eight data mask patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaskPattern(u8);

impl MaskPattern {
    /// Create a mask pattern, fails if `index` is not between 0 and 7.
    pub fn new(index: u8) -> Result<Self, EncodingError> {
        if index < 8 {
            Ok(Self(index))
        } else {
            Err(EncodingError::BadMaskPattern(index))
        }
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    /// Iterate over all eight patterns.
    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }

    /// Check if the module at `row` (i) and `col` (j) is flipped by the mask.
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self.0 {
            0 => (i + j) % 2 == 0,
            1 => i % 2 == 0,
            2 => j % 3 == 0,
            3 => (i + j) % 3 == 0,
            4 => (i / 2 + j / 3) % 2 == 0,
            5 => (i * j) % 2 + (i * j) % 3 == 0,
            6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
            7 => ((i * j) % 3 + (i + j) % 2) % 2 == 0,
            _ => unreachable!("mask index checked on construction"),
        }
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = EncodingError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl Matrix {
    /// XOR all non-reserved modules with the mask. Applying it twice
    /// restores the matrix.
    pub(crate) fn apply_mask(&mut self, mask: MaskPattern) {
        for row in 0..self.size {
            for col in 0..self.size {
                let idx = row * self.size + col;
                if !self.reserved[idx] && mask.is_masked(row, col) {
                    self.modules[idx] = !self.modules[idx];
                }
            }
        }
    }
}

fn run_points(line: impl Iterator<Item = bool>) -> usize {
    let mut points = 0;
    let mut run = 0;
    let mut last = None;
    for module in line {
        if last == Some(module) {
            run += 1;
            continue;
        }
        if run >= 5 {
            points += N1 + (run - 5);
        }
        last = Some(module);
        run = 1;
    }
    if run >= 5 {
        points += N1 + (run - 5);
    }
    points
}

/// Rule 1: runs of five or more equal modules in a row or column.
fn same_color_runs(m: &Matrix) -> usize {
    (0..m.size)
        .map(|i| {
            run_points((0..m.size).map(|j| m.get(i, j)))
                + run_points((0..m.size).map(|j| m.get(j, i)))
        })
        .sum()
}

/// Rule 2: uniform 2x2 blocks, overlapping blocks are counted separately.
fn uniform_blocks(m: &Matrix) -> usize {
    let mut count = 0;
    for row in 0..m.size - 1 {
        for col in 0..m.size - 1 {
            let dark = [
                m.get(row, col),
                m.get(row, col + 1),
                m.get(row + 1, col),
                m.get(row + 1, col + 1),
            ]
            .iter()
            .filter(|b| **b)
            .count();
            if dark == 0 || dark == 4 {
                count += 1;
            }
        }
    }
    count * N2
}

/// Rule 3: the pattern 1011101 with four light modules on either side,
/// searched in 11 module windows of rows and columns.
fn finder_like_patterns(m: &Matrix) -> usize {
    let mut count = 0;
    for i in 0..m.size {
        let mut bits_row: u16 = 0;
        let mut bits_col: u16 = 0;
        for j in 0..m.size {
            bits_row = ((bits_row << 1) & 0x7FF) | m.get(i, j) as u16;
            bits_col = ((bits_col << 1) & 0x7FF) | m.get(j, i) as u16;
            if j >= 10 {
                count += [bits_row, bits_col]
                    .iter()
                    .filter(|b| **b == 0x5D0 || **b == 0x05D)
                    .count();
            }
        }
    }
    count * N3
}

/// Rule 4: deviation of the dark module ratio from 50% in 5% steps.
fn dark_ratio(m: &Matrix) -> usize {
    let total = m.modules.len();
    let dark = m.modules.iter().filter(|b| **b).count();
    // round(dark * 100 / total / 5)
    let steps = (dark * 40 + total) / (2 * total);
    steps.abs_diff(10) * N4
}

/// Compute the total penalty score of the matrix.
pub(crate) fn penalty(m: &Matrix) -> usize {
    same_color_runs(m) + uniform_blocks(m) + finder_like_patterns(m) + dark_ratio(m)
}

/// Find the mask with the lowest penalty, the first one wins ties.
///
/// Every mask is evaluated together with its format information. The
/// matrix is left unmasked.
pub(crate) fn best_mask(m: &mut Matrix, level: ErrorCorrectionLevel) -> MaskPattern {
    let mut best = MaskPattern::default();
    let mut lowest = usize::MAX;
    for mask in MaskPattern::all() {
        m.draw_format_info(level, mask);
        m.apply_mask(mask);
        let score = penalty(m);
        m.apply_mask(mask);
        trace!("mask {} has penalty {}", mask.index(), score);
        if score < lowest {
            lowest = score;
            best = mask;
        }
    }
    best
}

#[cfg(test)]
fn grid(rows: &[&str]) -> Matrix {
    let size = rows.len();
    let modules: Vec<bool> = rows
        .iter()
        .flat_map(|r| r.chars().map(|c| c == '#'))
        .collect();
    Matrix::from_modules(size, modules)
}

#[test]
fn test_new_mask() {
    assert_eq!(MaskPattern::new(7).map(|m| m.index()), Ok(7));
    assert_eq!(MaskPattern::new(8), Err(EncodingError::BadMaskPattern(8)));
    assert_eq!(MaskPattern::all().count(), 8);
}

#[test]
fn test_mask_formulas() {
    // first row and column of each pattern
    let expected = [
        ("#.#.#.", "#.#.#."),
        ("######", "#.#.#."),
        ("#..#..", "######"),
        ("#..#..", "#..#.."),
        ("###...", "##..##"),
        ("######", "######"),
        ("######", "######"),
        ("#.#.#.", "#.#.#."),
    ];
    for (mask, (row, col)) in MaskPattern::all().zip(expected) {
        let first_row: alloc::string::String = (0..6)
            .map(|j| if mask.is_masked(0, j) { '#' } else { '.' })
            .collect();
        let first_col: alloc::string::String = (0..6)
            .map(|i| if mask.is_masked(i, 0) { '#' } else { '.' })
            .collect();
        assert_eq!(first_row, row, "mask {}", mask.index());
        assert_eq!(first_col, col, "mask {}", mask.index());
    }
    // second row of pattern 5: (i j) % 2 + (i j) % 3 == 0 only where j % 6 == 0
    let mask = MaskPattern::new(5).unwrap();
    assert_eq!(
        (0..7).map(|j| mask.is_masked(1, j)).collect::<Vec<_>>(),
        vec![true, false, false, false, false, false, true]
    );
}

#[test]
fn test_mask_is_involution() {
    use crate::version::Version;

    let version = Version::new(7).unwrap();
    let mut m = Matrix::new(version, ErrorCorrectionLevel::Q);
    // some data
    for (i, module) in m.modules.iter_mut().enumerate() {
        if i % 7 == 3 {
            *module = !*module;
        }
    }
    let original = m.clone();
    for mask in MaskPattern::all() {
        m.apply_mask(mask);
        for row in 0..m.size() {
            for col in 0..m.size() {
                if m.is_reserved(row, col) {
                    assert_eq!(m.get(row, col), original.get(row, col));
                }
            }
        }
        m.apply_mask(mask);
        assert_eq!(m, original);
    }
}

#[test]
fn test_penalty_runs() {
    let m = grid(&[".....", ".....", ".....", ".....", "....."]);
    // 5 rows and 5 columns with a run of 5
    assert_eq!(same_color_runs(&m), 30);
    let m = grid(&["#######", ".#.#.#.", "#.#.#.#", ".#.#.#.", "#.#.#.#", ".#.#.#.", "#.#.#.#"]);
    // one run of 7 in the first row
    assert_eq!(same_color_runs(&m), 5);
}

#[test]
fn test_penalty_blocks() {
    let m = grid(&["##..", "##..", "..##", "..##"]);
    // only the four corner blocks are uniform
    assert_eq!(uniform_blocks(&m), 3 * 4);
    let m = grid(&["###", "###", "###"]);
    assert_eq!(uniform_blocks(&m), 3 * 4);
}

#[test]
fn test_penalty_finder_like() {
    let mut rows = vec!["#.###.#...."];
    rows.extend(core::iter::repeat("...........").take(10));
    let m = grid(&rows);
    assert_eq!(finder_like_patterns(&m), 40);

    let mut rows = vec!["....#.###.#"];
    rows.extend(core::iter::repeat("...........").take(10));
    let m = grid(&rows);
    assert_eq!(finder_like_patterns(&m), 40);
}

#[test]
fn test_penalty_dark_ratio() {
    let m = grid(&["....", "....", "....", "...."]);
    assert_eq!(dark_ratio(&m), 100);
    let m = grid(&["####", "####", "....", "...."]);
    assert_eq!(dark_ratio(&m), 0);
    // 6 of 16 dark is 37.5%, rounds to 8 steps of 5%
    let m = grid(&["####", "##..", "....", "...."]);
    assert_eq!(dark_ratio(&m), 20);
}

#[test]
fn test_best_mask_restores_matrix() {
    use crate::version::Version;

    let mut m = Matrix::new(Version::new(2).unwrap(), ErrorCorrectionLevel::L);
    for (i, module) in m.modules.iter_mut().enumerate() {
        if i % 5 == 0 {
            *module = true;
        }
    }
    let data: Vec<bool> = (0..m.size * m.size)
        .filter(|idx| !m.reserved[*idx])
        .map(|idx| m.modules[idx])
        .collect();
    let best = best_mask(&mut m, ErrorCorrectionLevel::L);

    let after: Vec<bool> = (0..m.size * m.size)
        .filter(|idx| !m.reserved[*idx])
        .map(|idx| m.modules[idx])
        .collect();
    assert_eq!(data, after);

    // the winner has the lowest penalty of all masks
    let mut scores = Vec::new();
    for mask in MaskPattern::all() {
        m.draw_format_info(ErrorCorrectionLevel::L, mask);
        m.apply_mask(mask);
        scores.push(penalty(&m));
        m.apply_mask(mask);
    }
    let min = *scores.iter().min().unwrap();
    assert_eq!(scores[best.index() as usize], min);
    assert_eq!(scores.iter().position(|s| *s == min), Some(best.index() as usize));
}
