//! This module contains the implementation of the GF(256) arithmetic used by
//! the Reed-Solomon codes in QR Code.
//!
//! The default representation of an element in GF(256) we use is given by a
//! an u8 (8bit integer) value. Its bits correspond to the coefficients of a
//! degree 7 polynomial with the least significand bit being the coefficient
//! for 1. For example:
//!
//! > 242 = 0b11110010 = x^7 + x^6 + x^5 + x^4 + x.
//!
//! Addition can be done coefficient by coefficient, so it is a XOR.
//!
//! Multiplication is defined modulo a fixed polynomial. QR Code uses
//! x^8 + x^4 + x^3 + x^2 + 1 (0x11D), for which x is a generator of the
//! multiplicative group: the powers 1, x, x^2, ..., x^254 give all non-zero
//! elements. Multiplying a and b is then done by looking up their powers
//! i and j (LOG table) and looking up x^(i + j) (EXP table).
use core::ops::{Add, AddAssign, Mul, MulAssign};

/// Compute the two lookup tables for GF(256).
///
/// The EXP table is doubled so that `EXP[log a + log b]` never needs a modulo.
const fn compute_exp_log() -> ([u8; 512], [u8; 256]) {
    let mut exp = [0u8; 512];
    let mut log = [0u8; 256];
    let mut p: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = p as u8;
        log[p as usize] = i as u8;

        p <<= 1;
        if p & 0x100 != 0 {
            p ^= 0x11D;
        }

        i += 1;
    }
    while i < 512 {
        exp[i] = exp[i - 255];
        i += 1;
    }
    (exp, log)
}

/// Lookup table to convert an element given as power i of the generator
/// to its polynomial representation.
const EXP: [u8; 512] = compute_exp_log().0;

/// Lookup table to convert an element in polynomial representation to
/// its power of the generator.
const LOG: [u8; 256] = compute_exp_log().1;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GF(pub u8);

impl GF {
    /// Get the generator raised to the power `i`.
    ///
    /// # Panics
    ///
    /// If `i` is outside of the table (`i >= 512`).
    pub fn exp(i: usize) -> Self {
        assert!(i < EXP.len(), "exp({}) outside of table", i);
        GF(EXP[i])
    }

    /// Get the power of the generator which gives this element.
    ///
    /// # Panics
    ///
    /// For the zero element, its logarithm is undefined.
    pub fn log(self) -> usize {
        assert!(self != GF(0), "log of 0");
        LOG[self.0 as usize] as usize
    }
}

impl core::fmt::Debug for GF {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> Result<(), core::fmt::Error> {
        f.write_fmt(format_args!("{}₂₅₆", self.0))
    }
}

impl Add<GF> for GF {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Self) -> Self {
        GF(self.0 ^ rhs.0)
    }
}

impl AddAssign<GF> for GF {
    fn add_assign(&mut self, rhs: GF) {
        *self = *self + rhs;
    }
}

impl Mul<GF> for GF {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        if self.0 == 0 || rhs.0 == 0 {
            return GF(0);
        }
        GF(EXP[LOG[self.0 as usize] as usize + LOG[rhs.0 as usize] as usize])
    }
}

impl MulAssign<GF> for GF {
    fn mul_assign(&mut self, rhs: GF) {
        *self = *self * rhs;
    }
}

impl From<GF> for u8 {
    fn from(a: GF) -> u8 {
        a.0
    }
}

impl From<u8> for GF {
    fn from(i: u8) -> Self {
        GF(i)
    }
}

#[test]
fn sanity_check_tables() {
    use std::collections::HashSet;

    let exp: HashSet<u8> = EXP[..255].iter().cloned().collect();
    assert_eq!(exp.len(), 255);
    assert!(!exp.contains(&0));

    for i in 0..255 {
        assert_eq!(i, LOG[EXP[i] as usize] as usize);
        assert_eq!(i + 1, EXP[LOG[i + 1] as usize] as usize);
        assert_eq!(EXP[i], EXP[i + 255]);
    }
}

#[test]
fn exp_log_inverse() {
    for x in 1..=255u8 {
        assert_eq!(GF::exp(GF(x).log()), GF(x));
    }
    for i in 0..255 {
        assert_eq!(GF::exp(i).log(), i);
    }
}

#[test]
fn exp_wraps() {
    assert_eq!(GF::exp(0), GF(1));
    assert_eq!(GF::exp(255), GF(1));
    assert_eq!(GF::exp(8), GF(0x1D));
    assert_eq!(GF::exp(300), GF::exp(45));
}

#[test]
#[should_panic(expected = "log of 0")]
fn log_of_zero() {
    GF(0).log();
}

#[test]
#[should_panic]
fn exp_out_of_table() {
    GF::exp(512);
}

#[test]
fn gf256_mul() {
    assert_eq!(GF(123) * GF(1), GF(123));
    assert_eq!(GF(234) * GF(0), GF(0));
    assert_eq!(GF(0) * GF(23), GF(0));
    assert_eq!(GF(2) * GF(128), GF(0x1D));
    assert_eq!(GF(3) * GF(7), GF(9));
}

#[test]
fn gf256_mul_zero_and_commutative() {
    for a in 0..=255u8 {
        assert_eq!(GF(a) * GF(0), GF(0));
        assert_eq!(GF(0) * GF(a), GF(0));
        for b in 0..=255u8 {
            assert_eq!(GF(a) * GF(b), GF(b) * GF(a));
        }
    }
}

#[test]
fn test_add_is_own_inverse() {
    for a in 0..=255u8 {
        let mut x = GF(a);
        x += GF(a);
        assert_eq!(x, GF(0));
    }
}
