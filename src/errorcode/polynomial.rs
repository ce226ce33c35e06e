//! Polynomials over GF(256).
//!
//! A polynomial is a slice of coefficients, highest power first. So
//! `[1, 3, 2]` is x^2 + 3x + 2.
use alloc::{vec, vec::Vec};

use super::galois::GF;

/// Multiply two polynomials.
pub fn mul(p1: &[u8], p2: &[u8]) -> Vec<u8> {
    let mut coeff = vec![GF(0); p1.len() + p2.len() - 1];
    for (i, a) in p1.iter().enumerate() {
        for (j, b) in p2.iter().enumerate() {
            coeff[i + j] += GF(*a) * GF(*b);
        }
    }
    coeff.into_iter().map(u8::from).collect()
}

/// Compute the remainder of the division of `dividend` by `divisor`.
///
/// The divisor must be monic. Leading zeros of the remainder are stripped,
/// so the result can be shorter than `divisor.len() - 1`.
pub fn rem(dividend: &[u8], divisor: &[u8]) -> Vec<u8> {
    debug_assert_eq!(divisor.first(), Some(&1));
    let mut result: Vec<u8> = dividend.to_vec();
    let mut start = 0;
    while result.len() - start >= divisor.len() {
        let coeff = GF(result[start]);
        for (r, d) in result[start..].iter_mut().zip(divisor) {
            *r = (GF(*r) + GF(*d) * coeff).into();
        }
        // remove all zeros from the head
        while start < result.len() && result[start] == 0 {
            start += 1;
        }
    }
    result.drain(..start);
    result
}

/// Build the Reed-Solomon generator polynomial of the given degree,
///
/// > (x - a^0)(x - a^1)...(x - a^(degree - 1)),
///
/// where a is the generator of GF(256).
pub fn generator(degree: usize) -> Vec<u8> {
    let mut poly = vec![1];
    for i in 0..degree {
        poly = mul(&poly, &[1, GF::exp(i).into()]);
    }
    poly
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_mul() {
    // (x + 1)(x + 1) = x^2 + 1 in characteristic 2
    assert_eq!(mul(&[1, 1], &[1, 1]), vec![1, 0, 1]);
    assert_eq!(mul(&[1], &[7, 3]), vec![7, 3]);
    assert_eq!(mul(&[2, 0], &[1, 1]), vec![2, 2, 0]);
}

#[test]
fn test_rem_exact_division() {
    let a = [1, 5];
    let b = [1, 9, 3];
    let product = mul(&a, &b);
    assert!(rem(&product, &b).is_empty());
    assert!(rem(&product, &a).is_empty());
}

#[test]
fn test_rem_shorter_dividend() {
    assert_eq!(rem(&[4, 2], &[1, 2, 3]), vec![4, 2]);
}

#[test]
fn test_rem_inverts_mul() {
    let g = generator(4);
    let q = [17, 0, 200];
    let r = [3, 99];
    let mut p = mul(&q, &g);
    let n = p.len();
    p[n - 1] ^= r[1];
    p[n - 2] ^= r[0];
    assert_eq!(rem(&p, &g), r.to_vec());
}

#[test]
fn test_generator_degree_7() {
    // ISO/IEC 18004 Annex A, in exponent notation:
    // x^7 + a^87 x^6 + a^229 x^5 + a^146 x^4 + a^149 x^3 + a^238 x^2 + a^102 x + a^21
    let expected: Vec<u8> = [0, 87, 229, 146, 149, 238, 102, 21]
        .iter()
        .map(|e| GF::exp(*e).into())
        .collect();
    assert_eq!(generator(7), expected);
}

#[test]
fn test_generator_roots() {
    // every power a^i for i < degree is a root
    let g = generator(10);
    assert_eq!(g.len(), 11);
    for i in 0..10 {
        let x = GF::exp(i);
        let value = g.iter().fold(GF(0), |acc, c| acc * x + GF(*c));
        assert_eq!(value, GF(0));
    }
}
