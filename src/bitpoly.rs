//! Polynomials over GF(2), packed as the bit pattern of a machine word.
//!
//! Degree 63 is the ceiling, far above the degree-16 field polynomials this
//! crate selects. Coefficient i of `p` is bit i, so the integer value doubles
//! as the stable wire encoding of a field polynomial.

use rand_core::CryptoRngCore;


/// Degree of `p`; the zero polynomial has degree -1.
pub(crate) fn deg(p: u64) -> i32 {
    63 - p.leading_zeros() as i32
}


fn deg128(p: u128) -> i32 {
    127 - p.leading_zeros() as i32
}


/// Carry-less product of two words.
fn clmul(a: u64, b: u64) -> u128 {
    let mut acc = 0u128;
    let mut a = a;
    let mut shift = 0;
    while a != 0 {
        if a & 1 == 1 {
            acc ^= u128::from(b) << shift;
        }
        a >>= 1;
        shift += 1;
    }
    acc
}


/// Remainder of `x` modulo the nonzero polynomial `p`.
fn rem128(mut x: u128, p: u64) -> u64 {
    debug_assert_ne!(p, 0, "rem128: division by zero polynomial");
    let pd = deg(p);
    while deg128(x) >= pd {
        x ^= u128::from(p) << (deg128(x) - pd);
    }
    #[allow(clippy::cast_possible_truncation)] // deg(x) < deg(p) <= 63 here
    let out = x as u64;
    out
}


/// `a * b mod p` in GF(2)[x].
pub(crate) fn mul_mod(a: u64, b: u64, p: u64) -> u64 {
    rem128(clmul(a, b), p)
}


/// Polynomial GCD (not normalized; over GF(2) every nonzero poly is monic).
pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = rem128(u128::from(a), b);
        a = b;
        b = r;
    }
    a
}


/// Rabin's irreducibility test: p of degree n is irreducible iff
/// x^(2^n) = x mod p and gcd(x^(2^(n/q)) - x, p) = 1 for every prime q | n.
pub(crate) fn is_irreducible(p: u64) -> bool {
    let n = deg(p);
    if n <= 0 {
        return false;
    }
    if n == 1 {
        return true; // x and x+1
    }
    if p & 1 == 0 {
        return false; // divisible by x
    }
    #[allow(clippy::cast_sign_loss)] // n > 0 checked above
    let n = n as u32;
    let checkpoints: Vec<u32> = crate::helpers::prime_divisors(u64::from(n))
        .iter()
        .map(|q| n / u32::try_from(*q).expect("divisor of a small degree"))
        .collect();
    let x = 2u64;
    let mut h = x; // x^(2^0)
    for i in 1..=n {
        h = mul_mod(h, h, p);
        if i < n && checkpoints.contains(&i) && gcd(h ^ x, p) != 1 {
            return false;
        }
    }
    h == x
}


/// First irreducible polynomial of degree m in ascending integer order.
/// This is the deterministic default field polynomial for GF(2^m).
pub(crate) fn first_irreducible(m: u32) -> u64 {
    debug_assert!(m >= 1 && m <= 16, "field degree out of range");
    ((1u64 << m)..(1u64 << (m + 1)))
        .find(|&p| is_irreducible(p))
        .expect("an irreducible of every degree exists")
}


/// Uniformly random irreducible polynomial of degree m.
pub(crate) fn random_irreducible(m: u32, rng: &mut impl CryptoRngCore) -> u64 {
    debug_assert!(m >= 1 && m <= 16, "field degree out of range");
    let mask = (1u64 << m) - 2; // inner coefficients; constant term forced to 1
    loop {
        let p = (1u64 << m) | (rng.next_u64() & mask) | 1;
        if is_irreducible(p) {
            return p;
        }
    }
}
