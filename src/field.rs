//! GF(2^m) element arithmetic over exp/log tables.
//!
//! Elements are integers in [0, 2^m); addition is XOR. The tables are built
//! once per field from a fixed generator: the smallest element whose
//! multiplicative order is 2^m - 1 under the chosen field polynomial.

use crate::bitpoly;
use crate::helpers::ensure;
use crate::Error;
use zeroize::Zeroize;


/// A field element. Stored as u16; only the low m bits are significant.
pub(crate) type Elt = u16;


#[derive(Clone, Zeroize)]
pub(crate) struct Gf2m {
    m: u32,
    poly: u32,
    exp: Vec<u16>,
    log: Vec<u16>,
}


/// Product in GF(2)[x] / poly, computed without tables (used to build them).
fn mul_raw(a: u64, b: u64, poly: u64) -> u64 {
    bitpoly::mul_mod(a, b, poly)
}


fn pow_raw(mut base: u64, mut e: u64, poly: u64) -> u64 {
    let mut acc = 1u64;
    while e != 0 {
        if e & 1 == 1 {
            acc = mul_raw(acc, base, poly);
        }
        base = mul_raw(base, base, poly);
        e >>= 1;
    }
    acc
}


impl Gf2m {
    /// Construct GF(2^m) with the given field polynomial (validated).
    pub(crate) fn new(m: u32, poly: u32) -> Result<Self, Error> {
        ensure!((1..=16).contains(&m), Error::InvalidParameter("field degree out of range"));
        ensure!(
            bitpoly::deg(u64::from(poly)) == i32::try_from(m).expect("m <= 16"),
            Error::InvalidParameter("field polynomial degree mismatch")
        );
        ensure!(
            bitpoly::is_irreducible(u64::from(poly)),
            Error::InvalidParameter("field polynomial is reducible")
        );

        let order = 1usize << m;
        let n1 = (order - 1) as u64;
        let p64 = u64::from(poly);

        // Smallest element of full multiplicative order.
        let generator = if m == 1 {
            1u64
        } else {
            let primes = crate::helpers::prime_divisors(n1);
            (2..order as u64)
                .find(|&g| primes.iter().all(|&q| pow_raw(g, n1 / q, p64) != 1))
                .expect("GF(2^m)* is cyclic")
        };

        let mut exp = vec![0u16; order];
        let mut log = vec![0u16; order];
        let mut cur = 1u64;
        for i in 0..order - 1 {
            #[allow(clippy::cast_possible_truncation)] // elements are < 2^16
            {
                exp[i] = cur as u16;
                log[cur as usize] = i as u16;
            }
            cur = mul_raw(cur, generator, p64);
        }
        exp[order - 1] = 1; // wraps: exp[2^m - 1] = exp[0]

        Ok(Self { m, poly, exp, log })
    }

    pub(crate) fn m(&self) -> u32 {
        self.m
    }

    pub(crate) fn poly(&self) -> u32 {
        self.poly
    }

    /// Number of field elements, 2^m.
    pub(crate) fn order(&self) -> usize {
        1 << self.m
    }

    pub(crate) fn add(a: Elt, b: Elt) -> Elt {
        a ^ b
    }

    pub(crate) fn mul(&self, a: Elt, b: Elt) -> Elt {
        if a == 0 || b == 0 {
            return 0;
        }
        let n1 = self.order() - 1;
        self.exp[(usize::from(self.log[usize::from(a)]) + usize::from(self.log[usize::from(b)])) % n1]
    }

    /// Multiplicative inverse; `a` must be nonzero (caller invariant).
    pub(crate) fn inv(&self, a: Elt) -> Elt {
        assert_ne!(a, 0, "inverse of zero");
        let n1 = self.order() - 1;
        self.exp[(n1 - usize::from(self.log[usize::from(a)])) % n1]
    }

    pub(crate) fn pow(&self, a: Elt, e: u64) -> Elt {
        if a == 0 {
            return u16::from(e == 0);
        }
        let n1 = (self.order() - 1) as u64;
        let idx = (u64::from(self.log[usize::from(a)]) * (e % n1)) % n1;
        self.exp[usize::try_from(idx).expect("index < 2^16")]
    }

    /// Square root, a^(2^(m-1)); total since squaring is a bijection.
    pub(crate) fn sqrt(&self, a: Elt) -> Elt {
        self.pow(a, 1 << (self.m - 1))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Gf2m {
        Gf2m::new(4, 0b1_0011).unwrap()
    }

    #[test]
    fn table_invariants() {
        let f = field();
        for i in 0..f.order() - 1 {
            assert_eq!(usize::from(f.log[usize::from(f.exp[i])]), i);
        }
        for x in 1..f.order() {
            assert_eq!(usize::from(f.exp[usize::from(f.log[x])]), x);
        }
    }

    #[test]
    fn inverses() {
        let f = field();
        for a in 1..f.order() as Elt {
            assert_eq!(f.mul(a, f.inv(a)), 1, "a = {a}");
        }
    }

    #[test]
    fn ring_laws_exhaustive() {
        let f = field();
        let n = f.order() as Elt;
        for a in 0..n {
            for b in 0..n {
                assert_eq!(f.mul(a, b), f.mul(b, a));
                for c in 0..n {
                    assert_eq!(f.mul(f.mul(a, b), c), f.mul(a, f.mul(b, c)));
                    assert_eq!(
                        f.mul(a, Gf2m::add(b, c)),
                        Gf2m::add(f.mul(a, b), f.mul(a, c))
                    );
                }
            }
        }
    }

    #[test]
    fn sqrt_squares() {
        let f = field();
        for a in 0..f.order() as Elt {
            let r = f.sqrt(a);
            assert_eq!(f.mul(r, r), a);
        }
    }

    #[test]
    fn pow_matches_repeated_mul() {
        let f = Gf2m::new(8, 0x11D).unwrap();
        let mut acc = 1;
        for e in 0..20 {
            assert_eq!(f.pow(3, e), acc);
            acc = f.mul(acc, 3);
        }
    }

    #[test]
    fn rejects_bad_polynomials() {
        assert!(Gf2m::new(4, 0b1_0000).is_err()); // x^4, reducible
        assert!(Gf2m::new(4, 0b111).is_err()); // degree mismatch
        assert!(Gf2m::new(0, 3).is_err());
        assert!(Gf2m::new(17, 3).is_err());
    }
}
