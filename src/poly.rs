//! Polynomials over GF(2^m).
//!
//! Coefficients are field elements indexed by degree, kept canonical (no
//! trailing zeros; the zero polynomial is the empty vector). The field is
//! passed explicitly to every arithmetic operation: polynomials do not carry
//! a field reference, the private key owns the field exclusively.

use crate::field::{Elt, Gf2m};
use crate::helpers::{ensure, prime_divisors};
use crate::Error;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;


#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub(crate) struct GfPoly {
    coeffs: Vec<u16>,
}


impl GfPoly {
    pub(crate) fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    pub(crate) fn one() -> Self {
        Self { coeffs: vec![1] }
    }

    /// The monomial x^d.
    pub(crate) fn x_pow(d: usize) -> Self {
        let mut coeffs = vec![0u16; d + 1];
        coeffs[d] = 1;
        Self { coeffs }
    }

    /// Build from coefficients indexed by degree, dropping trailing zeros.
    pub(crate) fn from_coeffs(mut coeffs: Vec<u16>) -> Self {
        while coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub(crate) fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Coefficient of x^i (zero beyond the stored degree).
    pub(crate) fn coeff(&self, i: usize) -> Elt {
        self.coeffs.get(i).copied().unwrap_or(0)
    }

    fn lead(&self) -> Elt {
        self.coeffs.last().copied().unwrap_or(0)
    }

    pub(crate) fn add(&self, rhs: &Self) -> Self {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        let mut out = vec![0u16; n];
        for (i, c) in out.iter_mut().enumerate() {
            *c = self.coeff(i) ^ rhs.coeff(i);
        }
        Self::from_coeffs(out)
    }

    pub(crate) fn mul(&self, rhs: &Self, f: &Gf2m) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::zero();
        }
        let mut out = vec![0u16; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                out[i + j] ^= f.mul(a, b);
            }
        }
        Self::from_coeffs(out)
    }

    pub(crate) fn mul_scalar(&self, c: Elt, f: &Gf2m) -> Self {
        if c == 0 {
            return Self::zero();
        }
        Self::from_coeffs(self.coeffs.iter().map(|&a| f.mul(a, c)).collect())
    }

    /// Quotient and remainder; `d` must be nonzero.
    pub(crate) fn divmod(&self, d: &Self, f: &Gf2m) -> (Self, Self) {
        let dd = d.degree().expect("division by zero polynomial");
        if self.coeffs.len() <= dd {
            return (Self::zero(), self.clone());
        }
        let lead_inv = f.inv(d.lead());
        let mut rem = self.coeffs.clone();
        let mut q = vec![0u16; rem.len() - dd];
        for i in (dd..rem.len()).rev() {
            let c = rem[i];
            if c == 0 {
                continue;
            }
            let factor = f.mul(c, lead_inv);
            q[i - dd] = factor;
            for (j, &dc) in d.coeffs.iter().enumerate() {
                rem[i - dd + j] ^= f.mul(factor, dc);
            }
        }
        rem.truncate(dd);
        (Self::from_coeffs(q), Self::from_coeffs(rem))
    }

    pub(crate) fn rem(&self, d: &Self, f: &Gf2m) -> Self {
        self.divmod(d, f).1
    }

    /// Scale so the leading coefficient is 1; `self` must be nonzero.
    pub(crate) fn monic(&self, f: &Gf2m) -> Self {
        self.mul_scalar(f.inv(self.lead()), f)
    }

    pub(crate) fn gcd(a: &Self, b: &Self, f: &Gf2m) -> Self {
        let mut a = a.clone();
        let mut b = b.clone();
        while !b.is_zero() {
            let r = a.rem(&b, f);
            a = b;
            b = r;
        }
        a
    }

    /// Inverse of `self` in F[x]/g, when it exists (always, for g irreducible
    /// and `self` nonzero mod g).
    pub(crate) fn inv_mod(&self, g: &Self, f: &Gf2m) -> Option<Self> {
        let mut r_prev = g.clone();
        let mut r = self.rem(g, f);
        if r.is_zero() {
            return None;
        }
        let mut t_prev = Self::zero();
        let mut t_cur = Self::one();
        while !r.is_zero() {
            let (q, rem) = r_prev.divmod(&r, f);
            let t_next = t_prev.add(&q.mul(&t_cur, f));
            r_prev = r;
            r = rem;
            t_prev = t_cur;
            t_cur = t_next;
        }
        if r_prev.degree() == Some(0) {
            Some(t_prev.mul_scalar(f.inv(r_prev.coeff(0)), f))
        } else {
            None
        }
    }

    /// Extended Euclid on (g, self), halted at the first remainder of degree
    /// <= `stop_deg`. Returns (remainder a, cofactor b) with a = b*self mod g;
    /// this is the key-equation step of Patterson decoding.
    pub(crate) fn eea_halted(&self, g: &Self, stop_deg: usize, f: &Gf2m) -> (Self, Self) {
        let mut r_prev = g.clone();
        let mut r = self.clone();
        let mut b_prev = Self::zero();
        let mut b_cur = Self::one();
        while r.degree().map_or(false, |d| d > stop_deg) {
            let (q, rem) = r_prev.divmod(&r, f);
            let b_next = b_prev.add(&q.mul(&b_cur, f));
            r_prev = r;
            r = rem;
            b_prev = b_cur;
            b_cur = b_next;
        }
        (r, b_cur)
    }

    /// Horner evaluation at a field element.
    pub(crate) fn eval(&self, x: Elt, f: &Gf2m) -> Elt {
        let mut acc = 0;
        for &c in self.coeffs.iter().rev() {
            acc = f.mul(acc, x) ^ c;
        }
        acc
    }

    /// Multiply by x^k.
    pub(crate) fn shift_up(&self, k: usize) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let mut coeffs = vec![0u16; self.coeffs.len() + k];
        coeffs[k..].copy_from_slice(&self.coeffs);
        Self { coeffs }
    }

    /// Squaring; in characteristic 2 the cross terms vanish.
    pub(crate) fn square(&self, f: &Gf2m) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let mut out = vec![0u16; 2 * self.coeffs.len() - 1];
        for (i, &c) in self.coeffs.iter().enumerate() {
            out[2 * i] = f.mul(c, c);
        }
        Self::from_coeffs(out)
    }

    pub(crate) fn sqr_mod(&self, g: &Self, f: &Gf2m) -> Self {
        self.square(f).rem(g, f)
    }

    /// q-th power (q = 2^m) mod g: the Frobenius of F[x]/g applied to `self`.
    fn frobenius_mod(&self, g: &Self, f: &Gf2m) -> Self {
        let mut h = self.clone();
        for _ in 0..f.m() {
            h = h.sqr_mod(g, f);
        }
        h
    }

    /// Rabin's test over F_{2^m}: irreducible iff x^(q^t) = x mod self and
    /// gcd(x^(q^(t/p)) - x, self) is constant for every prime p | t.
    pub(crate) fn is_irreducible(&self, f: &Gf2m) -> bool {
        let t = match self.degree() {
            None | Some(0) => return false,
            Some(d) => d,
        };
        if t == 1 {
            return true;
        }
        if self.coeff(0) == 0 {
            return false; // divisible by x
        }
        let checkpoints: Vec<usize> = prime_divisors(t as u64)
            .iter()
            .map(|&q| t / usize::try_from(q).expect("divisor of a small degree"))
            .collect();
        let x = Self::x_pow(1);
        let mut h = x.clone();
        for i in 1..=t {
            h = h.frobenius_mod(self, f);
            if i < t && checkpoints.contains(&i) {
                let g = Self::gcd(&h.add(&x), self, f);
                if g.degree() != Some(0) {
                    return false;
                }
            }
        }
        h == x
    }

    /// Uniformly random monic irreducible polynomial of degree t: uniform
    /// coefficients (nonzero lead), scaled monic, retried until irreducible.
    #[allow(clippy::cast_possible_truncation)] // field elements fit u16
    pub(crate) fn random_monic_irreducible(t: usize, f: &Gf2m, rng: &mut impl CryptoRngCore) -> Self {
        debug_assert!(t >= 1, "degree must be positive");
        let order = f.order() as u64;
        loop {
            let mut coeffs = vec![0u16; t + 1];
            for c in coeffs.iter_mut().take(t) {
                *c = crate::prng::rand_range(rng, order) as u16;
            }
            coeffs[t] = crate::prng::rand_range(rng, order - 1) as u16 + 1;
            let p = Self { coeffs }.monic(f);
            if p.is_irreducible(f) {
                return p;
            }
        }
    }

    /// Square-root table for F[x]/g: entry i is sqrt(x^i) mod g. Built by
    /// inverting the squaring matrix S (row i = x^{2i} mod g) over F and
    /// taking elementwise square roots of the inverse's rows.
    pub(crate) fn sqrt_table(g: &Self, f: &Gf2m) -> Result<Vec<Self>, Error> {
        let t = g.degree().ok_or(Error::InvalidParameter("zero Goppa polynomial"))?;
        ensure!(t >= 1, Error::InvalidParameter("constant Goppa polynomial"));

        let mut s = vec![vec![0u16; t]; t];
        for (i, row) in s.iter_mut().enumerate() {
            let xi = Self::x_pow(2 * i).rem(g, f);
            for (j, c) in row.iter_mut().enumerate() {
                *c = xi.coeff(j);
            }
        }

        // Gauss-Jordan inversion over F.
        let mut inv = vec![vec![0u16; t]; t];
        for (i, row) in inv.iter_mut().enumerate() {
            row[i] = 1;
        }
        for col in 0..t {
            let pivot = (col..t)
                .find(|&r| s[r][col] != 0)
                .ok_or(Error::InvalidParameter("singular squaring matrix"))?;
            s.swap(col, pivot);
            inv.swap(col, pivot);
            let scale = f.inv(s[col][col]);
            for j in 0..t {
                s[col][j] = f.mul(s[col][j], scale);
                inv[col][j] = f.mul(inv[col][j], scale);
            }
            for r in 0..t {
                if r == col || s[r][col] == 0 {
                    continue;
                }
                let factor = s[r][col];
                for j in 0..t {
                    s[r][j] ^= f.mul(factor, s[col][j]);
                    inv[r][j] ^= f.mul(factor, inv[col][j]);
                }
            }
        }

        Ok(inv
            .into_iter()
            .map(|row| Self::from_coeffs(row.into_iter().map(|c| f.sqrt(c)).collect()))
            .collect())
    }

    /// Square root in F[x]/g via the precomputed table: since the inverse
    /// Frobenius is additive and multiplicative, sqrt(p) = sum over i of
    /// sqrt(p_i) * sqrt(x^i).
    pub(crate) fn sqrt_mod(&self, table: &[Self], f: &Gf2m) -> Self {
        let mut acc = Self::zero();
        for (i, &c) in self.coeffs.iter().enumerate() {
            if c == 0 {
                continue;
            }
            debug_assert!(i < table.len(), "polynomial degree exceeds sqrt table");
            acc = acc.add(&table[i].mul_scalar(f.sqrt(c), f));
        }
        acc
    }

    /// Coefficients as ceil(m/8)-byte little-endian groups, degree order.
    pub(crate) fn to_bytes(&self, f: &Gf2m) -> Vec<u8> {
        let el = elt_size(f);
        let mut out = Vec::with_capacity(self.coeffs.len() * el);
        for &c in &self.coeffs {
            out.extend_from_slice(&c.to_le_bytes()[..el]);
        }
        out
    }

    pub(crate) fn from_bytes(bytes: &[u8], f: &Gf2m) -> Result<Self, Error> {
        let el = elt_size(f);
        ensure!(bytes.len() % el == 0, Error::Io("truncated polynomial encoding"));
        let mut coeffs = Vec::with_capacity(bytes.len() / el);
        for chunk in bytes.chunks_exact(el) {
            let mut le = [0u8; 2];
            le[..el].copy_from_slice(chunk);
            let c = u16::from_le_bytes(le);
            ensure!(
                usize::from(c) < f.order(),
                Error::InvalidKey("polynomial coefficient outside the field")
            );
            coeffs.push(c);
        }
        Ok(Self::from_coeffs(coeffs))
    }
}


/// Serialized size of one field element, in bytes.
pub(crate) fn elt_size(f: &Gf2m) -> usize {
    ((f.m() + 7) / 8) as usize
}
