//! Binary irreducible Goppa code: canonical parity-check matrix and
//! Patterson syndrome decoding.
//!
//! The code locators are the n = 2^m field elements in integer enumeration,
//! L_j = j. Column j of the canonical check matrix holds the coefficients of
//! 1/(x - L_j) mod g, each expanded into an m-bit stack: coefficient i of the
//! column polynomial occupies rows i*m .. (i+1)*m, low bit first.

use crate::field::{Elt, Gf2m};
use crate::helpers::ensure;
use crate::matrix::{GfMatrix, GfVector};
use crate::poly::GfPoly;
use crate::Error;


/// Canonical mt x n parity-check matrix for the code defined by (field, g).
pub(crate) fn check_matrix(f: &Gf2m, g: &GfPoly) -> Result<GfMatrix, Error> {
    let t = g.degree().ok_or(Error::InvalidParameter("zero Goppa polynomial"))?;
    ensure!(t >= 1, Error::InvalidParameter("constant Goppa polynomial"));
    let n = f.order();
    let m = f.m() as usize;

    let mut h = GfMatrix::zero(m * t, n);
    let mut col = vec![0u16; t];
    for j in 0..n {
        #[allow(clippy::cast_possible_truncation)] // locator < 2^16
        let loc = j as Elt;
        let g_at = g.eval(loc, f);
        // An irreducible g of degree >= 2 has no roots in F; degree 1 could.
        ensure!(g_at != 0, Error::InvalidParameter("Goppa polynomial vanishes on a locator"));
        let scale = f.inv(g_at);

        // Synthetic division: (g(x) - g(L)) / (x - L), top coefficient down.
        let mut acc = g.coeff(t);
        col[t - 1] = acc;
        for i in (1..t).rev() {
            acc = Gf2m::add(g.coeff(i), f.mul(loc, acc));
            col[i - 1] = acc;
        }

        for (i, &c) in col.iter().enumerate() {
            let e = f.mul(c, scale);
            for u in 0..m {
                if (e >> u) & 1 == 1 {
                    h.set(i * m + u, j, true);
                }
            }
        }
    }
    Ok(h)
}


/// Reassemble the syndrome bit vector into a polynomial over F.
fn syndrome_poly(f: &Gf2m, t: usize, syn: &GfVector) -> GfPoly {
    let m = f.m() as usize;
    let mut coeffs = vec![0u16; t];
    for (i, c) in coeffs.iter_mut().enumerate() {
        for u in 0..m {
            if syn.get(i * m + u) {
                *c |= 1 << u;
            }
        }
    }
    GfPoly::from_coeffs(coeffs)
}


/// Patterson decoding: recover the error vector of weight <= t from a
/// received word `y` (original code coordinates). Fails with
/// `InvalidCiphertext` when `y` is farther than t from every codeword.
pub(crate) fn decode(
    f: &Gf2m, g: &GfPoly, sqrt_tab: &[GfPoly], h: &GfMatrix, y: &GfVector,
) -> Result<GfVector, Error> {
    let t = g.degree().expect("validated Goppa polynomial");
    let n = f.order();
    debug_assert_eq!(h.rows(), f.m() as usize * t, "check matrix height mismatch");
    debug_assert_eq!(h.cols(), n, "check matrix width mismatch");
    ensure!(y.len() == n, Error::InvalidCiphertext);

    // s(x) = sum over set positions of 1/(x - L_j) mod g, via the check matrix.
    let s = syndrome_poly(f, t, &h.mul_vec_right(y));
    if s.is_zero() {
        return Ok(GfVector::zero(n));
    }

    // T = s^{-1}; R = sqrt(T + x); halted Euclid gives a = b*R with
    // deg a <= t/2, deg b <= (t-1)/2; the error locator is a^2 + x*b^2.
    let t_poly = s.inv_mod(g, f).ok_or(Error::InvalidCiphertext)?;
    let tx = t_poly.add(&GfPoly::x_pow(1)).rem(g, f);
    let sigma = if tx.is_zero() {
        // T = x: the sole error sits at locator zero.
        GfPoly::x_pow(1)
    } else {
        let r = tx.sqrt_mod(sqrt_tab, f);
        let (a, b) = r.eea_halted(g, t / 2, f);
        let xb2 = b.square(f).shift_up(1);
        a.square(f).add(&xb2)
    };

    // Exhaustive root search over the locator enumeration.
    let mut e = GfVector::zero(n);
    let mut roots = 0usize;
    for j in 0..n {
        #[allow(clippy::cast_possible_truncation)] // locator < 2^16
        let loc = j as Elt;
        if sigma.eval(loc, f) == 0 {
            e.set(j, true);
            roots += 1;
        }
    }
    // A genuine error locator splits completely over the support.
    ensure!(Some(roots) == sigma.degree(), Error::InvalidCiphertext);
    Ok(e)
}
