//! Key material: the short systematic generator (public), the Goppa
//! trapdoor structure (private), and the generation pipeline.

use crate::field::Gf2m;
use crate::goppa;
use crate::helpers::{ensure, read_bytes, read_u32_le};
use crate::matrix::GfMatrix;
use crate::params::ParameterSet;
use crate::perm::Permutation;
use crate::poly::GfPoly;
use crate::traits::SerDes;
use crate::Error;
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};


/// The public encryption key: code sizes plus the k x mt short block of the
/// systematic generator matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) n: usize,
    pub(crate) t: usize,
    pub(crate) g_short: GfMatrix,
}


impl PublicKey {
    /// Code length n = 2^m.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Error weight t.
    pub fn t(&self) -> usize {
        self.t
    }

    /// Code dimension k (the plaintext bit capacity of the primitive).
    pub fn k(&self) -> usize {
        self.g_short.rows()
    }
}


/// The private key: everything needed to run syndrome decoding. Zeroized on
/// drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    pub(crate) n: usize,
    pub(crate) k: usize,
    pub(crate) field: Gf2m,
    pub(crate) goppa: GfPoly,
    pub(crate) perm: Permutation,
    pub(crate) h: GfMatrix,
    pub(crate) sqrt_tab: Vec<GfPoly>,
}


impl PrivateKey {
    /// Code length n = 2^m.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Code dimension k.
    pub fn k(&self) -> usize {
        self.k
    }

    pub(crate) fn t(&self) -> usize {
        self.goppa.degree().expect("validated Goppa polynomial")
    }
}


/// A generated public/private pair.
pub struct KeyPair {
    public: PublicKey,
    private: PrivateKey,
}


impl KeyPair {
    /// Run the full generation pipeline for `params`.
    pub fn generate(params: &ParameterSet, rng: &mut impl CryptoRngCore) -> Result<Self, Error> {
        generate(params, rng)
    }

    /// The public half.
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// The private half.
    pub fn private(&self) -> &PrivateKey {
        &self.private
    }

    /// Assemble from previously deserialized halves; dimensions must agree.
    pub fn from_parts(public: PublicKey, private: PrivateKey) -> Result<Self, Error> {
        ensure!(
            public.n == private.n && public.k() == private.k && public.t == private.t(),
            Error::InvalidKey("public and private halves disagree")
        );
        Ok(Self { public, private })
    }
}


/// Goppa polynomial draw, check matrix, hiding permutation, systematic
/// reduction; a rank-deficient reduction restarts from a fresh polynomial.
fn generate(params: &ParameterSet, rng: &mut impl CryptoRngCore) -> Result<KeyPair, Error> {
    let field = Gf2m::new(u32::from(params.m()), params.field_poly())?;
    let n = field.order();
    let t = usize::from(params.t());
    let m = usize::from(params.m());

    const MAX_ATTEMPTS: u32 = 100;
    for attempt in 0..MAX_ATTEMPTS {
        let goppa = GfPoly::random_monic_irreducible(t, &field, rng);
        let sqrt_tab = GfPoly::sqrt_table(&goppa, &field)?;
        let h = goppa::check_matrix(&field, &goppa)?;

        // Hide the support behind a uniform permutation, then reduce; the
        // swap permutation from elimination composes on the inside.
        let hide = Permutation::random(n, rng);
        let permuted = h.permute_cols(&hide);
        let Some((h_short, swaps)) = permuted.systematic_reduce() else {
            tracing::debug!(attempt, "parity-check matrix was rank deficient, redrawing");
            continue;
        };
        let perm = if swaps.is_identity() { hide } else { hide.compose(&swaps) };

        let g_short = h_short.transpose();
        let k = n - m * t;
        debug_assert_eq!(g_short.rows(), k, "systematic reduction changed the dimension");
        debug_assert_eq!(g_short.cols(), m * t);

        return Ok(KeyPair {
            public: PublicKey { n, t, g_short },
            private: PrivateKey { n, k, field, goppa, perm, h, sqrt_tab },
        });
    }
    Err(Error::InvalidParameter("no systematic form after maximum key-generation attempts"))
}


impl SerDes for PublicKey {
    /// n(i32 LE) || t(i32 LE) || matrix bytes of the short generator.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&u32::try_from(self.n).expect("n fits u32").to_le_bytes());
        out.extend_from_slice(&u32::try_from(self.t).expect("t fits u32").to_le_bytes());
        out.extend_from_slice(&self.g_short.to_bytes());
        out
    }

    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut off = 0;
        let n = read_u32_le(bytes, &mut off)? as usize;
        let t = read_u32_le(bytes, &mut off)? as usize;
        let g_short = GfMatrix::from_bytes(&bytes[off..])?;

        ensure!(n.is_power_of_two() && n >= 2, Error::InvalidKey("code length is not a power of two"));
        let m = n.trailing_zeros() as usize;
        ensure!(m <= 16, Error::InvalidKey("code length out of range"));
        ensure!(t >= 1 && m * t < n, Error::InvalidKey("error weight out of range"));
        ensure!(
            g_short.rows() == n - m * t && g_short.cols() == m * t,
            Error::InvalidKey("generator dimensions disagree with parameters")
        );
        Ok(Self { n, t, g_short })
    }
}


impl SerDes for PrivateKey {
    /// n || k || field_poly(4) || len/bytes of: Goppa poly, permutation,
    /// check matrix; then the square-root table prefixed with its count.
    /// All integers u32 LE.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let push_u32 =
            |out: &mut Vec<u8>, v: usize| out.extend_from_slice(&u32::try_from(v).expect("size fits u32").to_le_bytes());

        push_u32(&mut out, self.n);
        push_u32(&mut out, self.k);
        out.extend_from_slice(&self.field.poly().to_le_bytes());

        let gp = self.goppa.to_bytes(&self.field);
        push_u32(&mut out, gp.len());
        out.extend_from_slice(&gp);

        push_u32(&mut out, self.perm.indices().len() * 4);
        for &i in self.perm.indices() {
            out.extend_from_slice(&i.to_le_bytes());
        }

        let h = self.h.to_bytes();
        push_u32(&mut out, h.len());
        out.extend_from_slice(&h);

        push_u32(&mut out, self.sqrt_tab.len());
        for q in &self.sqrt_tab {
            let qb = q.to_bytes(&self.field);
            push_u32(&mut out, qb.len());
            out.extend_from_slice(&qb);
        }
        out
    }

    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut off = 0;
        let n = read_u32_le(bytes, &mut off)? as usize;
        let k = read_u32_le(bytes, &mut off)? as usize;
        let field_poly = read_u32_le(bytes, &mut off)?;

        ensure!(n.is_power_of_two() && n >= 2, Error::InvalidKey("code length is not a power of two"));
        let m = n.trailing_zeros();
        ensure!(m <= 16, Error::InvalidKey("code length out of range"));
        let field = Gf2m::new(m, field_poly)?;
        ensure!(field.order() == n, Error::InvalidKey("field polynomial disagrees with code length"));

        let gp_len = read_u32_le(bytes, &mut off)? as usize;
        let goppa = GfPoly::from_bytes(read_bytes(bytes, &mut off, gp_len)?, &field)?;
        let t = goppa.degree().ok_or(Error::InvalidKey("empty Goppa polynomial"))?;
        ensure!(t >= 1, Error::InvalidKey("constant Goppa polynomial"));
        ensure!(
            k + m as usize * t == n,
            Error::InvalidKey("dimension disagrees with parameters")
        );

        let p_len = read_u32_le(bytes, &mut off)? as usize;
        ensure!(p_len == 4 * n, Error::InvalidKey("permutation length mismatch"));
        let p_bytes = read_bytes(bytes, &mut off, p_len)?;
        let indices: Vec<u32> = p_bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes(c.try_into().expect("4-byte chunk")))
            .collect();
        let perm = Permutation::try_from_indices(indices)?;

        let h_len = read_u32_le(bytes, &mut off)? as usize;
        let h = GfMatrix::from_bytes(read_bytes(bytes, &mut off, h_len)?)?;
        ensure!(
            h.rows() == m as usize * t && h.cols() == n,
            Error::InvalidKey("check matrix dimensions disagree with parameters")
        );

        let q_count = read_u32_le(bytes, &mut off)? as usize;
        ensure!(q_count == t, Error::InvalidKey("square-root table size mismatch"));
        let mut sqrt_tab = Vec::with_capacity(q_count);
        for _ in 0..q_count {
            let q_len = read_u32_le(bytes, &mut off)? as usize;
            let q = GfPoly::from_bytes(read_bytes(bytes, &mut off, q_len)?, &field)?;
            ensure!(
                q.degree().map_or(true, |d| d < t),
                Error::InvalidKey("square-root entry degree out of range")
            );
            sqrt_tab.push(q);
        }
        ensure!(off == bytes.len(), Error::Io("trailing bytes after private key"));

        Ok(Self { n, k, field, goppa, perm, h, sqrt_tab })
    }
}
