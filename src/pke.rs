//! The one-way trapdoor primitive under every CCA2 conversion:
//! c = m*G xor z on the public side, Patterson decoding on the private side.
//!
//! The systematic generator is [G_short | I_k], so a raw ciphertext carries
//! the parity section in its first m*t bits and the message bits in its last
//! k bits, before the weight-t error is folded in.

use crate::goppa;
use crate::helpers::ensure;
use crate::keys::{PrivateKey, PublicKey};
use crate::matrix::GfVector;
use crate::Error;


/// Encrypt a k-bit message vector with an explicit weight-t error vector.
pub(crate) fn encrypt_raw(
    pk: &PublicKey, msg: &GfVector, err: &GfVector,
) -> Result<GfVector, Error> {
    ensure!(msg.len() == pk.k(), Error::InvalidKey("message vector length is not k"));
    ensure!(err.len() == pk.n(), Error::InvalidKey("error vector length is not n"));
    debug_assert_eq!(err.weight(), pk.t(), "error vector weight is not t");

    let parity = pk.g_short.mul_vec_left(msg);
    let mut c = GfVector::concat(&parity, msg);
    c.xor_assign(err);
    Ok(c)
}


/// Recover the message vector and the error vector from a raw ciphertext.
/// Every failure mode collapses to `InvalidCiphertext`.
pub(crate) fn decrypt_raw(
    sk: &PrivateKey, ct: &GfVector,
) -> Result<(GfVector, GfVector), Error> {
    ensure!(ct.len() == sk.n, Error::InvalidCiphertext);
    let mt = sk.n - sk.k;

    // Undo the support permutation, decode in canonical coordinates, and
    // carry the error pattern back.
    let y = sk.perm.inverse().apply_vec(ct);
    let err_canonical = goppa::decode(&sk.field, &sk.goppa, &sk.sqrt_tab, &sk.h, &y)?;
    let err = sk.perm.apply_vec(&err_canonical);
    ensure!(err.weight() == sk.t(), Error::InvalidCiphertext);

    let mut corrected = ct.clone();
    corrected.xor_assign(&err);

    // The stripped word must be an exact codeword of the permuted code.
    let mut residue = y.clone();
    residue.xor_assign(&err_canonical);
    ensure!(sk.h.mul_vec_right(&residue).weight() == 0, Error::InvalidCiphertext);

    Ok((corrected.tail(mt), err))
}
