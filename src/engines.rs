//! The three CCA2 conversions over the trapdoor primitive.
//!
//! Each engine derives the weight-t error vector from a hash through the
//! constant-weight encoding, so decryption can re-derive and re-check it.
//! Every decryption failure collapses to `InvalidCiphertext` with no
//! distinguishing detail.

use crate::cw;
use crate::digest::mgf1;
use crate::helpers::{ensure, xor_into};
use crate::keys::{PrivateKey, PublicKey};
use crate::matrix::GfVector;
use crate::params::{Engine, ParameterSet};
use crate::pke;
use crate::Error;
use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;


fn n8(n: usize) -> usize {
    (n + 7) / 8
}


/// Engine dispatch for encryption. Enforces the shared plaintext bound
/// (k/8 bytes) and the key/parameter correspondence.
pub(crate) fn encrypt(
    params: &ParameterSet, info: &[u8], pk: &PublicKey, msg: &[u8],
    rng: &mut impl CryptoRngCore,
) -> Result<Vec<u8>, Error> {
    ensure!(
        pk.n() == params.n() && pk.t() == usize::from(params.t()),
        Error::InvalidKey("public key dimensions disagree with parameters")
    );
    ensure!(msg.len() <= pk.k() / 8, Error::InputTooLong("plaintext exceeds k/8 bytes"));
    match params.engine() {
        Engine::Fujisaki => fujisaki_encrypt(params, pk, msg, rng),
        Engine::KobaraImai => kobara_imai_encrypt(params, info, pk, msg, rng),
        Engine::Pointcheval => pointcheval_encrypt(params, pk, msg, rng),
    }
}


/// Engine dispatch for decryption.
pub(crate) fn decrypt(
    params: &ParameterSet, info: &[u8], sk: &PrivateKey, ct: &[u8],
) -> Result<Vec<u8>, Error> {
    ensure!(
        sk.n() == params.n() && sk.t() == usize::from(params.t()),
        Error::InvalidKey("private key dimensions disagree with parameters")
    );
    match params.engine() {
        Engine::Fujisaki => fujisaki_decrypt(params, sk, ct),
        Engine::KobaraImai => kobara_imai_decrypt(params, info, sk, ct),
        Engine::Pointcheval => pointcheval_decrypt(params, sk, ct),
    }
}


// Fujisaki-Okamoto: z binds (r, m) through the hash; c2 is the MGF stream
// under r.

fn fujisaki_encrypt(
    params: &ParameterSet, pk: &PublicKey, msg: &[u8], rng: &mut impl CryptoRngCore,
) -> Result<Vec<u8>, Error> {
    let r = GfVector::random(pk.k(), rng);
    let rb = r.to_bytes();
    let z = cw::encode(pk.n(), pk.t(), &params.digest().hash(&[rb.as_slice(), msg]));

    let mut out = pke::encrypt_raw(pk, &r, &z)?.to_bytes();
    let mut c2 = mgf1(params.digest(), &rb, msg.len());
    xor_into(&mut c2, msg);
    out.extend_from_slice(&c2);
    Ok(out)
}


fn fujisaki_decrypt(params: &ParameterSet, sk: &PrivateKey, ct: &[u8]) -> Result<Vec<u8>, Error> {
    let head = n8(sk.n());
    ensure!(ct.len() >= head, Error::InvalidCiphertext);
    let c1 = GfVector::from_bytes(&ct[..head], sk.n()).map_err(|_| Error::InvalidCiphertext)?;
    let c2 = &ct[head..];

    let (r, z) = pke::decrypt_raw(sk, &c1)?;
    let rb = r.to_bytes();
    let mut msg = mgf1(params.digest(), &rb, c2.len());
    xor_into(&mut msg, c2);

    let z_check = cw::encode(sk.n(), sk.t(), &params.digest().hash(&[rb.as_slice(), &msg]));
    ensure!(
        bool::from(z_check.to_bytes().ct_eq(&z.to_bytes())),
        Error::InvalidCiphertext
    );
    Ok(msg)
}


// Pointcheval: the primitive hides a fresh random vector r'; z binds (m, r)
// and both recoverable parts ride the MGF stream.

fn pointcheval_encrypt(
    params: &ParameterSet, pk: &PublicKey, msg: &[u8], rng: &mut impl CryptoRngCore,
) -> Result<Vec<u8>, Error> {
    let k8 = pk.k() / 8;
    let mut r1 = vec![0u8; k8];
    rng.fill_bytes(&mut r1);
    let r2 = GfVector::random(pk.k(), rng);

    let z = cw::encode(pk.n(), pk.t(), &params.digest().hash(&[msg, r1.as_slice()]));
    let mut out = pke::encrypt_raw(pk, &r2, &z)?.to_bytes();

    let mut c2 = mgf1(params.digest(), &r2.to_bytes(), msg.len() + k8);
    xor_into(&mut c2[..msg.len()], msg);
    xor_into(&mut c2[msg.len()..], &r1);
    out.extend_from_slice(&c2);
    Ok(out)
}


fn pointcheval_decrypt(
    params: &ParameterSet, sk: &PrivateKey, ct: &[u8],
) -> Result<Vec<u8>, Error> {
    let head = n8(sk.n());
    let k8 = sk.k() / 8;
    ensure!(ct.len() >= head + k8, Error::InvalidCiphertext);
    let c1 = GfVector::from_bytes(&ct[..head], sk.n()).map_err(|_| Error::InvalidCiphertext)?;
    let c2 = &ct[head..];

    let (r2, z) = pke::decrypt_raw(sk, &c1)?;
    let mut mr = mgf1(params.digest(), &r2.to_bytes(), c2.len());
    xor_into(&mut mr, c2);
    let (msg, r1) = mr.split_at(mr.len() - k8);

    let z_check = cw::encode(sk.n(), sk.t(), &params.digest().hash(&[msg, r1]));
    ensure!(
        bool::from(z_check.to_bytes().ct_eq(&z.to_bytes())),
        Error::InvalidCiphertext
    );
    Ok(msg.to_vec())
}


// Kobara-Imai: the whole padded message rides inside the primitive's inputs
// (c4 through the message vector, c5 through the error vector), with only
// the overflow c6 in the clear. Most compact of the three.

struct KiLengths {
    c2l: usize,
    c4l: usize,
    c5l: usize,
    /// Message-capacity floor below which zero-padding is applied.
    threshold: isize,
}

fn ki_lengths(params: &ParameterSet, info: &[u8], n: usize, t: usize, k: usize) -> KiLengths {
    let c2l = params.digest().digest_size();
    let c4l = k / 8;
    let c5l = cw::prefix_len(n, t);
    let threshold = c4l as isize + c5l as isize - c2l as isize - info.len() as isize;
    KiLengths { c2l, c4l, c5l, threshold }
}


fn kobara_imai_encrypt(
    params: &ParameterSet, info: &[u8], pk: &PublicKey, msg: &[u8],
    rng: &mut impl CryptoRngCore,
) -> Result<Vec<u8>, Error> {
    let len = ki_lengths(params, info, pk.n(), pk.t(), pk.k());
    let body = usize::try_from((msg.len() as isize).max(len.threshold)).expect("non-negative");
    let c1l = body + info.len();
    let c6l = (c1l + len.c2l) - (len.c4l + len.c5l);

    let mut mconst = vec![0u8; c1l];
    mconst[..msg.len()].copy_from_slice(msg);
    mconst[c1l - info.len()..].copy_from_slice(info);

    let mut r = vec![0u8; len.c2l];
    rng.fill_bytes(&mut r);
    let mut c1 = mgf1(params.digest(), &r, c1l);
    xor_into(&mut c1, &mconst);
    let mut c2 = params.digest().hash(&[c1.as_slice()]);
    xor_into(&mut c2, &r);

    // Split c2 || c1 into (c6, c5, c4).
    let mut buf = c2;
    buf.extend_from_slice(&c1);
    let c6 = &buf[..c6l];
    let c5 = &buf[c6l..c6l + len.c5l];
    let c4 = &buf[c6l + len.c5l..];
    debug_assert_eq!(c4.len(), len.c4l);

    let z = cw::encode(pk.n(), pk.t(), c5);
    let mut c4_padded = c4.to_vec();
    c4_padded.resize(n8(pk.k()), 0);
    let m_vec = GfVector::from_bytes(&c4_padded, pk.k()).expect("padded to the exact length");

    let mut out = c6.to_vec();
    out.extend_from_slice(&pke::encrypt_raw(pk, &m_vec, &z)?.to_bytes());
    Ok(out)
}


fn kobara_imai_decrypt(
    params: &ParameterSet, info: &[u8], sk: &PrivateKey, ct: &[u8],
) -> Result<Vec<u8>, Error> {
    let len = ki_lengths(params, info, sk.n(), sk.t(), sk.k());
    let head = n8(sk.n());
    ensure!(ct.len() >= head, Error::InvalidCiphertext);
    let c6l = ct.len() - head;
    let c6 = &ct[..c6l];
    let enc = GfVector::from_bytes(&ct[c6l..], sk.n()).map_err(|_| Error::InvalidCiphertext)?;

    let (m_vec, z) = pke::decrypt_raw(sk, &enc)?;
    let c4_full = m_vec.to_bytes();
    // Honest encryption never sets bits past the whole-byte message part.
    ensure!(c4_full[len.c4l..].iter().all(|&b| b == 0), Error::InvalidCiphertext);
    let c5 = cw::decode(sk.n(), sk.t(), &z)?;

    // Reassemble c6 || c5 || c4 and split back into (c2, c1).
    let mut buf = Vec::with_capacity(c6l + len.c5l + len.c4l);
    buf.extend_from_slice(c6);
    buf.extend_from_slice(&c5);
    buf.extend_from_slice(&c4_full[..len.c4l]);
    ensure!(buf.len() >= len.c2l + info.len(), Error::InvalidCiphertext);
    let (c2, c1) = buf.split_at(len.c2l);

    let mut r = params.digest().hash(&[c1]);
    xor_into(&mut r, c2);
    let mut mconst = mgf1(params.digest(), &r, c1.len());
    xor_into(&mut mconst, c1);

    let body_len = c1.len() - info.len();
    ensure!(
        bool::from(mconst[body_len..].ct_eq(info)),
        Error::InvalidCiphertext
    );
    let body = &mconst[..body_len];

    // Above the padding threshold the body is the exact message; at the
    // threshold the zero pad is stripped (a message that itself ends in zero
    // bytes loses them here, inherited behavior of this padding scheme).
    if body_len as isize > len.threshold {
        Ok(body.to_vec())
    } else {
        let end = body.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
        Ok(body[..end].to_vec())
    }
}
