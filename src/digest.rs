//! Digest selection and the mask-generation KDF.
//!
//! The hash primitives themselves are external (RustCrypto `digest` family);
//! this module is the single dispatch point from the parameter set's
//! [`DigestKind`] to a concrete implementation.

use crate::Error;
use blake2::{Blake2b512, Blake2s256};
use sha2::digest::consts::{U128, U32, U64};
use sha2::{Digest, Sha256, Sha512};
use sha3::{Keccak256, Keccak512};
use skein::{Skein1024, Skein256, Skein512};


/// Digest selector carried by a parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigestKind {
    /// BLAKE2s with 256-bit output.
    Blake256,
    /// BLAKE2b with 512-bit output.
    Blake512,
    /// Original Keccak, 256-bit output.
    Keccak256,
    /// Original Keccak, 512-bit output.
    Keccak512,
    /// SHA-256.
    Sha256,
    /// SHA-512.
    Sha512,
    /// Skein-256-256.
    Skein256,
    /// Skein-512-512.
    Skein512,
    /// Skein-1024-1024.
    Skein1024,
}


fn hash_all<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for p in parts {
        Digest::update(&mut hasher, p);
    }
    hasher.finalize().to_vec()
}


impl DigestKind {
    /// Output length in bytes.
    pub fn digest_size(self) -> usize {
        match self {
            Self::Blake256 | Self::Keccak256 | Self::Sha256 | Self::Skein256 => 32,
            Self::Blake512 | Self::Keccak512 | Self::Sha512 | Self::Skein512 => 64,
            Self::Skein1024 => 128,
        }
    }

    /// Hash the concatenation of `parts` (avoids a prior buffer copy, the
    /// same shape as hashing `a || b` with two update calls).
    pub(crate) fn hash(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            Self::Blake256 => hash_all::<Blake2s256>(parts),
            Self::Blake512 => hash_all::<Blake2b512>(parts),
            Self::Keccak256 => hash_all::<Keccak256>(parts),
            Self::Keccak512 => hash_all::<Keccak512>(parts),
            Self::Sha256 => hash_all::<Sha256>(parts),
            Self::Sha512 => hash_all::<Sha512>(parts),
            Self::Skein256 => hash_all::<Skein256<U32>>(parts),
            Self::Skein512 => hash_all::<Skein512<U64>>(parts),
            Self::Skein1024 => hash_all::<Skein1024<U128>>(parts),
        }
    }

    pub(crate) fn to_u32(self) -> u32 {
        match self {
            Self::Blake256 => 0,
            Self::Blake512 => 1,
            Self::Keccak256 => 2,
            Self::Keccak512 => 3,
            Self::Sha256 => 4,
            Self::Sha512 => 5,
            Self::Skein256 => 6,
            Self::Skein512 => 7,
            Self::Skein1024 => 8,
        }
    }

    pub(crate) fn try_from_u32(v: u32) -> Result<Self, Error> {
        Ok(match v {
            0 => Self::Blake256,
            1 => Self::Blake512,
            2 => Self::Keccak256,
            3 => Self::Keccak512,
            4 => Self::Sha256,
            5 => Self::Sha512,
            6 => Self::Skein256,
            7 => Self::Skein512,
            8 => Self::Skein1024,
            _ => return Err(Error::InvalidParameter("unrecognized digest kind")),
        })
    }
}


/// MGF1-style expansion: H(seed || 0_be32) || H(seed || 1_be32) || ...,
/// truncated to `len` bytes.
pub(crate) fn mgf1(kind: DigestKind, seed: &[u8], len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len + kind.digest_size());
    let mut counter: u32 = 0;
    while out.len() < len {
        out.extend_from_slice(&kind.hash(&[seed, &counter.to_be_bytes()]));
        counter += 1;
    }
    out.truncate(len);
    out
}
