#![deny(missing_docs, unsafe_code)]
#![warn(clippy::pedantic)]
#![doc = include_str!("../README.md")]

// Implements a CCA2-secure McEliece cryptosystem over binary irreducible
// Goppa codes, with the Fujisaki, Kobara-Imai and Pointcheval conversions as
// interchangeable wrappers around the one-way trapdoor primitive.
//
// Functionality map
//
// GF(2^m) field arithmetic                 --> field.rs
// GF(2)[x] (field polynomial selection)    --> bitpoly.rs
// GF(2^m)[x] (Goppa polynomial, EEA, sqrt) --> poly.rs
// Packed GF(2) matrices and vectors        --> matrix.rs
// Permutations                             --> perm.rs
// Canonical H + Patterson decoding         --> goppa.rs
// Constant-weight <-> bytes bijection      --> cw.rs
// Raw trapdoor encrypt/decrypt             --> pke.rs
// The three CCA2 conversions               --> engines.rs
// Digest selection and MGF1                --> digest.rs
// Randomness facade                        --> prng.rs
// Parameter sets, catalog, wire format     --> params.rs
// Keys, generation pipeline, wire formats  --> keys.rs
// One-time signatures                      --> sign.rs

/// The `rand_core` types are re-exported so that users of this crate do not
/// have to worry about using the exact correct version of `rand_core`.
pub use rand_core::{CryptoRng, CryptoRngCore, Error as RngError, RngCore};

mod bitpoly;
mod cw;
mod engines;
mod field;
mod goppa;
mod helpers;
mod matrix;
mod perm;
mod pke;
mod poly;

pub mod digest;
pub mod keys;
pub mod params;
pub mod prng;
pub mod sign;
pub mod traits;

pub use crate::digest::DigestKind;
pub use crate::keys::{KeyPair, PrivateKey, PublicKey};
pub use crate::params::{Engine, ParameterSet};
pub use crate::prng::{Prng, PrngKind};
pub use crate::sign::Signer;


/// Stable default domain separator for the Kobara-Imai conversion. Override
/// at construction time with [`McEliece::with_info`] when a protocol defines
/// its own.
pub const KOBARA_IMAI_INFO: &[u8] = b"a predetermined public constant";


/// Everything that can go wrong, by kind. Decryption-path failures collapse
/// to [`Error::InvalidCiphertext`] with no distinguishing detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A parameter set field is out of range or unrecognized.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// Key material is malformed or disagrees with the parameters in use.
    #[error("invalid key: {0}")]
    InvalidKey(&'static str),
    /// Decryption failed; deliberately carries no sub-reason.
    #[error("invalid ciphertext")]
    InvalidCiphertext,
    /// An input exceeds the capacity the parameters allow.
    #[error("input too long: {0}")]
    InputTooLong(&'static str),
    /// A serialization read or write failed.
    #[error("serialization failure: {0}")]
    Io(&'static str),
    /// An operation ran before the object was initialized.
    #[error("not initialized: {0}")]
    Uninitialized(&'static str),
}


/// The cipher object: a parameter set plus the Kobara-Imai domain separator.
///
/// All key and parameter objects are immutable once built and safe to share
/// across threads; the only mutable state in an operation is the caller's
/// RNG.
///
/// ```rust,no_run
/// use mceliece::{McEliece, ParameterSet};
///
/// # fn main() -> Result<(), mceliece::Error> {
/// let cipher = McEliece::new(ParameterSet::fm11t40());
/// let keys = cipher.generate_keypair()?;
/// let ct = cipher.encrypt(keys.public(), b"attack at dawn")?;
/// assert_eq!(cipher.decrypt(keys.private(), &ct)?, b"attack at dawn");
/// # Ok(()) }
/// ```
pub struct McEliece {
    params: ParameterSet,
    info: Vec<u8>,
}


impl McEliece {
    /// A cipher for the given parameter set with the default domain
    /// separator.
    pub fn new(params: ParameterSet) -> Self {
        Self { params, info: KOBARA_IMAI_INFO.to_vec() }
    }

    /// A cipher with an explicit Kobara-Imai domain separator (ignored by
    /// the other engines).
    pub fn with_info(params: ParameterSet, info: &[u8]) -> Self {
        Self { params, info: info.to_vec() }
    }

    /// The parameter set this cipher operates under.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Generate a key pair with a caller-provided RNG (deterministic for a
    /// deterministic RNG).
    pub fn generate_keypair_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<KeyPair, Error> {
        KeyPair::generate(&self.params, rng)
    }

    /// Generate a key pair using the parameter set's randomness source.
    #[cfg(feature = "default-rng")]
    pub fn generate_keypair(&self) -> Result<KeyPair, Error> {
        let mut rng = Prng::new(self.params.prng())?;
        self.generate_keypair_with_rng(&mut rng)
    }

    /// Encrypt up to k/8 bytes under the selected CCA2 conversion.
    pub fn encrypt_with_rng(
        &self, pk: &PublicKey, msg: &[u8], rng: &mut impl CryptoRngCore,
    ) -> Result<Vec<u8>, Error> {
        engines::encrypt(&self.params, &self.info, pk, msg, rng)
    }

    /// Encrypt using the parameter set's randomness source.
    #[cfg(feature = "default-rng")]
    pub fn encrypt(&self, pk: &PublicKey, msg: &[u8]) -> Result<Vec<u8>, Error> {
        let mut rng = Prng::new(self.params.prng())?;
        self.encrypt_with_rng(pk, msg, &mut rng)
    }

    /// Decrypt a ciphertext produced by the same parameter set and engine.
    pub fn decrypt(&self, sk: &PrivateKey, ct: &[u8]) -> Result<Vec<u8>, Error> {
        engines::decrypt(&self.params, &self.info, sk, ct)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;

    #[test]
    fn smoke_test() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        for engine in [Engine::Fujisaki, Engine::KobaraImai, Engine::Pointcheval] {
            let params = ParameterSet::custom(
                9,
                16,
                engine,
                DigestKind::Sha256,
                PrngKind::CtrDrbg,
            )
            .unwrap();
            let cipher = McEliece::new(params);
            let keys = cipher.generate_keypair_with_rng(&mut rng).unwrap();
            for _ in 0..5 {
                let ct = cipher.encrypt_with_rng(keys.public(), b"smoke", &mut rng).unwrap();
                assert_eq!(cipher.decrypt(keys.private(), &ct).unwrap(), b"smoke");
            }
        }
    }

    #[test]
    fn ciphertexts_are_randomized() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(124);
        let params = ParameterSet::custom(
            9,
            16,
            Engine::Fujisaki,
            DigestKind::Sha256,
            PrngKind::CtrDrbg,
        )
        .unwrap();
        let cipher = McEliece::new(params);
        let keys = cipher.generate_keypair_with_rng(&mut rng).unwrap();
        let a = cipher.encrypt_with_rng(keys.public(), b"same message", &mut rng).unwrap();
        let b = cipher.encrypt_with_rng(keys.public(), b"same message", &mut rng).unwrap();
        assert_ne!(a, b);
    }
}
