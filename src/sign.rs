//! Hash-then-encrypt one-time signatures.
//!
//! Signing encrypts the message digest through the selected CCA2 conversion;
//! verification decrypts the signature and compares digests in constant
//! time. The verifier therefore holds the private key: this is a one-time
//! scheme between parties sharing the key pair, not a public verification
//! scheme. A key pair used for signing must not also serve encryption, and
//! should sign a single message.

use crate::engines;
use crate::helpers::ensure;
use crate::keys::KeyPair;
use crate::params::ParameterSet;
use crate::Error;
use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;


/// One-time signer/verifier around a key pair.
pub struct Signer {
    params: ParameterSet,
    info: Vec<u8>,
    keys: Option<KeyPair>,
}


impl Signer {
    /// A signer for the given parameter set, not yet holding a key pair.
    pub fn new(params: ParameterSet) -> Self {
        Self { params, info: crate::KOBARA_IMAI_INFO.to_vec(), keys: None }
    }

    /// Override the Kobara-Imai domain separator (only relevant when the
    /// parameter set selects that engine).
    pub fn with_info(params: ParameterSet, info: &[u8]) -> Self {
        Self { params, info: info.to_vec(), keys: None }
    }

    /// Install the key pair used for signing and verification.
    pub fn initialize(&mut self, keys: KeyPair) {
        self.keys = Some(keys);
    }

    fn keys(&self) -> Result<&KeyPair, Error> {
        self.keys.as_ref().ok_or(Error::Uninitialized("signer holds no key pair"))
    }

    /// Sign `msg` with a caller-provided RNG.
    pub fn sign_with_rng(
        &self, msg: &[u8], rng: &mut impl CryptoRngCore,
    ) -> Result<Vec<u8>, Error> {
        let keys = self.keys()?;
        let digest = self.params.digest().hash(&[msg]);
        ensure!(
            digest.len() <= keys.public().k() / 8,
            Error::InputTooLong("digest exceeds the code dimension")
        );
        engines::encrypt(&self.params, &self.info, keys.public(), &digest, rng)
    }

    /// Sign `msg` using the parameter set's randomness source.
    #[cfg(feature = "default-rng")]
    pub fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, Error> {
        let mut rng = crate::prng::Prng::new(self.params.prng())?;
        self.sign_with_rng(msg, &mut rng)
    }

    /// Sign the `length`-byte slice of `data` starting at `offset`.
    pub fn sign_range_with_rng(
        &self, data: &[u8], offset: usize, length: usize, rng: &mut impl CryptoRngCore,
    ) -> Result<Vec<u8>, Error> {
        ensure!(
            offset <= data.len() && length <= data.len() - offset,
            Error::InvalidParameter("range exceeds the input")
        );
        self.sign_with_rng(&data[offset..offset + length], rng)
    }

    /// Check `sig` against `msg`. Tampered or foreign signatures yield
    /// `Ok(false)`; only key/state problems surface as errors.
    pub fn verify(&self, msg: &[u8], sig: &[u8]) -> Result<bool, Error> {
        let keys = self.keys()?;
        let digest = self.params.digest().hash(&[msg]);
        match engines::decrypt(&self.params, &self.info, keys.private(), sig) {
            Ok(recovered) => Ok(bool::from(recovered.ct_eq(&digest))),
            Err(Error::InvalidCiphertext) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
