//! Byte-oriented randomness facade over `rand_core` sources.
//!
//! Every randomized operation in the crate is generic over
//! [`CryptoRngCore`], so callers may pass any cryptographic RNG directly;
//! [`Prng`] is the concrete facade selected by a parameter set: the OS
//! entropy source, or a ChaCha20-based deterministic generator in the role
//! of a counter-mode DRBG (seedable, for reproducible key generation).

use crate::helpers::ensure;
use crate::Error;
use rand_chacha::ChaCha20Rng;
#[cfg(feature = "default-rng")]
use rand_core::OsRng;
use rand_core::{CryptoRng, RngCore, SeedableRng};


/// Randomness source selector carried by a parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrngKind {
    /// Operating-system entropy (`OsRng`); requires the `default-rng` feature.
    System,
    /// ChaCha20 counter-mode generator, seedable for deterministic key-gen.
    CtrDrbg,
}


impl PrngKind {
    pub(crate) fn to_u32(self) -> u32 {
        match self {
            Self::System => 0,
            Self::CtrDrbg => 1,
        }
    }

    pub(crate) fn try_from_u32(v: u32) -> Result<Self, Error> {
        match v {
            0 => Ok(Self::System),
            1 => Ok(Self::CtrDrbg),
            _ => Err(Error::InvalidParameter("unrecognized prng kind")),
        }
    }
}


enum Source {
    #[cfg(feature = "default-rng")]
    System(OsRng),
    Drbg(Box<ChaCha20Rng>),
}


/// The byte-oriented RNG facade.
pub struct Prng {
    source: Source,
}


impl Prng {
    /// Construct the source a parameter set names, seeding the DRBG variant
    /// from the operating system.
    #[cfg(feature = "default-rng")]
    pub fn new(kind: PrngKind) -> Result<Self, Error> {
        match kind {
            PrngKind::System => Ok(Self { source: Source::System(OsRng) }),
            PrngKind::CtrDrbg => {
                let mut seed = [0u8; 32];
                OsRng.try_fill_bytes(&mut seed).map_err(|_| Error::Io("entropy source failed"))?;
                Ok(Self::from_seed(&seed))
            }
        }
    }

    /// Deterministic DRBG from an explicit 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self { source: Source::Drbg(Box::new(ChaCha20Rng::from_seed(*seed))) }
    }

    /// Deterministic DRBG from seed material of any length (cycled into 32
    /// bytes); convenience for test vectors with short seeds.
    pub fn from_seed_material(material: &[u8]) -> Result<Self, Error> {
        ensure!(!material.is_empty(), Error::InvalidParameter("empty prng seed"));
        let mut seed = [0u8; 32];
        for (i, b) in seed.iter_mut().enumerate() {
            *b = material[i % material.len()];
        }
        Ok(Self::from_seed(&seed))
    }

    /// Fill `out` with random bytes.
    pub fn get_bytes(&mut self, out: &mut [u8]) {
        self.fill_bytes(out);
    }

    /// Uniform value in [0, max), by rejection over ceil(log2 max) bits.
    pub fn next_range(&mut self, max: u64) -> u64 {
        rand_range(self, max)
    }
}


impl RngCore for Prng {
    fn next_u32(&mut self) -> u32 {
        match &mut self.source {
            #[cfg(feature = "default-rng")]
            Source::System(rng) => rng.next_u32(),
            Source::Drbg(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match &mut self.source {
            #[cfg(feature = "default-rng")]
            Source::System(rng) => rng.next_u64(),
            Source::Drbg(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match &mut self.source {
            #[cfg(feature = "default-rng")]
            Source::System(rng) => rng.fill_bytes(dest),
            Source::Drbg(rng) => rng.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        match &mut self.source {
            #[cfg(feature = "default-rng")]
            Source::System(rng) => rng.try_fill_bytes(dest),
            Source::Drbg(rng) => rng.try_fill_bytes(dest),
        }
    }
}


impl CryptoRng for Prng {}


/// Uniform value in [0, max) from any RNG, rejecting draws outside the
/// smallest covering power of two. `max` must be nonzero.
pub(crate) fn rand_range(rng: &mut impl RngCore, max: u64) -> u64 {
    debug_assert!(max > 0, "empty range");
    if max <= 1 {
        return 0;
    }
    let bits = 64 - (max - 1).leading_zeros();
    let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
    loop {
        let v = rng.next_u64() & mask;
        if v < max {
            return v;
        }
    }
}
