//! Parameter sets: code sizes, CCA2 engine, digest, randomness source, OID.

use crate::bitpoly;
use crate::digest::DigestKind;
use crate::helpers::{ensure, read_bytes, read_u32_le};
use crate::prng::PrngKind;
use crate::traits::SerDes;
use crate::Error;
use rand_core::CryptoRngCore;


/// The CCA2 conversion wrapped around the trapdoor primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engine {
    /// Fujisaki-Okamoto conversion.
    Fujisaki,
    /// Kobara-Imai conversion (the most compact ciphertexts).
    KobaraImai,
    /// Pointcheval conversion.
    Pointcheval,
}


impl Engine {
    pub(crate) fn to_u32(self) -> u32 {
        match self {
            Self::Fujisaki => 0,
            Self::KobaraImai => 1,
            Self::Pointcheval => 2,
        }
    }

    pub(crate) fn try_from_u32(v: u32) -> Result<Self, Error> {
        match v {
            0 => Ok(Self::Fujisaki),
            1 => Ok(Self::KobaraImai),
            2 => Ok(Self::Pointcheval),
            _ => Err(Error::InvalidParameter("unrecognized engine")),
        }
    }
}


/// A validated McEliece parameter set.
///
/// The code lives in GF(2^m): length n = 2^m, error weight t, dimension
/// k = n - m*t. Construction rejects anything outside those constraints, so
/// a held `ParameterSet` is always usable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterSet {
    m: u16,
    t: u16,
    field_poly: u32,
    engine: Engine,
    digest: DigestKind,
    prng: PrngKind,
    oid: [u8; 3],
}


fn validate(m: u16, t: u16, field_poly: u32) -> Result<(), Error> {
    ensure!((1..=16).contains(&m), Error::InvalidParameter("m out of range"));
    let n = 1usize << m;
    ensure!(t >= 1, Error::InvalidParameter("t must be positive"));
    ensure!(usize::from(t) < n, Error::InvalidParameter("t exceeds the code length"));
    ensure!(
        usize::from(m) * usize::from(t) < n,
        Error::InvalidParameter("code dimension would be empty")
    );
    ensure!(
        bitpoly::deg(u64::from(field_poly)) == i32::from(m),
        Error::InvalidParameter("field polynomial degree mismatch")
    );
    ensure!(
        bitpoly::is_irreducible(u64::from(field_poly)),
        Error::InvalidParameter("field polynomial is reducible")
    );
    Ok(())
}


impl ParameterSet {
    /// An ad-hoc parameter set (OID [1, 0, 0]) with the deterministic field
    /// polynomial for GF(2^m).
    pub fn custom(
        m: u16, t: u16, engine: Engine, digest: DigestKind, prng: PrngKind,
    ) -> Result<Self, Error> {
        ensure!((1..=16).contains(&m), Error::InvalidParameter("m out of range"));
        #[allow(clippy::cast_possible_truncation)] // degree <= 16, fits u32
        let field_poly = bitpoly::first_irreducible(u32::from(m)) as u32;
        Self::with_field_poly(m, t, field_poly, engine, digest, prng)
    }

    /// An ad-hoc parameter set with a uniformly random irreducible field
    /// polynomial. Keys depend on the polynomial, so serialize the parameter
    /// set alongside any key material generated under it.
    pub fn with_random_field_poly(
        m: u16, t: u16, engine: Engine, digest: DigestKind, prng: PrngKind,
        rng: &mut impl CryptoRngCore,
    ) -> Result<Self, Error> {
        ensure!((1..=16).contains(&m), Error::InvalidParameter("m out of range"));
        #[allow(clippy::cast_possible_truncation)] // degree <= 16, fits u32
        let field_poly = bitpoly::random_irreducible(u32::from(m), rng) as u32;
        Self::with_field_poly(m, t, field_poly, engine, digest, prng)
    }

    /// An ad-hoc parameter set with an explicit field polynomial.
    pub fn with_field_poly(
        m: u16, t: u16, field_poly: u32, engine: Engine, digest: DigestKind, prng: PrngKind,
    ) -> Result<Self, Error> {
        validate(m, t, field_poly)?;
        Ok(Self { m, t, field_poly, engine, digest, prng, oid: [1, 0, 0] })
    }

    fn catalog(m: u16, t: u16, oid: [u8; 3]) -> Self {
        let mut p = Self::custom(m, t, Engine::Fujisaki, DigestKind::Sha256, PrngKind::CtrDrbg)
            .expect("catalog parameters are valid");
        p.oid = oid;
        p
    }

    /// n = 2048, t = 40; claimed ~131-bit security (inherited, unverified).
    pub fn fm11t40() -> Self {
        Self::catalog(11, 40, [1, 1, 1])
    }

    /// n = 2048, t = 48; claimed ~133-bit security (inherited, unverified).
    pub fn fm11t48() -> Self {
        Self::catalog(11, 48, [1, 1, 2])
    }

    /// n = 4096, t = 41; claimed ~148-bit security (inherited, unverified).
    pub fn fm12t41() -> Self {
        Self::catalog(12, 41, [1, 2, 1])
    }

    /// n = 4096, t = 48.
    pub fn fm12t48() -> Self {
        Self::catalog(12, 48, [1, 2, 2])
    }

    /// n = 8192, t = 44; claimed ~190-bit security (inherited, unverified).
    pub fn fm13t44() -> Self {
        Self::catalog(13, 44, [1, 3, 1])
    }

    /// n = 16384, t = 24.
    pub fn fm14t24() -> Self {
        Self::catalog(14, 24, [1, 4, 1])
    }

    /// Names accepted by [`ParameterSet::by_name`].
    pub fn catalog_names() -> &'static [&'static str] {
        &["fm11t40", "fm11t48", "fm12t41", "fm12t48", "fm13t44", "fm14t24"]
    }

    /// Look up a named catalog entry.
    pub fn by_name(name: &str) -> Result<Self, Error> {
        match name {
            "fm11t40" => Ok(Self::fm11t40()),
            "fm11t48" => Ok(Self::fm11t48()),
            "fm12t41" => Ok(Self::fm12t41()),
            "fm12t48" => Ok(Self::fm12t48()),
            "fm13t44" => Ok(Self::fm13t44()),
            "fm14t24" => Ok(Self::fm14t24()),
            _ => Err(Error::InvalidParameter("unknown parameter set name")),
        }
    }

    /// Look up a catalog entry by its 3-byte OID.
    pub fn by_oid(oid: [u8; 3]) -> Result<Self, Error> {
        Self::catalog_names()
            .iter()
            .map(|name| Self::by_name(name).expect("catalog name"))
            .find(|p| p.oid == oid)
            .ok_or(Error::InvalidParameter("unknown parameter set oid"))
    }

    /// Replace the engine selection.
    #[must_use]
    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    /// Replace the digest selection.
    #[must_use]
    pub fn with_digest(mut self, digest: DigestKind) -> Self {
        self.digest = digest;
        self
    }

    /// Replace the randomness-source selection.
    #[must_use]
    pub fn with_prng(mut self, prng: PrngKind) -> Self {
        self.prng = prng;
        self
    }

    /// Field extension degree m.
    pub fn m(&self) -> u16 {
        self.m
    }

    /// Error weight / Goppa polynomial degree t.
    pub fn t(&self) -> u16 {
        self.t
    }

    /// Code length n = 2^m.
    pub fn n(&self) -> usize {
        1 << self.m
    }

    /// Code dimension k = n - m*t.
    pub fn k(&self) -> usize {
        self.n() - usize::from(self.m) * usize::from(self.t)
    }

    /// Field polynomial bit pattern.
    pub fn field_poly(&self) -> u32 {
        self.field_poly
    }

    /// Selected CCA2 engine.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Selected digest.
    pub fn digest(&self) -> DigestKind {
        self.digest
    }

    /// Selected randomness source.
    pub fn prng(&self) -> PrngKind {
        self.prng
    }

    /// Object identifier ([1, family, index] for catalog entries).
    pub fn oid(&self) -> [u8; 3] {
        self.oid
    }
}


impl SerDes for ParameterSet {
    /// engine || digest || prng || m || t || field_poly (u32 LE each) || oid.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(27);
        out.extend_from_slice(&self.engine.to_u32().to_le_bytes());
        out.extend_from_slice(&self.digest.to_u32().to_le_bytes());
        out.extend_from_slice(&self.prng.to_u32().to_le_bytes());
        out.extend_from_slice(&u32::from(self.m).to_le_bytes());
        out.extend_from_slice(&u32::from(self.t).to_le_bytes());
        out.extend_from_slice(&self.field_poly.to_le_bytes());
        out.extend_from_slice(&self.oid);
        out
    }

    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut off = 0;
        let engine = Engine::try_from_u32(read_u32_le(bytes, &mut off)?)?;
        let digest = DigestKind::try_from_u32(read_u32_le(bytes, &mut off)?)?;
        let prng = PrngKind::try_from_u32(read_u32_le(bytes, &mut off)?)?;
        let m = read_u32_le(bytes, &mut off)?;
        let t = read_u32_le(bytes, &mut off)?;
        let field_poly = read_u32_le(bytes, &mut off)?;
        let oid: [u8; 3] = read_bytes(bytes, &mut off, 3)?.try_into().expect("3-byte slice");
        ensure!(off == bytes.len(), Error::Io("trailing bytes after parameter set"));

        let m = u16::try_from(m).map_err(|_| Error::InvalidParameter("m out of range"))?;
        let t = u16::try_from(t).map_err(|_| Error::InvalidParameter("t out of range"))?;
        validate(m, t, field_poly)?;
        ensure!(oid[0] == 1, Error::InvalidParameter("malformed oid"));
        Ok(Self { m, t, field_poly, engine, digest, prng, oid })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_dimensions() {
        let p = ParameterSet::fm11t40();
        assert_eq!(p.n(), 2048);
        assert_eq!(p.k(), 1608);
        assert_eq!(p.oid(), [1, 1, 1]);
        assert_eq!(ParameterSet::fm12t41().k(), 4096 - 12 * 41);
    }

    #[test]
    fn name_and_oid_lookup_agree() {
        for name in ParameterSet::catalog_names() {
            let p = ParameterSet::by_name(name).unwrap();
            assert_eq!(ParameterSet::by_oid(p.oid()).unwrap(), p);
        }
        assert!(ParameterSet::by_name("fm99t1").is_err());
        assert!(ParameterSet::by_oid([2, 1, 1]).is_err());
    }

    #[test]
    fn wire_round_trip() {
        let p = ParameterSet::fm12t41()
            .with_engine(Engine::KobaraImai)
            .with_digest(crate::digest::DigestKind::Sha512);
        let bytes = p.to_bytes();
        assert_eq!(bytes.len(), 27);
        assert_eq!(ParameterSet::try_from_bytes(&bytes).unwrap(), p);
    }

    #[test]
    fn random_field_polynomials_are_usable() {
        use rand_core::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(55);
        let p = ParameterSet::with_random_field_poly(
            10,
            12,
            Engine::Fujisaki,
            crate::digest::DigestKind::Sha256,
            crate::prng::PrngKind::CtrDrbg,
            &mut rng,
        )
        .unwrap();
        assert_eq!(p.n(), 1024);
        assert!(crate::bitpoly::is_irreducible(u64::from(p.field_poly())));
        assert_eq!(ParameterSet::try_from_bytes(&p.to_bytes()).unwrap(), p);
    }

    #[test]
    fn rejects_bad_parameters() {
        use crate::digest::DigestKind;
        use crate::prng::PrngKind;
        let mk = |m, t| {
            ParameterSet::custom(m, t, Engine::Fujisaki, DigestKind::Sha256, PrngKind::CtrDrbg)
        };
        assert!(mk(0, 1).is_err());
        assert!(mk(17, 1).is_err());
        assert!(mk(8, 0).is_err());
        assert!(mk(8, 255).is_err()); // t >= n is nonsense
        assert!(mk(8, 40).is_err()); // m*t >= n leaves no dimension
        assert!(mk(11, 40).is_ok());
    }

    #[test]
    fn rejects_malformed_wire_forms(){
        let mut bytes = ParameterSet::fm11t40().to_bytes();
        bytes[24] = 9; // oid[0] must be 1
        assert!(ParameterSet::try_from_bytes(&bytes).is_err());
        let mut bytes = ParameterSet::fm11t40().to_bytes();
        bytes[0] = 77; // unknown engine
        assert!(ParameterSet::try_from_bytes(&bytes).is_err());
        let mut bytes = ParameterSet::fm11t40().to_bytes();
        bytes[22] = 0xff; // blow up the field polynomial degree
        assert!(ParameterSet::try_from_bytes(&bytes).is_err());
        assert!(ParameterSet::try_from_bytes(&[0u8; 5]).is_err());
    }
}
