use mceliece::traits::SerDes;
use mceliece::{DigestKind, Engine, Error, McEliece, ParameterSet, PrivateKey, PrngKind, PublicKey};
use rand_chacha::rand_core::SeedableRng;
use rand_core::RngCore;


fn params(engine: Engine) -> ParameterSet {
    ParameterSet::custom(9, 16, engine, DigestKind::Sha256, PrngKind::CtrDrbg).unwrap()
}


// Highlights validation at the deserialization boundary
#[test]
fn fails_on_garbage_key_bytes() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    for _ in 0..20 {
        let mut bad = vec![0u8; 600];
        rng.fill_bytes(&mut bad);
        assert!(PublicKey::try_from_bytes(&bad).is_err());
        assert!(PrivateKey::try_from_bytes(&bad).is_err());
    }
    assert!(PublicKey::try_from_bytes(&[]).is_err());
    assert!(PrivateKey::try_from_bytes(&[]).is_err());
}


#[test]
fn fails_on_dimension_mismatch_between_key_and_params() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(124);
    let cipher = McEliece::new(params(Engine::Fujisaki));
    let keys = cipher.generate_keypair_with_rng(&mut rng).unwrap();

    // Same m, different t: dimensions disagree with the key material.
    let other = McEliece::new(
        ParameterSet::custom(9, 18, Engine::Fujisaki, DigestKind::Sha256, PrngKind::CtrDrbg)
            .unwrap(),
    );
    assert!(matches!(
        other.encrypt_with_rng(keys.public(), b"x", &mut rng),
        Err(Error::InvalidKey(_))
    ));
    let ct = cipher.encrypt_with_rng(keys.public(), b"x", &mut rng).unwrap();
    assert!(matches!(other.decrypt(keys.private(), &ct), Err(Error::InvalidKey(_))));
}


#[test]
fn fails_on_cross_engine_ciphertexts() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(125);
    let fujisaki = McEliece::new(params(Engine::Fujisaki));
    let keys = fujisaki.generate_keypair_with_rng(&mut rng).unwrap();
    let ct = fujisaki.encrypt_with_rng(keys.public(), b"sealed", &mut rng).unwrap();

    for engine in [Engine::KobaraImai, Engine::Pointcheval] {
        let other = McEliece::new(params(engine));
        assert!(
            other.decrypt(keys.private(), &ct).is_err(),
            "ciphertext accepted under {engine:?}"
        );
    }
}


#[test]
fn fails_on_every_sampled_bit_flip() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(126);
    for engine in [Engine::Fujisaki, Engine::KobaraImai, Engine::Pointcheval] {
        let cipher = McEliece::new(params(engine));
        let keys = cipher.generate_keypair_with_rng(&mut rng).unwrap();
        let ct = cipher.encrypt_with_rng(keys.public(), b"integrity", &mut rng).unwrap();

        for pos in (0..ct.len()).step_by(7) {
            let mut bad = ct.clone();
            bad[pos] ^= 1 << (pos % 8);
            assert_eq!(
                cipher.decrypt(keys.private(), &bad),
                Err(Error::InvalidCiphertext),
                "engine {engine:?}, byte {pos}"
            );
        }
    }
}


#[test]
fn fails_on_oversized_plaintext() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(127);
    let cipher = McEliece::new(params(Engine::Pointcheval));
    let keys = cipher.generate_keypair_with_rng(&mut rng).unwrap();
    let too_long = vec![7u8; keys.public().k() / 8 + 1];
    assert!(matches!(
        cipher.encrypt_with_rng(keys.public(), &too_long, &mut rng),
        Err(Error::InputTooLong(_))
    ));
}


#[test]
fn fails_on_malformed_parameter_bytes() {
    let good = ParameterSet::fm11t40().to_bytes();
    assert!(ParameterSet::try_from_bytes(&good[..good.len() - 1]).is_err());

    let mut extra = good.clone();
    extra.push(0);
    assert!(ParameterSet::try_from_bytes(&extra).is_err());

    let mut bad_digest = good.clone();
    bad_digest[4] = 0xee;
    assert!(ParameterSet::try_from_bytes(&bad_digest).is_err());

    let mut bad_prng = good;
    bad_prng[8] = 0xee;
    assert!(ParameterSet::try_from_bytes(&bad_prng).is_err());
}
