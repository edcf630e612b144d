use mceliece::traits::SerDes;
use mceliece::{
    DigestKind, Engine, KeyPair, McEliece, ParameterSet, PrivateKey, Prng, PrngKind, PublicKey,
    Signer,
};
use rand_chacha::rand_core::SeedableRng;


fn small_params(engine: Engine) -> ParameterSet {
    ParameterSet::custom(9, 16, engine, DigestKind::Sha256, PrngKind::CtrDrbg).unwrap()
}


#[test]
fn test_expected_flow_all_engines() {
    for engine in [Engine::Fujisaki, Engine::KobaraImai, Engine::Pointcheval] {
        let cipher = McEliece::new(small_params(engine));
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);

        // Alice runs KeyGen and serializes the public key for Bob
        let alice_keys = cipher.generate_keypair_with_rng(&mut rng).unwrap();
        let alice_pk_bytes = alice_keys.public().to_bytes();

        // Alice sends pk bytes to Bob
        let bob_pk_bytes = alice_pk_bytes;

        // Bob deserializes the public key and encrypts a message for Alice
        let bob_pk = PublicKey::try_from_bytes(&bob_pk_bytes).unwrap();
        let bob_ct = cipher.encrypt_with_rng(&bob_pk, b"hello alice", &mut rng).unwrap();

        // Alice decrypts
        let alice_pt = cipher.decrypt(alice_keys.private(), &bob_ct).unwrap();
        assert_eq!(alice_pt, b"hello alice", "engine {engine:?}");

        // The private key survives a serialization round trip and still decrypts
        let alice_sk = PrivateKey::try_from_bytes(&alice_keys.private().to_bytes()).unwrap();
        assert_eq!(cipher.decrypt(&alice_sk, &bob_ct).unwrap(), b"hello alice");
    }
}


#[test]
fn test_round_trip_every_digest() {
    let digests = [
        DigestKind::Blake256,
        DigestKind::Blake512,
        DigestKind::Keccak256,
        DigestKind::Keccak512,
        DigestKind::Sha256,
        DigestKind::Sha512,
        DigestKind::Skein256,
        DigestKind::Skein512,
        DigestKind::Skein1024,
    ];
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
    for digest in digests {
        let params =
            ParameterSet::custom(9, 16, Engine::KobaraImai, digest, PrngKind::CtrDrbg).unwrap();
        let cipher = McEliece::new(params);
        let keys = cipher.generate_keypair_with_rng(&mut rng).unwrap();
        let ct = cipher.encrypt_with_rng(keys.public(), b"digest sweep", &mut rng).unwrap();
        assert_eq!(cipher.decrypt(keys.private(), &ct).unwrap(), b"digest sweep", "{digest:?}");
    }
}


// Scenario: fm11t40 under a deterministic all-zero seed. Fujisaki carries a
// 201-byte plaintext (the full k/8 capacity) in a 256-byte primitive block
// plus the masked message; Kobara-Imai absorbs a short plaintext entirely
// into the primitive block. Two runs from the same seed agree byte for byte.
#[test]
fn test_catalog_scenarios_fm11t40() {
    let mut rng = Prng::from_seed(&[0u8; 32]);
    let fujisaki = McEliece::new(ParameterSet::fm11t40());
    let keys = fujisaki.generate_keypair_with_rng(&mut rng).unwrap();
    assert_eq!(keys.public().n(), 2048);
    assert_eq!(keys.public().k(), 1608);

    // 201 zero bytes round-trip through Fujisaki
    let msg = vec![0u8; 201];
    let ct = fujisaki.encrypt_with_rng(keys.public(), &msg, &mut rng).unwrap();
    assert_eq!(ct.len(), 2048 / 8 + 201);
    assert_eq!(fujisaki.decrypt(keys.private(), &ct).unwrap(), msg);

    // "test" round-trips through Kobara-Imai on the same key pair; the short
    // message folds completely into the 256-byte primitive ciphertext
    let ki = McEliece::new(ParameterSet::fm11t40().with_engine(Engine::KobaraImai));
    let ct = ki.encrypt_with_rng(keys.public(), b"test", &mut rng).unwrap();
    assert_eq!(ct.len(), 256);
    assert_eq!(ki.decrypt(keys.private(), &ct).unwrap(), b"test");

    // flipping bit 0 of byte 0 must be rejected
    let mut bad = ct.clone();
    bad[0] ^= 1;
    assert_eq!(ki.decrypt(keys.private(), &bad), Err(mceliece::Error::InvalidCiphertext));

    // key-generation repeatability: a fresh zero seed reproduces the pair
    let mut rng2 = Prng::from_seed(&[0u8; 32]);
    let keys2 = fujisaki.generate_keypair_with_rng(&mut rng2).unwrap();
    assert_eq!(keys.public().to_bytes(), keys2.public().to_bytes());
    assert_eq!(keys.private().to_bytes(), keys2.private().to_bytes());
}


// Scenario: m=10/t=50 under Pointcheval/SHA-512 with the 01-02-03-04 seed;
// encryption round-trips and the same pair signs a long message.
#[test]
fn test_scenario_m10_t50_pointcheval() {
    let params =
        ParameterSet::custom(10, 50, Engine::Pointcheval, DigestKind::Sha512, PrngKind::CtrDrbg)
            .unwrap();
    let cipher = McEliece::new(params.clone());
    let mut rng = Prng::from_seed_material(&[1, 2, 3, 4]).unwrap();
    let keys = cipher.generate_keypair_with_rng(&mut rng).unwrap();

    let mut msg = vec![0u8; 63];
    rng.get_bytes(&mut msg);
    let ct = cipher.encrypt_with_rng(keys.public(), &msg, &mut rng).unwrap();
    assert_eq!(cipher.decrypt(keys.private(), &ct).unwrap(), msg);

    let mut signer = Signer::new(params);
    signer.initialize(keys);
    let mut long_msg = vec![0u8; 320];
    rng.get_bytes(&mut long_msg);
    let sig = signer.sign_with_rng(&long_msg, &mut rng).unwrap();
    assert!(signer.verify(&long_msg, &sig).unwrap());
}


// Scenario: serialization stability under fm12t41; the digest of the
// serialized public key is unchanged by a parse/re-serialize cycle.
#[test]
fn test_serialization_stability_fm12t41() {
    let cipher = McEliece::new(ParameterSet::fm12t41());
    let mut rng = Prng::from_seed(&[42u8; 32]);
    let keys = cipher.generate_keypair_with_rng(&mut rng).unwrap();

    let pk_bytes = keys.public().to_bytes();
    let first = sha256(&pk_bytes);
    let reparsed = PublicKey::try_from_bytes(&pk_bytes).unwrap();
    let second = sha256(&reparsed.to_bytes());
    assert_eq!(hex::encode(first), hex::encode(second));

    let sk_bytes = keys.private().to_bytes();
    let reparsed = PrivateKey::try_from_bytes(&sk_bytes).unwrap();
    assert_eq!(hex::encode(sha256(&sk_bytes)), hex::encode(sha256(&reparsed.to_bytes())));
}

fn sha256(data: &[u8]) -> Vec<u8> {
    use sha2::{Digest, Sha256};
    Sha256::digest(data).to_vec()
}


#[test]
fn test_parameter_set_round_trip_and_lookup() {
    for name in ParameterSet::catalog_names() {
        let params = ParameterSet::by_name(name).unwrap();
        let bytes = params.to_bytes();
        assert_eq!(ParameterSet::try_from_bytes(&bytes).unwrap(), params);
        assert_eq!(ParameterSet::by_oid(params.oid()).unwrap(), params);
    }
}


#[test]
fn test_signatures_across_engines() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(789);
    for engine in [Engine::Fujisaki, Engine::KobaraImai, Engine::Pointcheval] {
        let params = small_params(engine);
        let keys = KeyPair::generate(&params, &mut rng).unwrap();
        let mut signer = Signer::new(params);
        signer.initialize(keys);

        let sig = signer.sign_with_rng(b"a signed statement", &mut rng).unwrap();
        assert!(signer.verify(b"a signed statement", &sig).unwrap());
        assert!(!signer.verify(b"a forged statement", &sig).unwrap());
    }
}
