//! # Signature Properties Across Key Families
//!
//! Properties every signer/verifier must hold regardless of algorithm:
//! a fresh signature verifies, and flipping any single bit of the
//! signature or the message makes verification fail with
//! `SignatureVerificationFailed`.

use evidence_core::EvidenceError;
use evidence_crypto::{load_key, AnySignerVerifier, SignerVerifier};
use proptest::prelude::*;

const PRIVATE_KEYS: [&str; 4] = [
    include_str!("../../../testdata/keys/rsa_private.pem"),
    include_str!("../../../testdata/keys/ecdsa_p256_private.pem"),
    include_str!("../../../testdata/keys/ecdsa_p384_private.pem"),
    include_str!("../../../testdata/keys/ed25519_private.pem"),
];

const PUBLIC_KEYS: [&str; 4] = [
    include_str!("../../../testdata/keys/rsa_public.pem"),
    include_str!("../../../testdata/keys/ecdsa_p256_public.pem"),
    include_str!("../../../testdata/keys/ecdsa_p384_public.pem"),
    include_str!("../../../testdata/keys/ed25519_public.pem"),
];

fn signer(pem: &str) -> AnySignerVerifier {
    AnySignerVerifier::from_key(&load_key(pem.as_bytes()).expect("fixture loads"))
        .expect("fixture binds")
}

#[test]
fn public_key_verifies_private_key_signature() {
    for (private, public) in PRIVATE_KEYS.iter().zip(PUBLIC_KEYS.iter()) {
        let sig = signer(private).sign(b"hello").unwrap();
        signer(public).verify(b"hello", &sig).unwrap();
    }
}

#[test]
fn empty_message_signs_and_verifies() {
    for private in PRIVATE_KEYS {
        let sv = signer(private);
        let sig = sv.sign(b"").unwrap();
        sv.verify(b"", &sig).unwrap();
    }
}

#[test]
fn empty_signature_is_rejected() {
    for public in PUBLIC_KEYS {
        let err = signer(public).verify(b"hello", &[]).unwrap_err();
        assert!(matches!(err, EvidenceError::SignatureVerificationFailed));
    }
}

#[test]
fn public_only_keys_cannot_sign() {
    for public in PUBLIC_KEYS {
        let err = signer(public).sign(b"hello").unwrap_err();
        assert!(matches!(err, EvidenceError::NotPrivateKey));
    }
}

#[test]
fn cross_family_signatures_are_rejected() {
    let ed_sig = signer(PRIVATE_KEYS[3]).sign(b"hello").unwrap();
    for public in &PUBLIC_KEYS[..3] {
        let err = signer(public).verify(b"hello", &ed_sig).unwrap_err();
        assert!(matches!(err, EvidenceError::SignatureVerificationFailed));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Any single-bit change to a valid signature invalidates it.
    #[test]
    fn signature_bit_flip_fails(
        family in 0usize..4,
        message in proptest::collection::vec(any::<u8>(), 0..256),
        flip in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let sv = signer(PRIVATE_KEYS[family]);
        let mut sig = sv.sign(&message).unwrap();
        prop_assert!(sv.verify(&message, &sig).is_ok());

        let at = flip.index(sig.len());
        sig[at] ^= 1 << bit;
        let result = sv.verify(&message, &sig);
        prop_assert!(
            matches!(result, Err(EvidenceError::SignatureVerificationFailed)),
            "flipped bit {} of byte {} still verified", bit, at
        );
    }

    /// Any single-bit change to the message invalidates the signature.
    #[test]
    fn message_bit_flip_fails(
        family in 0usize..4,
        message in proptest::collection::vec(any::<u8>(), 1..256),
        flip in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let sv = signer(PRIVATE_KEYS[family]);
        let sig = sv.sign(&message).unwrap();

        let mut tampered = message.clone();
        let at = flip.index(tampered.len());
        tampered[at] ^= 1 << bit;
        prop_assert!(sv.verify(&tampered, &sig).is_err());
    }
}
