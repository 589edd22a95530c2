//! # Ed25519 Signing and Verification
//!
//! Ed25519 signs the message itself; there is no separate prehash step.
//!
//! ## Security Invariant
//!
//! - Private material is decoded into a `SigningKey` only when a signer is
//!   built, and the hex form lives in a `Zeroizing<String>`.
//! - `Debug` never shows key bytes.
//!
//! ## Material
//!
//! - Public: 64 lowercase hex characters encoding the 32-byte point.
//! - Private: 128 hex characters encoding seed ‖ point. A bare 32-byte
//!   seed (64 hex characters) is accepted on input.
//!
//! Verification uses the non-strict check that Go's `crypto/ed25519`
//! applies, so signatures produced by either side verify on both.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use evidence_core::{hex, EvidenceError, Result};
use zeroize::Zeroizing;

use crate::constants::ED25519_SCHEME;
use crate::key::{Key, KeyType};
use crate::signer::SignerVerifier;

/// Canonical public material for an Ed25519 point.
pub fn public_material(public: &VerifyingKey) -> String {
    hex::encode(public.as_bytes())
}

/// Canonical private material for an Ed25519 signing key.
pub fn private_material(private: &SigningKey) -> Zeroizing<String> {
    let bytes = Zeroizing::new(private.to_keypair_bytes());
    Zeroizing::new(hex::encode(&bytes[..]))
}

fn parse_public(material: &str) -> Result<VerifyingKey> {
    let bytes = hex::decode(material)
        .map_err(|e| EvidenceError::InvalidEncoding(format!("ed25519 public key: {e}")))?;
    let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
        EvidenceError::InvalidEncoding(format!(
            "ed25519 public key must be 32 bytes, got {}",
            bytes.len()
        ))
    })?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| EvidenceError::InvalidEncoding(format!("ed25519 public key: {e}")))
}

fn parse_private(material: &str) -> Result<SigningKey> {
    let bytes = Zeroizing::new(
        hex::decode(material)
            .map_err(|e| EvidenceError::InvalidEncoding(format!("ed25519 private key: {e}")))?,
    );
    match bytes.len() {
        32 => {
            let mut seed = Zeroizing::new([0u8; 32]);
            seed.copy_from_slice(&bytes);
            Ok(SigningKey::from_bytes(&seed))
        }
        64 => {
            let mut pair = Zeroizing::new([0u8; 64]);
            pair.copy_from_slice(&bytes);
            SigningKey::from_keypair_bytes(&pair).map_err(|_| {
                EvidenceError::InvalidEncoding(
                    "ed25519 private key halves do not match".to_string(),
                )
            })
        }
        n => Err(EvidenceError::InvalidEncoding(format!(
            "ed25519 private key must be 32 or 64 bytes, got {n}"
        ))),
    }
}

/// Ed25519 signer/verifier bound to one key.
pub struct Ed25519SignerVerifier {
    key_id: String,
    public_material: String,
    verifying: VerifyingKey,
    signing: Option<SigningKey>,
}

impl Ed25519SignerVerifier {
    /// Build from a canonical [`Key`] record.
    pub fn from_key(key: &Key) -> Result<Self> {
        if key.key_type != KeyType::Ed25519 {
            return Err(EvidenceError::InvalidEncoding(format!(
                "expected an ed25519 key, got {}",
                key.key_type
            )));
        }

        let verifying = parse_public(key.public_material())?;
        key.require_scheme(ED25519_SCHEME)?;
        let signing = key.private_material().map(parse_private).transpose()?;
        if let Some(sk) = &signing {
            if sk.verifying_key() != verifying {
                return Err(EvidenceError::InvalidEncoding(
                    "ed25519 private material does not match the public key".to_string(),
                ));
            }
        }

        Ok(Self {
            key_id: key.key_id.clone(),
            public_material: key.public_material().to_string(),
            verifying,
            signing,
        })
    }
}

impl SignerVerifier for Ed25519SignerVerifier {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let sk = self.signing.as_ref().ok_or(EvidenceError::NotPrivateKey)?;
        Ok(sk.sign(message).to_bytes().to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        let sig = ed25519_dalek::Signature::from_slice(signature)
            .map_err(|_| EvidenceError::SignatureVerificationFailed)?;
        self.verifying
            .verify(message, &sig)
            .map_err(|_| EvidenceError::SignatureVerificationFailed)
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn public_key(&self) -> &str {
        &self.public_material
    }
}

impl std::fmt::Debug for Ed25519SignerVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ed25519SignerVerifier({}..., private: {})",
            hex::prefix(self.verifying.as_bytes()),
            self.signing.is_some()
        )
    }
}
