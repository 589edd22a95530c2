//! # Signer/Verifier Abstraction
//!
//! [`SignerVerifier`] is the capability every key family provides: sign a
//! message, verify a signature, and report the bound key's ID and
//! canonical public material. [`AnySignerVerifier`] closes the set over
//! the supported families so dispatch from a [`Key`] is a single
//! exhaustive `match`.

use evidence_core::Result;

use crate::ecdsa::EcdsaSignerVerifier;
use crate::ed25519::Ed25519SignerVerifier;
use crate::key::{Key, KeyType};
use crate::rsa::{RsaPadding, RsaSignerVerifier};

/// Sign and verify with one bound key.
///
/// `message` is always the full byte string to authenticate (for DSSE, the
/// PAE encoding); any hashing the scheme needs happens inside.
pub trait SignerVerifier: Send + Sync {
    /// Sign `message`. Fails with `NotPrivateKey` for a verify-only key.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;

    /// Verify `signature` over `message`. Every rejection, including a
    /// malformed signature, is `SignatureVerificationFailed`.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()>;

    /// ID of the bound key.
    fn key_id(&self) -> &str;

    /// Canonical public material of the bound key.
    fn public_key(&self) -> &str;
}

/// A signer/verifier for any supported key family.
#[derive(Debug)]
pub enum AnySignerVerifier {
    /// RSA.
    Rsa(RsaSignerVerifier),
    /// ECDSA P-256 or P-384.
    Ecdsa(EcdsaSignerVerifier),
    /// Ed25519.
    Ed25519(Ed25519SignerVerifier),
}

impl AnySignerVerifier {
    /// Build the variant matching the key's type.
    pub fn from_key(key: &Key) -> Result<Self> {
        Ok(match key.key_type {
            KeyType::Rsa => Self::Rsa(RsaSignerVerifier::from_key(key)?),
            KeyType::Ecdsa => Self::Ecdsa(EcdsaSignerVerifier::from_key(key)?),
            KeyType::Ed25519 => Self::Ed25519(Ed25519SignerVerifier::from_key(key)?),
        })
    }

    /// Like [`from_key`](Self::from_key), with an explicit RSA padding.
    /// The padding is ignored for other families.
    pub fn from_key_with_padding(key: &Key, padding: RsaPadding) -> Result<Self> {
        match Self::from_key(key)? {
            Self::Rsa(sv) => Ok(Self::Rsa(sv.with_padding(padding))),
            other => Ok(other),
        }
    }

    /// Family of the bound key.
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::Rsa(_) => KeyType::Rsa,
            Self::Ecdsa(_) => KeyType::Ecdsa,
            Self::Ed25519(_) => KeyType::Ed25519,
        }
    }

    fn inner(&self) -> &dyn SignerVerifier {
        match self {
            Self::Rsa(sv) => sv,
            Self::Ecdsa(sv) => sv,
            Self::Ed25519(sv) => sv,
        }
    }
}

impl SignerVerifier for AnySignerVerifier {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.inner().sign(message)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        self.inner().verify(message, signature)
    }

    fn key_id(&self) -> &str {
        self.inner().key_id()
    }

    fn public_key(&self) -> &str {
        self.inner().public_key()
    }
}
