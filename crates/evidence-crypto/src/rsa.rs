//! # RSA Signing and Verification
//!
//! Keys are tagged `rsassa-pss-sha256`, and the default primitive is
//! exactly that: RSASSA-PSS with SHA-256 for both the message digest and
//! MGF1. Signing uses a salt as long as the digest (32 bytes). Verification
//! accepts that salt length and the maximum one, which is what Go's
//! `rsa.SignPSS` emits with default options.
//!
//! [`RsaPadding::LegacyPkcs1v15`] selects RSASSA-PKCS1-v1_5 over SHA-256
//! for envelopes produced by signers that used it under the PSS tag. It is
//! never chosen implicitly; a PSS verifier does not retry with PKCS#1 v1.5.

use evidence_core::{EvidenceError, Result};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::constants::RSA_SCHEME;
use crate::key::{Key, KeyType};
use crate::pem::{parse_canonical_key, ParsedKey};
use crate::signer::SignerVerifier;

const SHA256_LEN: usize = 32;

/// RSA signature padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RsaPadding {
    /// RSASSA-PSS, SHA-256, MGF1-SHA-256.
    #[default]
    Pss,
    /// RSASSA-PKCS1-v1_5 with SHA-256. Opt-in only.
    LegacyPkcs1v15,
}

/// RSA signer/verifier bound to one key.
pub struct RsaSignerVerifier {
    key_id: String,
    public_material: String,
    public: RsaPublicKey,
    private: Option<RsaPrivateKey>,
    padding: RsaPadding,
}

impl RsaSignerVerifier {
    /// Build from a canonical [`Key`] record, using PSS.
    pub fn from_key(key: &Key) -> Result<Self> {
        if key.key_type != KeyType::Rsa {
            return Err(EvidenceError::InvalidEncoding(format!(
                "expected an rsa key, got {}",
                key.key_type
            )));
        }

        let public = match parse_canonical_key(key.public_material().as_bytes())? {
            ParsedKey::Rsa { public, .. } => public,
            other => {
                return Err(EvidenceError::InvalidEncoding(format!(
                    "rsa key carries {} public material",
                    other.key_type()
                )))
            }
        };
        key.require_scheme(RSA_SCHEME)?;

        let private = match key.private_material() {
            Some(material) => match parse_canonical_key(material.as_bytes())? {
                ParsedKey::Rsa {
                    public: derived,
                    private: Some(private),
                } if derived == public => Some(private),
                _ => {
                    return Err(EvidenceError::InvalidEncoding(
                        "rsa private material does not match the public key".to_string(),
                    ))
                }
            },
            None => None,
        };

        Ok(Self {
            key_id: key.key_id.clone(),
            public_material: key.public_material().to_string(),
            public,
            private,
            padding: RsaPadding::Pss,
        })
    }

    /// Use `padding` for both signing and verification.
    pub fn with_padding(mut self, padding: RsaPadding) -> Self {
        self.padding = padding;
        self
    }

    /// Padding in effect.
    pub fn padding(&self) -> RsaPadding {
        self.padding
    }

    /// Longest PSS salt the key admits with SHA-256.
    fn max_salt_len(&self) -> usize {
        let em_len = (self.public.n().bits() + 6) / 8;
        em_len.saturating_sub(SHA256_LEN + 2)
    }
}

impl SignerVerifier for RsaSignerVerifier {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let private = self.private.as_ref().ok_or(EvidenceError::NotPrivateKey)?;
        let digest = Sha256::digest(message);
        let signed = match self.padding {
            RsaPadding::Pss => {
                private.sign_with_rng(&mut rand::rngs::OsRng, Pss::new::<Sha256>(), &digest)
            }
            RsaPadding::LegacyPkcs1v15 => private.sign(Pkcs1v15Sign::new::<Sha256>(), &digest),
        };
        signed.map_err(|e| EvidenceError::SigningFailed(e.to_string()))
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        let digest = Sha256::digest(message);
        let verified = match self.padding {
            RsaPadding::Pss => self
                .public
                .verify(Pss::new::<Sha256>(), &digest, signature)
                .or_else(|_| {
                    self.public.verify(
                        Pss::new_with_salt::<Sha256>(self.max_salt_len()),
                        &digest,
                        signature,
                    )
                }),
            RsaPadding::LegacyPkcs1v15 => {
                self.public
                    .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            }
        };
        verified.map_err(|_| EvidenceError::SignatureVerificationFailed)
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn public_key(&self) -> &str {
        &self.public_material
    }
}

impl std::fmt::Debug for RsaSignerVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaSignerVerifier")
            .field("key_id", &self.key_id)
            .field("bits", &self.public.n().bits())
            .field("padding", &self.padding)
            .field("private", &self.private.is_some())
            .finish()
    }
}
