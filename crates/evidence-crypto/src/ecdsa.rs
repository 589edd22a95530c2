//! # ECDSA Signing and Verification
//!
//! NIST P-256 and P-384 keys. The message is hashed with the digest that
//! matches the curve size (SHA-256 for P-256, SHA-384 for P-384) and the
//! digest is signed with the prehash primitive. Signatures are ASN.1 DER
//! encoded, the form produced by Go's `ecdsa.SignASN1` and by OpenSSL.
//!
//! Signing uses RFC 6979 deterministic nonces; verifiers cannot tell the
//! difference from randomized nonces.

use evidence_core::{EvidenceError, Result};
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding, ObjectIdentifier};
use sha2::{Digest, Sha256, Sha384};
use zeroize::Zeroizing;

use crate::constants::{ECDSA_P256_SCHEME, ECDSA_P384_SCHEME, SECP256R1_OID, SECP384R1_OID};
use crate::key::{Key, KeyType};
use crate::pem::{invalid, parse_canonical_key, ParsedKey};
use crate::signer::SignerVerifier;

/// Supported named curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcdsaCurve {
    /// NIST P-256 (secp256r1).
    P256,
    /// NIST P-384 (secp384r1).
    P384,
}

impl EcdsaCurve {
    /// Map a named-curve OID to a supported curve.
    pub fn from_oid(oid: ObjectIdentifier) -> Option<Self> {
        if oid == SECP256R1_OID {
            Some(Self::P256)
        } else if oid == SECP384R1_OID {
            Some(Self::P384)
        } else {
            None
        }
    }

    /// Map a private scalar width in bytes to a supported curve.
    pub fn from_scalar_len(len: usize) -> Option<Self> {
        match len {
            32 => Some(Self::P256),
            48 => Some(Self::P384),
            _ => None,
        }
    }

    /// Scheme tag recorded on keys of this curve.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::P256 => ECDSA_P256_SCHEME,
            Self::P384 => ECDSA_P384_SCHEME,
        }
    }
}

/// An ECDSA public key on a supported curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcPublicKey {
    /// P-256 point.
    P256(p256::PublicKey),
    /// P-384 point.
    P384(p384::PublicKey),
}

impl EcPublicKey {
    pub(crate) fn from_public_key_der(curve: EcdsaCurve, der: &[u8]) -> Result<Self> {
        match curve {
            EcdsaCurve::P256 => p256::PublicKey::from_public_key_der(der)
                .map(Self::P256)
                .map_err(invalid("P-256 public key")),
            EcdsaCurve::P384 => p384::PublicKey::from_public_key_der(der)
                .map(Self::P384)
                .map_err(invalid("P-384 public key")),
        }
    }

    /// Curve of this key.
    pub fn curve(&self) -> EcdsaCurve {
        match self {
            Self::P256(_) => EcdsaCurve::P256,
            Self::P384(_) => EcdsaCurve::P384,
        }
    }

    /// PKIX `PUBLIC KEY` PEM with LF line endings, trimmed.
    pub fn to_canonical_pem(&self) -> Result<String> {
        let pem = match self {
            Self::P256(k) => k.to_public_key_pem(LineEnding::LF),
            Self::P384(k) => k.to_public_key_pem(LineEnding::LF),
        }
        .map_err(invalid("EC public key encoding"))?;
        Ok(pem.trim().to_string())
    }
}

/// An ECDSA private scalar on a supported curve. Zeroized on drop.
pub enum EcSecretKey {
    /// P-256 scalar.
    P256(p256::SecretKey),
    /// P-384 scalar.
    P384(p384::SecretKey),
}

impl EcSecretKey {
    pub(crate) fn from_pkcs8_der(curve: EcdsaCurve, der: &[u8]) -> Result<Self> {
        match curve {
            EcdsaCurve::P256 => p256::SecretKey::from_pkcs8_der(der)
                .map(Self::P256)
                .map_err(invalid("P-256 private key")),
            EcdsaCurve::P384 => p384::SecretKey::from_pkcs8_der(der)
                .map(Self::P384)
                .map_err(invalid("P-384 private key")),
        }
    }

    pub(crate) fn from_sec1_der(curve: EcdsaCurve, der: &[u8]) -> Result<Self> {
        match curve {
            EcdsaCurve::P256 => p256::SecretKey::from_sec1_der(der)
                .map(Self::P256)
                .map_err(invalid("P-256 SEC1 private key")),
            EcdsaCurve::P384 => p384::SecretKey::from_sec1_der(der)
                .map(Self::P384)
                .map_err(invalid("P-384 SEC1 private key")),
        }
    }

    /// The matching public point.
    pub fn public_key(&self) -> EcPublicKey {
        match self {
            Self::P256(k) => EcPublicKey::P256(k.public_key()),
            Self::P384(k) => EcPublicKey::P384(k.public_key()),
        }
    }

    /// SEC1 `EC PRIVATE KEY` PEM with LF line endings, trimmed.
    pub fn to_canonical_pem(&self) -> Result<Zeroizing<String>> {
        let pem = match self {
            Self::P256(k) => k.to_sec1_pem(LineEnding::LF),
            Self::P384(k) => k.to_sec1_pem(LineEnding::LF),
        }
        .map_err(invalid("EC private key encoding"))?;
        Ok(Zeroizing::new(pem.trim().to_string()))
    }
}

enum EcVerifyingKey {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
}

enum EcSigningKey {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
}

/// ECDSA signer/verifier bound to one key.
pub struct EcdsaSignerVerifier {
    key_id: String,
    public_material: String,
    verifying: EcVerifyingKey,
    signing: Option<EcSigningKey>,
}

impl EcdsaSignerVerifier {
    /// Build from a canonical [`Key`] record.
    ///
    /// The public material must be a PKIX PEM of a supported curve; private
    /// material, when present, must belong to the same key.
    pub fn from_key(key: &Key) -> Result<Self> {
        if key.key_type != KeyType::Ecdsa {
            return Err(EvidenceError::InvalidEncoding(format!(
                "expected an ecdsa key, got {}",
                key.key_type
            )));
        }

        let public = match parse_canonical_key(key.public_material().as_bytes())? {
            ParsedKey::Ecdsa { public, .. } => public,
            other => {
                return Err(EvidenceError::InvalidEncoding(format!(
                    "ecdsa key carries {} public material",
                    other.key_type()
                )))
            }
        };
        key.require_scheme(public.curve().scheme())?;

        let signing = match key.private_material() {
            Some(private) => match parse_canonical_key(private.as_bytes())? {
                ParsedKey::Ecdsa {
                    public: derived,
                    private: Some(secret),
                } if derived == public => Some(secret),
                _ => {
                    return Err(EvidenceError::InvalidEncoding(
                        "ecdsa private material does not match the public key".to_string(),
                    ))
                }
            },
            None => None,
        };

        Ok(Self {
            key_id: key.key_id.clone(),
            public_material: key.public_material().to_string(),
            verifying: match &public {
                EcPublicKey::P256(k) => EcVerifyingKey::P256(k.into()),
                EcPublicKey::P384(k) => EcVerifyingKey::P384(k.into()),
            },
            signing: signing.map(|secret| match secret {
                EcSecretKey::P256(k) => EcSigningKey::P256((&k).into()),
                EcSecretKey::P384(k) => EcSigningKey::P384((&k).into()),
            }),
        })
    }

    /// Curve of the bound key.
    pub fn curve(&self) -> EcdsaCurve {
        match self.verifying {
            EcVerifyingKey::P256(_) => EcdsaCurve::P256,
            EcVerifyingKey::P384(_) => EcdsaCurve::P384,
        }
    }
}

impl SignerVerifier for EcdsaSignerVerifier {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let signing = self.signing.as_ref().ok_or(EvidenceError::NotPrivateKey)?;
        match signing {
            EcSigningKey::P256(sk) => {
                let digest = Sha256::digest(message);
                let sig: p256::ecdsa::Signature = sk
                    .sign_prehash(&digest)
                    .map_err(|e| EvidenceError::SigningFailed(e.to_string()))?;
                Ok(sig.to_der().as_bytes().to_vec())
            }
            EcSigningKey::P384(sk) => {
                let digest = Sha384::digest(message);
                let sig: p384::ecdsa::Signature = sk
                    .sign_prehash(&digest)
                    .map_err(|e| EvidenceError::SigningFailed(e.to_string()))?;
                Ok(sig.to_der().as_bytes().to_vec())
            }
        }
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        let verified = match &self.verifying {
            EcVerifyingKey::P256(vk) => p256::ecdsa::Signature::from_der(signature)
                .and_then(|sig| vk.verify_prehash(&Sha256::digest(message), &sig)),
            EcVerifyingKey::P384(vk) => p384::ecdsa::Signature::from_der(signature)
                .and_then(|sig| vk.verify_prehash(&Sha384::digest(message), &sig)),
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

impl std::fmt::Debug for EcdsaSignerVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaSignerVerifier")
            .field("key_id", &self.key_id)
            .field("curve", &self.curve())
            .field("private", &self.signing.is_some())
            .finish()
    }
}
