//! # PEM Key Parsing
//!
//! Extracts a structured key from the first PEM block of the input. The
//! block label selects the DER structure; for the algorithm-agnostic
//! structures (`PUBLIC KEY`, `PRIVATE KEY`) the algorithm OID selects the
//! family.
//!
//! | Label | Structure |
//! |---|---|
//! | `PUBLIC KEY` | PKIX `SubjectPublicKeyInfo` |
//! | `RSA PUBLIC KEY` | PKCS#1 `RSAPublicKey` |
//! | `PRIVATE KEY` | PKCS#8 `PrivateKeyInfo` |
//! | `RSA PRIVATE KEY` | PKCS#1 `RSAPrivateKey` |
//! | `EC PRIVATE KEY` | SEC1 `ECPrivateKey` |
//!
//! Anything that is not a PEM block, carries another label, or fails to
//! decode is `InvalidEncoding`. A structure that decodes but names an
//! algorithm or curve outside RSA / ECDSA P-256, P-384 / Ed25519 is
//! `UnsupportedKeyType`.
//!
//! RSA public keys are rebuilt from their modulus and exponent with a
//! [`RSA_MAX_MODULUS_BITS`] ceiling, so 8192-bit keys load like any other.

use evidence_core::{EvidenceError, Result};
use pkcs8::der::Decode;
use pkcs8::{DecodePrivateKey, DecodePublicKey, PrivateKeyInfo, SubjectPublicKeyInfoRef};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};

use crate::constants::{
    EC_PRIVATE_KEY_PEM, EC_PUBLIC_KEY_OID, ED25519_OID, PRIVATE_KEY_PEM, PUBLIC_KEY_PEM,
    RSA_ENCRYPTION_OID, RSA_MAX_MODULUS_BITS, RSA_PRIVATE_KEY_PEM, RSA_PUBLIC_KEY_PEM,
};
use crate::ecdsa::{EcPublicKey, EcSecretKey, EcdsaCurve};
use crate::key::KeyType;

/// A decoded key of one of the supported families.
///
/// Private variants keep the public half alongside, so every `ParsedKey`
/// can produce canonical public material.
pub enum ParsedKey {
    /// RSA public key, optionally with its private key.
    Rsa {
        /// Public half.
        public: RsaPublicKey,
        /// Private key, when the input carried one.
        private: Option<RsaPrivateKey>,
    },
    /// ECDSA public key, optionally with its private scalar.
    Ecdsa {
        /// Public half.
        public: EcPublicKey,
        /// Private key, when the input carried one.
        private: Option<EcSecretKey>,
    },
    /// Ed25519 public key, optionally with its signing key.
    Ed25519 {
        /// Public half.
        public: ed25519_dalek::VerifyingKey,
        /// Signing key, when the input carried one.
        private: Option<ed25519_dalek::SigningKey>,
    },
}

impl ParsedKey {
    /// The algorithm family of this key.
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::Rsa { .. } => KeyType::Rsa,
            Self::Ecdsa { .. } => KeyType::Ecdsa,
            Self::Ed25519 { .. } => KeyType::Ed25519,
        }
    }

    /// Whether private material was present in the input.
    pub fn has_private(&self) -> bool {
        match self {
            Self::Rsa { private, .. } => private.is_some(),
            Self::Ecdsa { private, .. } => private.is_some(),
            Self::Ed25519 { private, .. } => private.is_some(),
        }
    }

    fn rsa_private(private: RsaPrivateKey) -> Self {
        Self::Rsa {
            public: private.to_public_key(),
            private: Some(private),
        }
    }

    fn ecdsa_private(private: EcSecretKey) -> Self {
        Self::Ecdsa {
            public: private.public_key(),
            private: Some(private),
        }
    }

    fn ed25519_private(private: ed25519_dalek::SigningKey) -> Self {
        Self::Ed25519 {
            public: private.verifying_key(),
            private: Some(private),
        }
    }
}

impl std::fmt::Debug for ParsedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let visibility = if self.has_private() { "private" } else { "public" };
        write!(f, "ParsedKey({}, {visibility})", self.key_type())
    }
}

/// Parse the first PEM block of `bytes` into a [`ParsedKey`].
pub fn parse_canonical_key(bytes: &[u8]) -> Result<ParsedKey> {
    let block = ::pem::parse(bytes)
        .map_err(|e| EvidenceError::InvalidEncoding(format!("no valid PEM block found: {e}")))?;
    let der = block.contents();

    match block.tag() {
        PUBLIC_KEY_PEM => parse_spki(der),
        RSA_PUBLIC_KEY_PEM => Ok(ParsedKey::Rsa {
            public: decode_rsa_public(der)?,
            private: None,
        }),
        PRIVATE_KEY_PEM => parse_pkcs8(der),
        RSA_PRIVATE_KEY_PEM => {
            let private =
                RsaPrivateKey::from_pkcs1_der(der).map_err(invalid("PKCS#1 private key"))?;
            Ok(ParsedKey::rsa_private(private))
        }
        EC_PRIVATE_KEY_PEM => parse_sec1(der),
        other => Err(EvidenceError::InvalidEncoding(format!(
            "unrecognized PEM block label {other:?}"
        ))),
    }
}

fn parse_spki(der: &[u8]) -> Result<ParsedKey> {
    let spki = SubjectPublicKeyInfoRef::from_der(der).map_err(invalid("SubjectPublicKeyInfo"))?;
    let oid = spki.algorithm.oid;

    if oid == RSA_ENCRYPTION_OID {
        let pkcs1 = spki.subject_public_key.as_bytes().ok_or_else(|| {
            EvidenceError::InvalidEncoding("RSA public key: unaligned bit string".to_string())
        })?;
        Ok(ParsedKey::Rsa {
            public: decode_rsa_public(pkcs1)?,
            private: None,
        })
    } else if oid == EC_PUBLIC_KEY_OID {
        let curve_oid = spki
            .algorithm
            .parameters_oid()
            .map_err(invalid("EC public key parameters"))?;
        let curve = EcdsaCurve::from_oid(curve_oid).ok_or_else(|| {
            EvidenceError::UnsupportedKeyType(format!("elliptic curve {curve_oid}"))
        })?;
        Ok(ParsedKey::Ecdsa {
            public: EcPublicKey::from_public_key_der(curve, der)?,
            private: None,
        })
    } else if oid == ED25519_OID {
        let public = ed25519_dalek::VerifyingKey::from_public_key_der(der)
            .map_err(invalid("Ed25519 public key"))?;
        Ok(ParsedKey::Ed25519 {
            public,
            private: None,
        })
    } else {
        Err(EvidenceError::UnsupportedKeyType(format!(
            "public key algorithm {oid}"
        )))
    }
}

fn parse_pkcs8(der: &[u8]) -> Result<ParsedKey> {
    let info = PrivateKeyInfo::from_der(der).map_err(invalid("PKCS#8 private key"))?;
    let oid = info.algorithm.oid;

    if oid == RSA_ENCRYPTION_OID {
        let private = RsaPrivateKey::from_pkcs8_der(der).map_err(invalid("RSA private key"))?;
        Ok(ParsedKey::rsa_private(private))
    } else if oid == EC_PUBLIC_KEY_OID {
        let curve_oid = info
            .algorithm
            .parameters_oid()
            .map_err(invalid("EC private key parameters"))?;
        let curve = EcdsaCurve::from_oid(curve_oid).ok_or_else(|| {
            EvidenceError::UnsupportedKeyType(format!("elliptic curve {curve_oid}"))
        })?;
        Ok(ParsedKey::ecdsa_private(EcSecretKey::from_pkcs8_der(
            curve, der,
        )?))
    } else if oid == ED25519_OID {
        let private = ed25519_dalek::SigningKey::from_pkcs8_der(der)
            .map_err(invalid("Ed25519 private key"))?;
        Ok(ParsedKey::ed25519_private(private))
    } else {
        Err(EvidenceError::UnsupportedKeyType(format!(
            "private key algorithm {oid}"
        )))
    }
}

fn parse_sec1(der: &[u8]) -> Result<ParsedKey> {
    let ec = sec1::EcPrivateKey::from_der(der).map_err(invalid("SEC1 private key"))?;
    let curve = match ec.parameters.and_then(|p| p.named_curve()) {
        Some(oid) => EcdsaCurve::from_oid(oid).ok_or_else(|| {
            EvidenceError::UnsupportedKeyType(format!("elliptic curve {oid}"))
        })?,
        // Parameters are optional in SEC1; fall back to the scalar width.
        None => EcdsaCurve::from_scalar_len(ec.private_key.len()).ok_or_else(|| {
            EvidenceError::UnsupportedKeyType(format!(
                "{}-byte elliptic curve private key",
                ec.private_key.len()
            ))
        })?,
    };
    Ok(ParsedKey::ecdsa_private(EcSecretKey::from_sec1_der(
        curve, der,
    )?))
}

/// Decode a PKCS#1 `RSAPublicKey` without the `rsa` crate's 4096-bit cap.
fn decode_rsa_public(der: &[u8]) -> Result<RsaPublicKey> {
    let key = rsa::pkcs1::RsaPublicKey::from_der(der).map_err(invalid("PKCS#1 public key"))?;
    RsaPublicKey::new_with_max_size(
        BigUint::from_bytes_be(key.modulus.as_bytes()),
        BigUint::from_bytes_be(key.public_exponent.as_bytes()),
        RSA_MAX_MODULUS_BITS,
    )
    .map_err(invalid("RSA public key"))
}

/// Build a `map_err` adapter that reports `what` failed to decode.
pub(crate) fn invalid<E: std::fmt::Display>(
    what: &'static str,
) -> impl Fn(E) -> EvidenceError {
    move |e| EvidenceError::InvalidEncoding(format!("{what}: {e}"))
}
