//! # evidence-crypto: Key Codec and Signer/Verifiers
//!
//! Turns PEM key files into canonical [`Key`] records and binds them to a
//! [`SignerVerifier`] of the matching family:
//!
//! - **RSA** keys tagged `rsassa-pss-sha256`, verified with RSASSA-PSS
//!   (PKCS#1 v1.5 only on explicit request).
//! - **ECDSA** on NIST P-256 and P-384 with DER signatures.
//! - **Ed25519**.
//!
//! Key IDs follow securesystemslib: SHA-256 over the canonical JSON of the
//! public key description, so IDs computed here match those computed by
//! the Go and Python in-toto tooling for the same key.
//!
//! ## Crate Policy
//!
//! - Depends only on `evidence-core` internally.
//! - No mocking of cryptographic operations in tests; every test uses real
//!   keys from `testdata/keys`.
//! - Private material is never logged, serialized, or shown by `Debug`.

pub mod constants;
pub mod ecdsa;
pub mod ed25519;
pub mod key;
pub mod pem;
pub mod rsa;
pub mod signer;

pub use ecdsa::{EcdsaCurve, EcdsaSignerVerifier};
pub use ed25519::Ed25519SignerVerifier;
pub use key::{compute_key_id, load_key, Key, KeyType, KeyVal};
pub use self::pem::{parse_canonical_key, ParsedKey};
pub use self::rsa::{RsaPadding, RsaSignerVerifier};
pub use signer::{AnySignerVerifier, SignerVerifier};
