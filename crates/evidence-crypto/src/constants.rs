//! # Constants: Scheme Tags, PEM Labels, Algorithm OIDs
//!
//! Stateless tables shared by the key codec and the signer variants. The
//! scheme strings and hash algorithm list feed key-identifier derivation, so
//! changing any of them changes every key ID.

use evidence_core::DigestAlgorithm;
use pkcs8::ObjectIdentifier;

/// Signing convention of the RSA variant (RSASSA-PSS over SHA-256).
pub const RSA_SCHEME: &str = "rsassa-pss-sha256";
/// Signing convention of the ECDSA variant on P-256.
pub const ECDSA_P256_SCHEME: &str = "ecdsa-sha2-nistp256";
/// Signing convention of the ECDSA variant on P-384.
pub const ECDSA_P384_SCHEME: &str = "ecdsa-sha2-nistp384";
/// Signing convention of the Ed25519 variant.
pub const ED25519_SCHEME: &str = "ed25519";

/// Largest RSA modulus accepted, in bits.
pub const RSA_MAX_MODULUS_BITS: usize = 16384;

/// Hash algorithms advertised in `keyid_hash_algorithms` for loaded keys.
pub const KEYID_HASH_ALGORITHMS: [DigestAlgorithm; 2] =
    [DigestAlgorithm::Sha256, DigestAlgorithm::Sha512];

/// PEM label of a PKIX `SubjectPublicKeyInfo`.
pub const PUBLIC_KEY_PEM: &str = "PUBLIC KEY";
/// PEM label of a PKCS#1 RSA public key.
pub const RSA_PUBLIC_KEY_PEM: &str = "RSA PUBLIC KEY";
/// PEM label of an unencrypted PKCS#8 private key.
pub const PRIVATE_KEY_PEM: &str = "PRIVATE KEY";
/// PEM label of a PKCS#1 RSA private key.
pub const RSA_PRIVATE_KEY_PEM: &str = "RSA PRIVATE KEY";
/// PEM label of a SEC1 elliptic-curve private key.
pub const EC_PRIVATE_KEY_PEM: &str = "EC PRIVATE KEY";

/// rsaEncryption (RFC 8017).
pub const RSA_ENCRYPTION_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
/// id-ecPublicKey (RFC 5480).
pub const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// secp256r1 / NIST P-256.
pub const SECP256R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
/// secp384r1 / NIST P-384.
pub const SECP384R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
/// id-Ed25519 (RFC 8410).
pub const ED25519_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");
