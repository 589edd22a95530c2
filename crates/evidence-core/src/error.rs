//! # Error Types: Structured Error Hierarchy
//!
//! Every failure the signing and verification engine can report is a
//! distinct `EvidenceError` variant. Nothing is retried internally; errors
//! propagate to the caller unchanged.
//!
//! ## Design
//!
//! - Signature checks collapse to a single `SignatureVerificationFailed`
//!   kind that carries no detail about which check failed.
//! - Construction errors (`InvalidEncoding`, `UnsupportedKeyType`,
//!   `MalformedEnvelope`) abort before any signing or verification primitive
//!   runs.

use thiserror::Error;

/// Top-level error type for DSSE evidence operations.
#[derive(Error, Debug)]
pub enum EvidenceError {
    /// Key bytes are not a recognizable PEM-encapsulated key structure.
    #[error("invalid key encoding: {0}")]
    InvalidEncoding(String),

    /// The key decodes but belongs to an algorithm family (or curve)
    /// outside the supported set.
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// A signing operation was requested on a key without private material.
    #[error("the key does not contain private material")]
    NotPrivateKey,

    /// The signing primitive itself rejected the operation.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The signature does not verify against the bound key.
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// The envelope JSON or one of its base64 fields could not be decoded,
    /// or it carries no signatures.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// A caller-declared subject digest disagrees with the resolved one.
    #[error("provided sha256 for {uri} ({declared}) does not match the resolved sha256 ({resolved})")]
    DigestMismatch {
        /// Subject URI.
        uri: String,
        /// Digest supplied by the caller.
        declared: String,
        /// Digest returned by the resolver.
        resolved: String,
    },

    /// A statement subject token is unusable.
    #[error("invalid subject: {0}")]
    InvalidSubject(String),

    /// The subject resolver failed. The source error is kept intact.
    #[error("failed to resolve subject {uri}: {source}")]
    Resolution {
        /// Subject URI that was being resolved.
        uri: String,
        /// Error reported by the resolver.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Canonical or plain JSON serialization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values have no canonical encoding.
    #[error("float values are not permitted in canonical JSON: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_mismatch_display() {
        let err = EvidenceError::DigestMismatch {
            uri: "pkg/app.tar".to_string(),
            declared: "deadbeef".to_string(),
            resolved: "cafef00d".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pkg/app.tar"));
        assert!(msg.contains("deadbeef"));
        assert!(msg.contains("cafef00d"));
    }

    #[test]
    fn verification_failure_carries_no_detail() {
        assert_eq!(
            EvidenceError::SignatureVerificationFailed.to_string(),
            "signature verification failed"
        );
    }

    #[test]
    fn resolution_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = EvidenceError::Resolution {
            uri: "a".to_string(),
            source: Box::new(io_err),
        };
        assert!(err.to_string().contains("file missing"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn canonicalization_from_conversion() {
        let err = EvidenceError::from(CanonicalizationError::FloatRejected(0.5));
        assert!(matches!(err, EvidenceError::Canonicalization(_)));
    }
}
