//! # evidence-core: Foundational Types for DSSE Evidence
//!
//! Leaf crate of the workspace. Every other `evidence-*` crate depends on
//! it; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Key identifiers are digests over the
//!    securesystemslib canonical JSON encoding. The only way to obtain those
//!    bytes is `CanonicalBytes::new()`, so no code path can hash a
//!    `serde_json::to_vec()` rendering by mistake.
//!
//! 2. **One error enum.** `EvidenceError` carries every failure kind the
//!    signing and verification engine can report. Callers match on kinds,
//!    not on message strings.
//!
//! 3. **No I/O.** Everything here is pure computation over in-memory bytes.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod hex;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, EvidenceError};

/// Result alias used across the workspace.
pub type Result<T, E = EvidenceError> = std::result::Result<T, E>;
