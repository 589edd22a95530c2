//! # Subject Resolution
//!
//! Statement construction asks an injected [`SubjectResolver`] for the
//! digest of every subject. The engine performs no I/O of its own; the
//! resolver is where a caller attaches artifact lookup, timeouts, and
//! caching.

use serde::{Deserialize, Serialize};

/// Boxed error returned by resolvers.
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

/// Digests recorded for a subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestSet {
    /// Lowercase hex SHA-256.
    pub sha256: String,
}

impl DigestSet {
    /// A digest set holding only a SHA-256 value.
    pub fn sha256(hex: impl Into<String>) -> Self {
        Self { sha256: hex.into() }
    }
}

/// Look up the digests of an artifact by URI.
pub trait SubjectResolver {
    /// Resolve `uri`. Errors are propagated as is and never retried.
    fn resolve(&self, uri: &str) -> Result<DigestSet, ResolveError>;
}

impl<F> SubjectResolver for F
where
    F: Fn(&str) -> Result<DigestSet, ResolveError>,
{
    fn resolve(&self, uri: &str) -> Result<DigestSet, ResolveError> {
        self(uri)
    }
}
