//! # in-toto Statement
//!
//! The attestation payload carried inside an envelope:
//!
//! ```json
//! {"_type": "https://in-toto.io/Statement/v0.1",
//!  "subject": [{"uri": "...", "digest": {"sha256": "..."}}],
//!  "predicateType": "...",
//!  "predicate": { ... }}
//! ```
//!
//! The predicate is opaque and embedded byte for byte.
//!
//! ## Subject Resolution
//!
//! [`Statement::set_subjects`] takes `uri` or `uri@sha256` tokens separated
//! by `;`. Every subject is resolved through the injected
//! [`SubjectResolver`], and the resolved digest is the one recorded. A
//! digest given after `@` must equal the resolved digest exactly.

use evidence_core::{CanonicalizationError, EvidenceError, Result};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::resolver::{DigestSet, SubjectResolver};

/// `_type` of every statement produced here.
pub const STATEMENT_TYPE: &str = "https://in-toto.io/Statement/v0.1";

/// DSSE payload type for in-toto statements.
pub const IN_TOTO_PAYLOAD_TYPE: &str = "application/vnd.in-toto+json";

/// An artifact the statement makes claims about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Artifact reference.
    pub uri: String,
    /// Resolved digests.
    pub digest: DigestSet,
}

/// An in-toto attestation statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    /// Statement schema identifier.
    #[serde(rename = "_type")]
    pub statement_type: String,
    /// Subjects, in the order given.
    pub subject: Vec<Subject>,
    /// Predicate schema identifier.
    #[serde(rename = "predicateType")]
    pub predicate_type: String,
    /// Opaque predicate JSON.
    pub predicate: Box<RawValue>,
}

impl Statement {
    /// A statement with no subjects yet. `predicate` must be a JSON value.
    pub fn new(predicate: &[u8], predicate_type: &str) -> Result<Self> {
        let text = std::str::from_utf8(predicate).map_err(|e| {
            EvidenceError::InvalidEncoding(format!("predicate is not UTF-8: {e}"))
        })?;
        let predicate = RawValue::from_string(text.trim().to_string())
            .map_err(|e| EvidenceError::Canonicalization(CanonicalizationError::from(e)))?;
        Ok(Self {
            statement_type: STATEMENT_TYPE.to_string(),
            subject: Vec::new(),
            predicate_type: predicate_type.to_string(),
            predicate,
        })
    }

    /// Parse statement JSON, such as a verified envelope payload.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| EvidenceError::Canonicalization(CanonicalizationError::from(e)))
    }

    /// Replace the subjects with those named in `subjects`, resolving each.
    ///
    /// On error the statement is left unchanged.
    pub fn set_subjects(&mut self, resolver: &dyn SubjectResolver, subjects: &str) -> Result<()> {
        let requested = parse_subjects(subjects)?;
        let mut resolved = Vec::with_capacity(requested.len());

        for (uri, declared) in requested {
            let digest = resolver
                .resolve(uri)
                .map_err(|source| EvidenceError::Resolution {
                    uri: uri.to_string(),
                    source,
                })?;
            if digest.sha256.is_empty() {
                return Err(EvidenceError::InvalidSubject(format!(
                    "resolver returned no sha256 for {uri}"
                )));
            }
            if let Some(declared) = declared {
                if declared != digest.sha256 {
                    return Err(EvidenceError::DigestMismatch {
                        uri: uri.to_string(),
                        declared: declared.to_string(),
                        resolved: digest.sha256,
                    });
                }
            }
            tracing::debug!(uri, sha256 = %digest.sha256, "resolved subject");
            resolved.push(Subject {
                uri: uri.to_string(),
                digest,
            });
        }

        self.subject = resolved;
        Ok(())
    }

    /// Compact JSON with fields in declaration order.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| EvidenceError::Canonicalization(CanonicalizationError::from(e)))
    }
}

/// Split `uri[@sha256];...` into `(uri, declared digest)` pairs.
fn parse_subjects(subjects: &str) -> Result<Vec<(&str, Option<&str>)>> {
    subjects
        .split(';')
        .map(|token| {
            let token = token.trim();
            let (uri, declared) = match token.split_once('@') {
                Some((uri, digest)) => (uri, Some(digest).filter(|d| !d.is_empty())),
                None => (token, None),
            };
            if uri.is_empty() {
                return Err(EvidenceError::InvalidSubject(format!(
                    "empty uri in subject {token:?}"
                )));
            }
            Ok((uri, declared))
        })
        .collect()
}
