//! # evidence-dsse: Envelopes, Statements, Verification
//!
//! The DSSE layer on top of `evidence-crypto`:
//!
//! - **PAE** (`pae.rs`): the pre-authentication encoding every DSSE
//!   signature covers.
//!
//! - **Envelope** (`envelope.rs`): the JSON wire form, base64 decoding, and
//!   single-signature envelope creation.
//!
//! - **Statement** (`statement.rs`, `resolver.rs`): in-toto statements whose
//!   subject digests come from an injected [`SubjectResolver`].
//!
//! - **Verification** (`verify.rs`): a typestate machine from parsed
//!   envelope to bound key to verified payload.
//!
//! ## Crate Policy
//!
//! - Depends on `evidence-core` and `evidence-crypto` internally.
//! - No I/O. Key and envelope bytes arrive from the caller, and subject
//!   lookup goes through the resolver trait.

pub mod envelope;
pub mod pae;
pub mod resolver;
pub mod statement;
pub mod verify;

pub use envelope::{Envelope, Signature};
pub use pae::pae;
pub use resolver::{DigestSet, ResolveError, SubjectResolver};
pub use statement::{Statement, Subject, IN_TOTO_PAYLOAD_TYPE, STATEMENT_TYPE};
pub use verify::{
    verify_envelope, verify_envelope_with, KeyBound, Loaded, Verification, VerifiedEnvelope,
    VerifyOptions,
};
