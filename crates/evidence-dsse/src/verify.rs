//! # Verification Typestate Machine
//!
//! Verifying an envelope moves through distinct types, so a signature
//! check cannot run before a key is bound:
//!
//! ```text
//! Verification<Loaded> ──bind_key()/bind_signer()──▶ Verification<KeyBound>
//!                                                         │
//!                                                     verify()
//!                                                         │
//!                                     VerifiedEnvelope ◀──┴──▶ EvidenceError
//! ```
//!
//! - `Loaded`: the envelope JSON parsed (`MalformedEnvelope` otherwise).
//! - `KeyBound`: the key loaded, canonicalized, and bound to the
//!   signer/verifier matching its type (`InvalidEncoding`,
//!   `UnsupportedKeyType`).
//! - `verify()`: PAE over the payload type and decoded payload, checked
//!   against the first signature. Failure is `SignatureVerificationFailed`.
//!
//! ## Single Signature
//!
//! Only `signatures[0]` is checked. Additional entries are never evaluated,
//! and an envelope whose only valid signature is not the first one fails.
//! The `keyid` on the signature is informational and not matched against
//! the bound key.
//!
//! ```compile_fail
//! use evidence_dsse::verify::Verification;
//!
//! let loaded = Verification::load(b"{}").unwrap();
//! // ERROR: no method named `verify` found for `Verification<Loaded>`
//! let _ = loaded.verify();
//! ```

use evidence_core::Result;
use evidence_crypto::{load_key, AnySignerVerifier, RsaPadding, SignerVerifier};

use crate::envelope::Envelope;
use crate::pae::pae;
use crate::statement::Statement;

// ─── State Types ─────────────────────────────────────────────────────

/// Verification state: envelope parsed, no key yet.
#[derive(Debug)]
pub struct Loaded;

/// Verification state: a signer/verifier is bound.
#[derive(Debug)]
pub struct KeyBound {
    signer: AnySignerVerifier,
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Loaded {}
    impl Sealed for super::KeyBound {}
}

/// Marker trait for verification states. Sealed.
pub trait VerificationState: private::Sealed + std::fmt::Debug {
    /// State name for logs.
    fn name() -> &'static str;
}

impl VerificationState for Loaded {
    fn name() -> &'static str {
        "LOADED"
    }
}

impl VerificationState for KeyBound {
    fn name() -> &'static str {
        "KEY_BOUND"
    }
}

// ─── Options ─────────────────────────────────────────────────────────

/// Caller-selected verification behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Padding applied when the bound key is RSA. Defaults to PSS; the
    /// legacy PKCS#1 v1.5 padding is used only when set here.
    pub rsa_padding: RsaPadding,
}

// ─── Outcome ─────────────────────────────────────────────────────────

/// A successfully verified envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedEnvelope {
    /// ID of the key that verified the signature.
    pub key_id: String,
    /// Payload type covered by the signature.
    pub payload_type: String,
    /// Decoded payload bytes.
    pub payload: Vec<u8>,
}

impl VerifiedEnvelope {
    /// Parse the payload as an in-toto statement.
    pub fn statement(&self) -> Result<Statement> {
        Statement::from_json(&self.payload)
    }
}

// ─── The Machine ─────────────────────────────────────────────────────

/// An envelope on its way through verification, parameterized by state.
#[derive(Debug)]
pub struct Verification<S: VerificationState> {
    envelope: Envelope,
    options: VerifyOptions,
    state: S,
}

impl<S: VerificationState> Verification<S> {
    /// The parsed envelope.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Current state name.
    pub fn state_name(&self) -> &'static str {
        S::name()
    }

    fn transition_to<T: VerificationState>(self, state: T) -> Verification<T> {
        tracing::debug!(from = S::name(), to = T::name(), "verification transition");
        Verification {
            envelope: self.envelope,
            options: self.options,
            state,
        }
    }
}

impl Verification<Loaded> {
    /// Parse envelope JSON.
    pub fn load(envelope_bytes: &[u8]) -> Result<Self> {
        let envelope = Envelope::from_json(envelope_bytes)?;
        tracing::debug!(
            payload_type = %envelope.payload_type,
            signatures = envelope.signatures.len(),
            "loaded envelope"
        );
        Ok(Self {
            envelope,
            options: VerifyOptions::default(),
            state: Loaded,
        })
    }

    /// Apply `options` to the key bound next.
    pub fn with_options(mut self, options: VerifyOptions) -> Self {
        self.options = options;
        self
    }

    /// Load PEM key bytes and bind the matching signer/verifier.
    pub fn bind_key(self, key_bytes: &[u8]) -> Result<Verification<KeyBound>> {
        let key = load_key(key_bytes)?;
        let signer = AnySignerVerifier::from_key_with_padding(&key, self.options.rsa_padding)?;
        Ok(self.bind_signer(signer))
    }

    /// Bind an already constructed signer/verifier as is.
    pub fn bind_signer(self, signer: AnySignerVerifier) -> Verification<KeyBound> {
        tracing::debug!(
            key_id = %signer.key_id(),
            key_type = %signer.key_type(),
            "bound verification key"
        );
        self.transition_to(KeyBound { signer })
    }
}

impl Verification<KeyBound> {
    /// The bound signer/verifier.
    pub fn signer(&self) -> &AnySignerVerifier {
        &self.state.signer
    }

    /// Check the first signature over the envelope's PAE.
    pub fn verify(self) -> Result<VerifiedEnvelope> {
        let payload = self.envelope.decode_payload()?;
        let (sig_key_id, signature) = self.envelope.first_signature()?;
        let signer = &self.state.signer;

        if self.envelope.signatures.len() > 1 {
            tracing::warn!(
                signatures = self.envelope.signatures.len(),
                "envelope carries several signatures; only the first is checked"
            );
        }
        if !sig_key_id.is_empty() && sig_key_id != signer.key_id() {
            tracing::debug!(
                envelope_key_id = %sig_key_id,
                key_id = %signer.key_id(),
                "signature keyid differs from the bound key"
            );
        }

        let message = pae(&self.envelope.payload_type, &payload);
        if let Err(e) = signer.verify(&message, &signature) {
            tracing::warn!(
                key_id = %signer.key_id(),
                payload_type = %self.envelope.payload_type,
                "envelope signature did not verify"
            );
            return Err(e);
        }

        tracing::debug!(
            key_id = %signer.key_id(),
            payload_type = %self.envelope.payload_type,
            "envelope verified"
        );
        Ok(VerifiedEnvelope {
            key_id: signer.key_id().to_string(),
            payload_type: self.envelope.payload_type.clone(),
            payload,
        })
    }
}

/// Verify `envelope_bytes` with the PEM key in `key_bytes`, using PSS for
/// RSA keys.
pub fn verify_envelope(key_bytes: &[u8], envelope_bytes: &[u8]) -> Result<VerifiedEnvelope> {
    verify_envelope_with(key_bytes, envelope_bytes, VerifyOptions::default())
}

/// [`verify_envelope`] with explicit options.
pub fn verify_envelope_with(
    key_bytes: &[u8],
    envelope_bytes: &[u8],
    options: VerifyOptions,
) -> Result<VerifiedEnvelope> {
    Verification::load(envelope_bytes)?
        .with_options(options)
        .bind_key(key_bytes)?
        .verify()
}
