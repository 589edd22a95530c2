//! # DSSE Envelope
//!
//! Wire form:
//!
//! ```json
//! {"payload": "<base64>", "payloadType": "<type>",
//!  "signatures": [{"keyid": "<id>", "sig": "<base64>"}]}
//! ```
//!
//! Both base64 fields use the standard alphabet with padding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use evidence_core::{CanonicalizationError, EvidenceError, Result};
use evidence_crypto::SignerVerifier;
use serde::{Deserialize, Serialize};

use crate::pae::pae;

/// One signature over the envelope's PAE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// ID of the signing key. May be empty.
    #[serde(default)]
    pub keyid: String,
    /// Base64 signature bytes.
    pub sig: String,
}

/// A DSSE envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64 payload bytes.
    pub payload: String,
    /// Media type of the payload.
    #[serde(rename = "payloadType")]
    pub payload_type: String,
    /// Signatures; only the first is consulted by the verifier.
    #[serde(default)]
    pub signatures: Vec<Signature>,
}

impl Envelope {
    /// Parse envelope JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| EvidenceError::MalformedEnvelope(format!("invalid envelope JSON: {e}")))
    }

    /// Pretty-printed envelope JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| EvidenceError::Canonicalization(CanonicalizationError::from(e)))
    }

    /// Sign `payload` under `payload_type`, producing a single-signature
    /// envelope attributed to the signer's key ID.
    pub fn sign(signer: &dyn SignerVerifier, payload_type: &str, payload: &[u8]) -> Result<Self> {
        let sig = signer.sign(&pae(payload_type, payload))?;
        tracing::debug!(
            key_id = %signer.key_id(),
            payload_type,
            payload_len = payload.len(),
            "signed envelope"
        );
        Ok(Self {
            payload: STANDARD.encode(payload),
            payload_type: payload_type.to_string(),
            signatures: vec![Signature {
                keyid: signer.key_id().to_string(),
                sig: STANDARD.encode(sig),
            }],
        })
    }

    /// Decoded payload bytes.
    pub fn decode_payload(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.payload)
            .map_err(|e| EvidenceError::MalformedEnvelope(format!("payload is not base64: {e}")))
    }

    /// Key ID and decoded bytes of the first signature.
    pub fn first_signature(&self) -> Result<(&str, Vec<u8>)> {
        let first = self.signatures.first().ok_or_else(|| {
            EvidenceError::MalformedEnvelope("envelope carries no signatures".to_string())
        })?;
        let sig = STANDARD.decode(&first.sig).map_err(|e| {
            EvidenceError::MalformedEnvelope(format!("signature is not base64: {e}"))
        })?;
        Ok((first.keyid.as_str(), sig))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidence_crypto::{load_key, AnySignerVerifier};

    const ED25519_PRIVATE: &str = include_str!("../../../testdata/keys/ed25519_private.pem");

    fn ed25519() -> AnySignerVerifier {
        AnySignerVerifier::from_key(&load_key(ED25519_PRIVATE.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn parses_wire_form() {
        let env = Envelope::from_json(
            br#"{"payload":"aGk=","payloadType":"text/plain","signatures":[{"keyid":"k","sig":"AAE="}]}"#,
        )
        .unwrap();
        assert_eq!(env.payload_type, "text/plain");
        assert_eq!(env.decode_payload().unwrap(), b"hi");
        let (keyid, sig) = env.first_signature().unwrap();
        assert_eq!(keyid, "k");
        assert_eq!(sig, vec![0, 1]);
    }

    #[test]
    fn serializes_camel_case_type() {
        let env = Envelope::sign(&ed25519(), "text/plain", b"hi").unwrap();
        let json: serde_json::Value = serde_json::from_slice(&env.to_json().unwrap()).unwrap();
        assert_eq!(json["payloadType"], "text/plain");
        assert_eq!(json["payload"], "aGk=");
        assert_eq!(json["signatures"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn signed_envelope_carries_signer_key_id() {
        let signer = ed25519();
        let env = Envelope::sign(&signer, "text/plain", b"hi").unwrap();
        let (keyid, sig) = env.first_signature().unwrap();
        assert_eq!(keyid, signer.key_id());
        signer.verify(&pae("text/plain", b"hi"), &sig).unwrap();
    }

    #[test]
    fn invalid_json_is_malformed() {
        for input in [&b"{"[..], b"[]", br#"{"payload":"aGk="}"#] {
            let err = Envelope::from_json(input).unwrap_err();
            assert!(matches!(err, EvidenceError::MalformedEnvelope(_)));
        }
    }

    #[test]
    fn empty_signatures_is_malformed() {
        let env = Envelope::from_json(br#"{"payload":"","payloadType":"t","signatures":[]}"#).unwrap();
        assert!(matches!(
            env.first_signature().unwrap_err(),
            EvidenceError::MalformedEnvelope(_)
        ));
    }

    #[test]
    fn bad_base64_is_malformed() {
        let env = Envelope::from_json(
            br#"{"payload":"not base64!","payloadType":"t","signatures":[{"keyid":"","sig":"%%"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            env.decode_payload().unwrap_err(),
            EvidenceError::MalformedEnvelope(_)
        ));
        assert!(matches!(
            env.first_signature().unwrap_err(),
            EvidenceError::MalformedEnvelope(_)
        ));
    }

    #[test]
    fn public_key_cannot_sign_envelope() {
        let public = load_key(include_bytes!("../../../testdata/keys/ed25519_public.pem")).unwrap();
        let sv = AnySignerVerifier::from_key(&public).unwrap();
        let err = Envelope::sign(&sv, "t", b"x").unwrap_err();
        assert!(matches!(err, EvidenceError::NotPrivateKey));
    }
}
