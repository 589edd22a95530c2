//! # Verify Subcommand
//!
//! Verifies a DSSE envelope file against a PEM key. Only the first
//! signature of the envelope is checked.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use evidence_core::EvidenceError;
use evidence_crypto::RsaPadding;
use evidence_dsse::{Verification, VerifiedEnvelope, VerifyOptions};

/// Arguments for `evidence verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// PEM key file (public or private).
    #[arg(long, env = "EVIDENCE_KEY")]
    pub key: PathBuf,

    /// DSSE envelope JSON file.
    #[arg(long, env = "EVIDENCE_ENVELOPE")]
    pub envelope: PathBuf,

    /// Check RSA signatures with PKCS#1 v1.5 padding instead of PSS.
    #[arg(long, env = "EVIDENCE_LEGACY_RSA_PKCS1V15")]
    pub legacy_rsa_pkcs1v15: bool,

    /// Print the verified payload to stdout.
    #[arg(long)]
    pub print_payload: bool,
}

impl VerifyArgs {
    /// Engine options selected by the flags.
    pub fn options(&self) -> VerifyOptions {
        VerifyOptions {
            rsa_padding: rsa_padding(self.legacy_rsa_pkcs1v15),
        }
    }
}

/// Map the legacy flag to a padding.
pub fn rsa_padding(legacy: bool) -> RsaPadding {
    if legacy {
        RsaPadding::LegacyPkcs1v15
    } else {
        RsaPadding::Pss
    }
}

/// Execute `evidence verify`.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    match cmd_verify(&args.key, &args.envelope, args.options()) {
        Ok(verified) => {
            println!(
                "OK: envelope verified (key {}, payload type {})",
                verified.key_id, verified.payload_type
            );
            if args.print_payload {
                crate::write_output(None, &verified.payload)?;
            }
            Ok(0)
        }
        Err(e) if is_signature_failure(&e) => {
            println!("FAIL: {e:#}");
            Ok(1)
        }
        Err(e) => Err(e),
    }
}

/// Read both files and run the verification engine.
pub fn cmd_verify(
    key_path: &Path,
    envelope_path: &Path,
    options: VerifyOptions,
) -> Result<VerifiedEnvelope> {
    let key_bytes = crate::read_file(key_path, "key")?;
    let envelope_bytes = crate::read_file(envelope_path, "envelope")?;

    let bound = Verification::load(&envelope_bytes)
        .with_context(|| format!("failed to load envelope: {}", envelope_path.display()))?
        .with_options(options)
        .bind_key(&key_bytes)
        .with_context(|| format!("failed to load key: {}", key_path.display()))?;
    bound
        .verify()
        .with_context(|| format!("envelope {} did not verify", envelope_path.display()))
}

fn is_signature_failure(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<EvidenceError>(),
        Some(EvidenceError::SignatureVerificationFailed)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    #[test]
    fn verifies_fixture_envelopes() {
        for (key, envelope) in [
            ("keys/rsa_public.pem", "envelopes/rsa.json"),
            ("keys/ecdsa_p384_public.pem", "envelopes/ecdsa_p384.json"),
            ("keys/ed25519_public.pem", "envelopes/ed25519.json"),
        ] {
            cmd_verify(
                &testdata::path(key),
                &testdata::path(envelope),
                VerifyOptions::default(),
            )
            .unwrap();
        }
    }

    #[test]
    fn wrong_key_is_a_signature_failure() {
        let err = cmd_verify(
            &testdata::path("keys/ecdsa_p256_public.pem"),
            &testdata::path("envelopes/ed25519.json"),
            VerifyOptions::default(),
        )
        .unwrap_err();
        assert!(is_signature_failure(&err));
    }

    #[test]
    fn legacy_flag_selects_pkcs1v15() {
        let args = VerifyArgs {
            key: testdata::path("keys/rsa_public.pem"),
            envelope: testdata::path("envelopes/rsa_pkcs1v15.json"),
            legacy_rsa_pkcs1v15: true,
            print_payload: false,
        };
        assert_eq!(args.options().rsa_padding, RsaPadding::LegacyPkcs1v15);
        assert_eq!(run_verify(&args).unwrap(), 0);

        let pss = VerifyArgs {
            legacy_rsa_pkcs1v15: false,
            ..args
        };
        assert_eq!(run_verify(&pss).unwrap(), 1);
    }

    #[test]
    fn malformed_envelope_is_an_error_not_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let envelope = dir.path().join("bad.json");
        std::fs::write(&envelope, "{").unwrap();
        let args = VerifyArgs {
            key: testdata::path("keys/ed25519_public.pem"),
            envelope,
            legacy_rsa_pkcs1v15: false,
            print_payload: false,
        };
        let err = run_verify(&args).unwrap_err();
        assert!(format!("{err:#}").contains("malformed envelope"));
    }
}
