//! # Sign Subcommand
//!
//! Wraps a payload file in a DSSE envelope signed with a PEM private key.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use evidence_crypto::{AnySignerVerifier, RsaPadding};
use evidence_dsse::{Envelope, IN_TOTO_PAYLOAD_TYPE};

use crate::keys::load_key_file;

/// Arguments for `evidence sign`.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// PEM private key file.
    #[arg(long, env = "EVIDENCE_KEY")]
    pub key: PathBuf,

    /// File whose bytes become the envelope payload.
    #[arg(long)]
    pub payload: PathBuf,

    /// Payload media type.
    #[arg(long, default_value = IN_TOTO_PAYLOAD_TYPE)]
    pub payload_type: String,

    /// Write the envelope here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Sign RSA keys with PKCS#1 v1.5 padding instead of PSS.
    #[arg(long, env = "EVIDENCE_LEGACY_RSA_PKCS1V15")]
    pub legacy_rsa_pkcs1v15: bool,
}

/// Execute `evidence sign`.
pub fn run_sign(args: &SignArgs) -> Result<u8> {
    let payload = crate::read_file(&args.payload, "payload")?;
    let padding = crate::verify::rsa_padding(args.legacy_rsa_pkcs1v15);
    let envelope = sign_bytes(&args.key, &args.payload_type, &payload, padding)?;
    let json = envelope.to_json().context("failed to serialize envelope")?;
    crate::write_output(args.output.as_deref(), &json)?;
    Ok(0)
}

/// Sign `payload` with the key at `key_path`.
pub fn sign_bytes(
    key_path: &Path,
    payload_type: &str,
    payload: &[u8],
    padding: RsaPadding,
) -> Result<Envelope> {
    let key = load_key_file(key_path)?;
    let signer = AnySignerVerifier::from_key_with_padding(&key, padding)
        .with_context(|| format!("failed to bind key: {}", key_path.display()))?;
    let envelope = Envelope::sign(&signer, payload_type, payload)
        .with_context(|| format!("failed to sign with key: {}", key_path.display()))?;
    tracing::info!(key_id = %key.key_id, payload_type, "created envelope");
    Ok(envelope)
}
