//! # Statement Subcommand
//!
//! Builds an in-toto statement whose subjects are files under a base
//! directory. With `--key` the statement is signed into a DSSE envelope
//! with payload type `application/vnd.in-toto+json`; without it the bare
//! statement JSON is written.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use evidence_core::EvidenceError;
use evidence_dsse::{Statement, IN_TOTO_PAYLOAD_TYPE};

use crate::resolver::FsResolver;

/// Arguments for `evidence statement`.
#[derive(Args, Debug)]
pub struct StatementArgs {
    /// Subjects as `path[@sha256]`, separated by `;`.
    #[arg(long)]
    pub subjects: String,

    /// JSON file holding the predicate.
    #[arg(long)]
    pub predicate: PathBuf,

    /// Predicate type URI.
    #[arg(long)]
    pub predicate_type: String,

    /// Directory subject paths are relative to.
    #[arg(long, default_value = ".")]
    pub base_dir: PathBuf,

    /// PEM private key; when given, output a signed envelope.
    #[arg(long, env = "EVIDENCE_KEY")]
    pub key: Option<PathBuf>,

    /// Write the result here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Sign RSA keys with PKCS#1 v1.5 padding instead of PSS.
    #[arg(long, env = "EVIDENCE_LEGACY_RSA_PKCS1V15")]
    pub legacy_rsa_pkcs1v15: bool,
}

/// Execute `evidence statement`.
pub fn run_statement(args: &StatementArgs) -> Result<u8> {
    let statement = match build_statement(
        &args.predicate,
        &args.predicate_type,
        &args.subjects,
        &args.base_dir,
    ) {
        Ok(statement) => statement,
        Err(e) if is_digest_mismatch(&e) => {
            println!("FAIL: {e:#}");
            return Ok(1);
        }
        Err(e) => return Err(e),
    };
    let payload = statement.to_json().context("failed to serialize statement")?;

    let output = match &args.key {
        Some(key) => {
            let padding = crate::verify::rsa_padding(args.legacy_rsa_pkcs1v15);
            crate::sign::sign_bytes(key, IN_TOTO_PAYLOAD_TYPE, &payload, padding)?
                .to_json()
                .context("failed to serialize envelope")?
        }
        None => payload,
    };
    crate::write_output(args.output.as_deref(), &output)?;
    Ok(0)
}

/// Read the predicate and resolve subjects under `base_dir`.
pub fn build_statement(
    predicate_path: &Path,
    predicate_type: &str,
    subjects: &str,
    base_dir: &Path,
) -> Result<Statement> {
    let predicate = crate::read_file(predicate_path, "predicate")?;
    let mut statement = Statement::new(&predicate, predicate_type)
        .with_context(|| format!("invalid predicate: {}", predicate_path.display()))?;
    statement
        .set_subjects(&FsResolver::new(base_dir), subjects)
        .context("failed to resolve subjects")?;
    Ok(statement)
}

fn is_digest_mismatch(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<EvidenceError>(),
        Some(EvidenceError::DigestMismatch { .. })
    )
}
