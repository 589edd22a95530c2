//! # Key ID Subcommand
//!
//! Loads a PEM key and prints its securesystemslib key ID, or with
//! `--json` the public key record other in-toto tools consume.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use evidence_crypto::{load_key, Key};

/// Arguments for `evidence key-id`.
#[derive(Args, Debug)]
pub struct KeyIdArgs {
    /// PEM key file (public or private).
    #[arg(long, env = "EVIDENCE_KEY")]
    pub key: PathBuf,

    /// Print the public key record as JSON instead of the bare ID.
    #[arg(long)]
    pub json: bool,
}

/// Execute `evidence key-id`.
pub fn run_key_id(args: &KeyIdArgs) -> Result<u8> {
    let key = load_key_file(&args.key)?;
    let rendered = render(&key, args.json)?;
    crate::write_output(None, rendered.as_bytes())?;
    Ok(0)
}

/// Load and canonicalize the PEM key at `path`.
pub fn load_key_file(path: &Path) -> Result<Key> {
    let bytes = crate::read_file(path, "key")?;
    load_key(&bytes).with_context(|| format!("failed to load key: {}", path.display()))
}

fn render(key: &Key, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(key).context("failed to serialize key record")
    } else {
        Ok(key.key_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    #[test]
    fn prints_key_id() {
        let key = load_key_file(&testdata::path("keys/ecdsa_p256_public.pem")).unwrap();
        assert_eq!(
            render(&key, false).unwrap(),
            "78e2df0667fcbf9abea9d6b55d6ea91709b07a66a1499e177d85359a473223e1"
        );
    }

    #[test]
    fn json_record_has_no_private_material() {
        let key = load_key_file(&testdata::path("keys/ed25519_private.pem")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&render(&key, true).unwrap()).unwrap();
        assert_eq!(json["keytype"], "ed25519");
        assert!(json["keyval"].get("private").is_none());
    }

    #[test]
    fn unreadable_key_reports_path() {
        let err = load_key_file(Path::new("/nonexistent/key.pem")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/key.pem"));
    }

    #[test]
    fn non_key_file_reports_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-key.pem");
        std::fs::write(&path, "hello").unwrap();
        let err = load_key_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid key encoding"));
    }
}
