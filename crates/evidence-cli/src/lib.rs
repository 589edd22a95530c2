//! # evidence-cli: DSSE Evidence Command-Line Interface
//!
//! Provides the `evidence` command on top of `evidence-dsse`. This crate
//! owns everything the engine leaves to its caller: reading key, envelope
//! and predicate files, resolving subjects against the local filesystem,
//! and writing results.
//!
//! ## Subcommands
//!
//! - `evidence verify`: Verify a DSSE envelope with a PEM key.
//! - `evidence sign`: Wrap a payload file in a signed envelope.
//! - `evidence statement`: Build an in-toto statement, optionally signed.
//! - `evidence key-id`: Print the securesystemslib key ID of a PEM key.
//!
//! ```bash
//! evidence verify --key cosign.pub --envelope build.dsse.json
//! evidence statement --subjects 'dist/app.tar' --predicate slsa.json \
//!     --predicate-type https://slsa.dev/provenance/v1 --key cosign.pem
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success, `1` when a signature or subject check fails, and `1`
//! with an error message for any other failure.

pub mod keys;
pub mod resolver;
pub mod sign;
pub mod statement;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};

/// Read a whole file, naming `what` in the error.
pub fn read_file(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {what}: {}", path.display()))
}

/// Write `bytes` to `output`, or to stdout followed by a newline.
pub fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("failed to write output: {}", path.display())),
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("failed to write to stdout")?;
            stdout.write_all(b"\n").context("failed to write to stdout")
        }
    }
}
