//! # evidence CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use evidence_cli::keys::{run_key_id, KeyIdArgs};
use evidence_cli::sign::{run_sign, SignArgs};
use evidence_cli::statement::{run_statement, StatementArgs};
use evidence_cli::verify::{run_verify, VerifyArgs};

/// DSSE envelope signing and verification for in-toto evidence.
#[derive(Parser, Debug)]
#[command(name = "evidence", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify the first signature of a DSSE envelope.
    Verify(VerifyArgs),

    /// Sign a payload file into a DSSE envelope.
    Sign(SignArgs),

    /// Build an in-toto statement from local files, optionally signed.
    Statement(StatementArgs),

    /// Print the key ID of a PEM key.
    #[command(name = "key-id")]
    KeyId(KeyIdArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "evidence CLI starting");

    let result = match cli.command {
        Commands::Verify(args) => run_verify(&args),
        Commands::Sign(args) => run_sign(&args),
        Commands::Statement(args) => run_statement(&args),
        Commands::KeyId(args) => run_key_id(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
