//! # wpass CLI entry point
//!
//! Parses command-line arguments, loads the pass configuration from the
//! environment once, and dispatches to the subcommand handlers.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wpass_cli::build::{run_build, BuildArgs};
use wpass_cli::check::run_check;
use wpass_cli::manifest::{run_manifest, run_validate, ManifestArgs, ValidateArgs};
use wpass_core::PassConfig;
use wpass_crypto::CmsPassSigner;

/// Wallet pass toolchain.
///
/// Checks signing credentials, previews and validates `pass.json`, and
/// builds signed `.pkpass` archives. Configuration comes from the same
/// environment variables as the HTTP service.
#[derive(Parser, Debug)]
#[command(name = "wpass", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the signing credential files are present.
    Check,

    /// Print the pass.json a build would sign.
    Manifest(ManifestArgs),

    /// Assemble pass.json and check it against the schema.
    Validate(ValidateArgs),

    /// Build and sign a .pkpass archive.
    Build(BuildArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = PassConfig::from_env()
        .context("invalid pass configuration")
        .and_then(|config| {
            tracing::debug!(?config, "configuration loaded");
            let mut stdout = std::io::stdout().lock();
            match &cli.command {
                Commands::Check => run_check(&config, &mut stdout),
                Commands::Manifest(args) => run_manifest(args, &config, &mut stdout),
                Commands::Validate(args) => run_validate(args, &config, &mut stdout),
                Commands::Build(args) => run_build(args, &config, &CmsPassSigner::new(), &mut stdout),
            }
        });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
