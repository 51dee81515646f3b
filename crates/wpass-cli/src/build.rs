//! # Build Subcommand
//!
//! Runs the full orchestrated build, signing with the configured
//! credentials, and writes the `.pkpass` archive.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use wpass_core::{PassBuilder, PassConfig, PassSigner};
use wpass_schema::ManifestValidator;

use crate::input::PassInput;

/// Arguments for `wpass build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub input: PassInput,

    /// Output path. Defaults to `pass-<unix-millis>.pkpass` in the current
    /// directory.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Execute `wpass build`.
pub fn run_build(
    args: &BuildArgs,
    config: &PassConfig,
    signer: &dyn PassSigner,
    out: &mut impl Write,
) -> Result<u8> {
    let request = args.input.load()?;
    let validator = ManifestValidator::new().context("failed to load the pass schema")?;

    let pass = PassBuilder::new(config, signer)
        .with_inspector(&validator)
        .build(&request)
        .context("build failed")?;

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(pass.file_name("pass")));
    std::fs::write(&path, &pass.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;

    writeln!(
        out,
        "{} ({}, serial {}, {} bytes)",
        path.display(),
        pass.pass_type,
        pass.serial,
        pass.bytes.len()
    )?;
    Ok(0)
}
