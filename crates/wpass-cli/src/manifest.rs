//! # Manifest and Validate Subcommands
//!
//! Both assemble `pass.json` without touching the credential files.
//! `manifest` prints it; `validate` checks it against the embedded schema
//! and prints each violation as `<instance path>: <message>`.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use wpass_core::{PassBuildRequest, PassBuilder, PassConfig};
use wpass_crypto::CmsPassSigner;
use wpass_schema::ManifestValidator;

use crate::input::PassInput;

/// Arguments for `wpass manifest`.
#[derive(Args, Debug)]
pub struct ManifestArgs {
    #[command(flatten)]
    pub input: PassInput,
}

/// Arguments for `wpass validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: PassInput,
}

/// Execute `wpass manifest`.
pub fn run_manifest(args: &ManifestArgs, config: &PassConfig, out: &mut impl Write) -> Result<u8> {
    let request = args.input.load()?;
    let manifest = preview(&request, config)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&manifest)?)?;
    Ok(0)
}

/// Execute `wpass validate`. Exit code 1 when the manifest has violations.
pub fn run_validate(args: &ValidateArgs, config: &PassConfig, out: &mut impl Write) -> Result<u8> {
    let validator = ManifestValidator::new().context("failed to load the pass schema")?;
    let request = args.input.load()?;
    let manifest = preview(&request, config)?;

    match validator.validate(&manifest) {
        Ok(()) => {
            writeln!(out, "OK: {} is valid", args.input.input.display())?;
            Ok(0)
        }
        Err(violations) => {
            for violation in &violations {
                writeln!(out, "  FAIL: {violation}")?;
            }
            writeln!(
                out,
                "\n{} violation(s) in {}",
                violations.len(),
                args.input.input.display()
            )?;
            Ok(1)
        }
    }
}

fn preview(request: &PassBuildRequest, config: &PassConfig) -> Result<Value> {
    let signer = CmsPassSigner::new();
    let manifest = PassBuilder::new(config, &signer).preview_manifest(request);
    serde_json::to_value(&manifest).context("failed to serialize pass.json")
}
