//! # Check Subcommand
//!
//! Prints the certificate precondition status as `{"valid": .., "message": ..}`.

use std::io::Write;

use anyhow::Result;
use wpass_core::{check_certificates, PassConfig};

/// Execute `wpass check`. Exit code 1 when a credential file is missing.
pub fn run_check(config: &PassConfig, out: &mut impl Write) -> Result<u8> {
    let status = check_certificates(&config.certificates);
    writeln!(out, "{}", serde_json::to_string_pretty(&status)?)?;
    Ok(if status.valid { 0 } else { 1 })
}
