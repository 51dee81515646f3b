//! # Manifest Validation
//!
//! Validates an assembled `pass.json` against the embedded JSON Schema
//! (Draft 2020-12) in `schemas/pass.schema.json`.
//!
//! The schema encodes the constraints the signer and the wallet apps care
//! about and the assembler deliberately does not enforce:
//!
//! - required identity keys, with a non-empty team identifier
//! - exactly one style key (`eventTicket`, `boardingPass`, ...)
//! - non-empty field keys and known enum names for alignment, styles,
//!   barcode formats, and transit types
//! - `#RRGGBB` or `rgb(r, g, b)` colors
//!
//! Validation is advisory. Builds log violations and continue; the CLI
//! `validate` command turns them into a failing exit status.

use std::fmt;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;
use wpass_core::ManifestInspector;

/// The embedded `pass.json` schema.
pub const PASS_SCHEMA: &str = include_str!("../schemas/pass.schema.json");

/// Error building the validator.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The embedded schema is not valid JSON.
    #[error("schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The schema could not be compiled.
    #[error("schema could not be compiled: {0}")]
    Compile(String),
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON Pointer to the violating value; empty for the document root.
    pub instance_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Compiled validator for `pass.json` documents.
///
/// `Send + Sync`; compile once and share.
pub struct ManifestValidator {
    validator: Validator,
}

impl fmt::Debug for ManifestValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestValidator").finish_non_exhaustive()
    }
}

impl ManifestValidator {
    /// Compile the embedded schema.
    pub fn new() -> Result<Self, SchemaError> {
        let schema: Value = serde_json::from_str(PASS_SCHEMA)?;
        Self::from_schema(&schema)
    }

    /// Compile an arbitrary schema value.
    pub fn from_schema(schema: &Value) -> Result<Self, SchemaError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let validator = opts.build(schema).map_err(|e| {
            tracing::error!(error = %e, "manifest schema failed to compile");
            SchemaError::Compile(e.to_string())
        })?;
        Ok(Self { validator })
    }

    /// Validate a manifest, returning every violation found.
    pub fn validate(&self, manifest: &Value) -> Result<(), Vec<SchemaViolation>> {
        let violations: Vec<SchemaViolation> = self
            .validator
            .iter_errors(manifest)
            .map(|e| SchemaViolation {
                instance_path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// True if the manifest has no violations.
    pub fn is_valid(&self, manifest: &Value) -> bool {
        self.validator.is_valid(manifest)
    }
}

impl ManifestInspector for ManifestValidator {
    fn inspect(&self, manifest: &Value) -> Vec<String> {
        match self.validate(manifest) {
            Ok(()) => Vec::new(),
            Err(violations) => {
                tracing::debug!(count = violations.len(), "manifest schema violations");
                violations.iter().map(ToString::to_string).collect()
            }
        }
    }
}
