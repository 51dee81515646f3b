//! # wpass-schema: Manifest Schema Validation
//!
//! Advisory JSON Schema validation of assembled `pass.json` documents.
//!
//! The assembler never rejects input: malformed colors or keys pass through
//! to the signer. This crate catches the problems the wallet apps would
//! reject later, so they can be logged at build time or reported by the CLI.
//!
//! - [`ManifestValidator::validate`] returns every [`SchemaViolation`].
//! - [`ManifestValidator`] implements [`wpass_core::ManifestInspector`], so it
//!   can be attached to a build with `PassBuilder::with_inspector`.
//!
//! ## Crate Policy
//!
//! - Depends only on `wpass-core` internally.
//! - The schema is embedded at compile time; no files are read at runtime.

pub mod validate;

pub use validate::{ManifestValidator, SchemaError, SchemaViolation, PASS_SCHEMA};
