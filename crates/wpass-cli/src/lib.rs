//! # wpass-cli: Wallet Pass Command-Line Interface
//!
//! Runs the pass pipeline from the terminal, against the same environment
//! configuration the API uses.
//!
//! ## Subcommands
//!
//! - `check`: certificate precondition status
//! - `manifest`: print the `pass.json` a build would sign
//! - `validate`: assemble and check `pass.json` against the schema
//! - `build`: full signed build written to a `.pkpass` file
//!
//! ## Exit Codes
//!
//! `0` success, `1` the check or validation found problems, `2` the command
//! could not run (unreadable input, missing credentials, signing failure).
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to the domain crates and write to a caller-supplied
//!   writer, so their output can be tested.

pub mod build;
pub mod check;
pub mod input;
pub mod manifest;
