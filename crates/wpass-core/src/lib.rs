//! # wpass-core: Wallet Pass Assembly
//!
//! Turns user-designed pass data into the manifest and image set of a wallet
//! pass, checks the signing preconditions, and drives one build through the
//! signer.
//!
//! ## Components
//!
//! - **Normalizer** (`normalize.rs`): colors, alignment, date styles, dates.
//! - **Field Mapper** (`fields.rs`): the ordered field groups of a pass.
//! - **Barcode Resolver** (`barcode.rs`): the optional barcode descriptor.
//! - **Manifest Assembler** (`manifest.rs`): the complete `pass.json`.
//! - **Certificate Checker** (`certificates.rs`): credential file presence.
//! - **Asset Resolver** (`assets.rs`): inline images and the placeholder icon.
//! - **Orchestrator** (`build.rs`): check, assemble, resolve, sign.
//!
//! Signing itself is behind the [`PassSigner`] trait; `wpass-crypto` provides
//! the production implementation.
//!
//! ## Crate Policy
//!
//! - Leaf of the workspace DAG: no dependencies on other `wpass-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.
//! - No shared mutable state between builds other than the serial counter.

pub mod assets;
pub mod barcode;
pub mod build;
pub mod certificates;
pub mod config;
pub mod data;
pub mod error;
pub mod fields;
pub mod manifest;
pub mod mock;
pub mod normalize;
pub mod pass_type;
pub mod serial;
pub mod signer;

pub use assets::{resolve_assets, AssetSet};
pub use barcode::{resolve_barcode, BarcodeDescriptor, BarcodeFormat};
pub use build::{BuildState, PassBuildRequest, PassBuilder, SignedPass};
pub use certificates::{check_certificates, load_credentials, CertificatePaths, CertificateStatus, Credentials};
pub use config::PassConfig;
pub use data::{CustomField, PassData};
pub use error::{BuildError, ConfigError, ErrorKind};
pub use fields::{map_fields, Field, FieldGroups};
pub use manifest::{assemble, assemble_pass, BuildContext, Manifest, PassStyle};
pub use pass_type::PassType;
pub use serial::SerialNumber;
pub use signer::{ManifestInspector, PassBundle, PassSigner, SignerError, PASS_JSON};
