//! # wpass-crypto: Pass Signing and Packaging
//!
//! Implements [`wpass_core::PassSigner`] with real cryptography:
//!
//! - **Credentials** (`credentials.rs`): PEM/DER certificates and plain or
//!   passphrase-protected PKCS#8 signer keys.
//! - **Packaging** (`package.rs`): the SHA-1 `manifest.json` and the ZIP
//!   archive layout.
//! - **CMS** (`cms.rs`): the detached `SignedData` signature over
//!   `manifest.json`, and [`CmsPassSigner`] tying the steps together.
//!
//! ## Crate Policy
//!
//! - Depends only on `wpass-core` internally.
//! - Private keys are never serialized or logged.
//! - Tests sign with the real test credentials under `testdata/`; nothing
//!   cryptographic is mocked here.

pub mod cms;
pub mod credentials;
pub mod package;

pub use cms::CmsPassSigner;
pub use credentials::{parse_certificate, parse_private_key, SigningIdentity};
pub use package::{manifest_digests, sha1_hex, MANIFEST_JSON, SIGNATURE};
