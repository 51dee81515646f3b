//! # Mock Signer
//!
//! Credential-agnostic signers for tests and dry runs.
//!
//! [`MockSigner`] does no cryptography. Its output is a plain-text listing
//! of the bundle (`<name> <length>` lines followed by the
//! `pass.json` text), so tests can assert on what reached the signer.
//! [`FailingSigner`] always fails with a fixed message.

use crate::certificates::Credentials;
use crate::signer::{PassBundle, PassSigner, SignerError};

/// Signer that echoes the bundle instead of signing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockSigner;

impl PassSigner for MockSigner {
    fn sign(&self, bundle: &PassBundle, _credentials: &Credentials) -> Result<Vec<u8>, SignerError> {
        let mut out = Vec::new();
        for (name, bytes) in bundle.files() {
            out.extend_from_slice(format!("{name} {}\n", bytes.len()).as_bytes());
        }
        out.push(b'\n');
        out.extend_from_slice(&bundle.pass_json);
        Ok(out)
    }
}

/// Signer that rejects every bundle.
#[derive(Debug, Clone)]
pub struct FailingSigner {
    pub message: String,
}

impl FailingSigner {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl PassSigner for FailingSigner {
    fn sign(&self, _bundle: &PassBundle, _credentials: &Credentials) -> Result<Vec<u8>, SignerError> {
        Err(SignerError::Credentials(self.message.clone()))
    }
}
