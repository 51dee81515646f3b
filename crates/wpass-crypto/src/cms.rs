//! # CMS Pass Signer
//!
//! The production [`PassSigner`]. For each bundle it:
//!
//! 1. parses the credentials into a [`SigningIdentity`],
//! 2. computes `manifest.json` (SHA-1 digest of every file),
//! 3. signs the `manifest.json` bytes as a detached CMS `SignedData`
//!    (DER), signed by the signer certificate and carrying the WWDR
//!    certificate,
//! 4. writes the ZIP archive.
//!
//! Credentials are parsed per call, matching the per-request file reads of
//! the orchestrator. Nothing is cached between builds.

use cryptographic_message_syntax::{SignedDataBuilder, SignerBuilder};
use wpass_core::{Credentials, PassBundle, PassSigner, SignerError};

use crate::credentials::SigningIdentity;
use crate::package::{manifest_json, write_archive};

/// Signs pass bundles with CMS and packages them as `.pkpass` archives.
#[derive(Debug, Default, Clone, Copy)]
pub struct CmsPassSigner;

impl CmsPassSigner {
    pub fn new() -> Self {
        Self
    }

    /// Produce the detached DER signature over `content`.
    pub fn detached_signature(
        &self,
        identity: &SigningIdentity,
        content: &[u8],
    ) -> Result<Vec<u8>, SignerError> {
        SignedDataBuilder::default()
            .content_external(content.to_vec())
            .certificate(identity.wwdr.clone())
            .signer(SignerBuilder::new(
                &identity.signing_key,
                identity.signer_cert.clone(),
            ))
            .build_der()
            .map_err(|e| SignerError::Signature(e.to_string()))
    }
}

impl PassSigner for CmsPassSigner {
    fn sign(&self, bundle: &PassBundle, credentials: &Credentials) -> Result<Vec<u8>, SignerError> {
        let identity = SigningIdentity::from_credentials(credentials)?;
        let manifest = manifest_json(bundle)?;
        let signature = self.detached_signature(&identity, &manifest)?;
        let archive = write_archive(bundle, &manifest, &signature)?;
        tracing::debug!(
            files = bundle.assets.len() + 1,
            signature_bytes = signature.len(),
            archive_bytes = archive.len(),
            "bundle signed"
        );
        Ok(archive)
    }
}
