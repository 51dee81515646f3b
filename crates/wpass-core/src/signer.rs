//! # Signer Interface
//!
//! Defines the seam between the build orchestrator and the collaborator that
//! signs and packages a pass. The orchestrator hands over a [`PassBundle`]
//! (the `pass.json` bytes plus the named image buffers) and the raw
//! [`Credentials`]; the signer returns the finished archive bytes.
//!
//! Implementations must be `Send + Sync` so one instance can serve
//! concurrent builds. The production implementation lives in `wpass-crypto`;
//! [`crate::mock::MockSigner`] is a credential-free stand-in for tests.
//!
//! A second seam, [`ManifestInspector`], lets callers attach advisory checks
//! of the assembled manifest. Findings are logged and never fail a build.

use thiserror::Error;

use crate::assets::AssetSet;
use crate::certificates::Credentials;

/// Fixed filename of the manifest inside a pass archive.
pub const PASS_JSON: &str = "pass.json";

/// Error raised by a signer.
#[derive(Error, Debug)]
pub enum SignerError {
    /// A certificate or key could not be parsed or decrypted.
    #[error("invalid credentials: {0}")]
    Credentials(String),

    /// The signature could not be produced.
    #[error("signature error: {0}")]
    Signature(String),

    /// The archive could not be written.
    #[error("archive error: {0}")]
    Archive(String),

    /// The bundle itself is unusable (e.g. a reserved filename).
    #[error("invalid bundle: {0}")]
    Bundle(String),
}

/// The unsigned content of a pass.
#[derive(Debug, Clone)]
pub struct PassBundle {
    /// Serialized manifest, stored under [`PASS_JSON`].
    pub pass_json: Vec<u8>,
    /// Image buffers keyed by filename.
    pub assets: AssetSet,
}

impl PassBundle {
    /// All files of the bundle, `pass.json` first, then assets by name.
    pub fn files(&self) -> impl Iterator<Item = (&str, &[u8])> {
        std::iter::once((PASS_JSON, self.pass_json.as_slice())).chain(self.assets.iter())
    }
}

/// Signs a bundle and packages it into a distributable archive.
pub trait PassSigner: Send + Sync {
    /// Produce the signed archive bytes.
    fn sign(&self, bundle: &PassBundle, credentials: &Credentials) -> Result<Vec<u8>, SignerError>;
}

/// Advisory check of an assembled manifest.
pub trait ManifestInspector: Send + Sync {
    /// Return human-readable findings; empty means the manifest looks sound.
    fn inspect(&self, manifest: &serde_json::Value) -> Vec<String>;
}

impl<T: PassSigner + ?Sized> PassSigner for std::sync::Arc<T> {
    fn sign(&self, bundle: &PassBundle, credentials: &Credentials) -> Result<Vec<u8>, SignerError> {
        (**self).sign(bundle, credentials)
    }
}
