//! # Pass Packaging
//!
//! Builds the two generated members of a pass archive and writes the
//! archive itself:
//!
//! - `manifest.json` maps every bundled file (`pass.json` and each image)
//!   to the lowercase hex SHA-1 of its bytes. Keys are sorted.
//! - The archive is a deflate ZIP holding the bundle files, then
//!   `manifest.json`, then `signature`.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use sha1::{Digest, Sha1};
use wpass_core::{PassBundle, SignerError};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Filename of the digest manifest.
pub const MANIFEST_JSON: &str = "manifest.json";
/// Filename of the detached signature.
pub const SIGNATURE: &str = "signature";

/// Lowercase hex SHA-1 of `bytes`.
pub fn sha1_hex(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}

/// Digest of every file in the bundle, keyed by filename.
pub fn manifest_digests(bundle: &PassBundle) -> Result<BTreeMap<String, String>, SignerError> {
    let mut digests = BTreeMap::new();
    for (name, bytes) in bundle.files() {
        if name == MANIFEST_JSON || name == SIGNATURE {
            return Err(SignerError::Bundle(format!("{name} is a reserved filename")));
        }
        digests.insert(name.to_string(), sha1_hex(bytes));
    }
    Ok(digests)
}

/// Serialized `manifest.json` for the bundle.
pub fn manifest_json(bundle: &PassBundle) -> Result<Vec<u8>, SignerError> {
    let digests = manifest_digests(bundle)?;
    serde_json::to_vec_pretty(&digests)
        .map_err(|e| SignerError::Bundle(format!("manifest.json: {e}")))
}

/// Write the finished archive.
pub fn write_archive(
    bundle: &PassBundle,
    manifest: &[u8],
    signature: &[u8],
) -> Result<Vec<u8>, SignerError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let generated = [(MANIFEST_JSON, manifest), (SIGNATURE, signature)];
    for (name, bytes) in bundle.files().chain(generated) {
        zip.start_file(name, options).map_err(archive_err)?;
        zip.write_all(bytes).map_err(archive_err)?;
    }
    let cursor = zip.finish().map_err(archive_err)?;
    Ok(cursor.into_inner())
}

fn archive_err(e: impl std::fmt::Display) -> SignerError {
    SignerError::Archive(e.to_string())
}
