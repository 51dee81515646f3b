//! # Certificate Preconditions
//!
//! Signing needs three credential files: the root-authority (WWDR)
//! certificate, the signer certificate, and the signer private key. They are
//! provided by the operator and never generated here.
//!
//! [`check_certificates`] is advisory: it only tests that the files exist, in
//! a fixed order, and reports the first one missing. Content, expiry, and
//! passphrase problems surface later as signing errors.
//!
//! [`load_credentials`] reads the files fresh for every build.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Locations of the three credential files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificatePaths {
    /// Root-authority (WWDR) certificate.
    pub wwdr: PathBuf,
    /// Signer certificate.
    pub signer_cert: PathBuf,
    /// Signer private key.
    pub signer_key: PathBuf,
}

impl CertificatePaths {
    /// The files in the order they are checked, with their display names.
    fn in_check_order(&self) -> [(&'static str, &Path); 3] {
        [
            ("WWDR certificate", self.wwdr.as_path()),
            ("Signer certificate", self.signer_cert.as_path()),
            ("Signer key", self.signer_key.as_path()),
        ]
    }
}

/// Result of the precondition check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateStatus {
    pub valid: bool,
    pub message: String,
}

/// Check that all three credential files exist.
///
/// Returns `valid = false` with a message naming the first missing file
/// (WWDR, then signer certificate, then signer key).
pub fn check_certificates(paths: &CertificatePaths) -> CertificateStatus {
    for (name, path) in paths.in_check_order() {
        if !path.exists() {
            let message = format!("{name} file ({}) not found", file_name(path));
            tracing::warn!(path = %path.display(), "{message}");
            return CertificateStatus {
                valid: false,
                message,
            };
        }
    }
    CertificateStatus {
        valid: true,
        message: "Certificates found".to_string(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Raw credential material handed to the signer.
///
/// Does not implement `Serialize`; the `Debug` output shows sizes only.
#[derive(Clone)]
pub struct Credentials {
    pub wwdr: Vec<u8>,
    pub signer_cert: Vec<u8>,
    pub signer_key: Vec<u8>,
    pub passphrase: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("wwdr", &format_args!("{} bytes", self.wwdr.len()))
            .field("signer_cert", &format_args!("{} bytes", self.signer_cert.len()))
            .field("signer_key", &"[REDACTED]")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Read the three credential files.
///
/// Fails with [`BuildError::CertificateMissing`] if the precondition check
/// fails and [`BuildError::CertificateUnreadable`] on any read error.
pub fn load_credentials(
    paths: &CertificatePaths,
    passphrase: Option<&str>,
) -> Result<Credentials, BuildError> {
    let status = check_certificates(paths);
    if !status.valid {
        return Err(BuildError::CertificateMissing(status.message));
    }
    let read = |name: &str, path: &Path| {
        std::fs::read(path).map_err(|e| {
            BuildError::CertificateUnreadable(format!("{name} file ({}): {e}", file_name(path)))
        })
    };
    Ok(Credentials {
        wwdr: read("WWDR certificate", &paths.wwdr)?,
        signer_cert: read("Signer certificate", &paths.signer_cert)?,
        signer_key: read("Signer key", &paths.signer_key)?,
        passphrase: passphrase.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths_in(dir: &Path) -> CertificatePaths {
        CertificatePaths {
            wwdr: dir.join("wwdr.pem"),
            signer_cert: dir.join("signerCert.pem"),
            signer_key: dir.join("signerKey.pem"),
        }
    }

    #[test]
    fn test_all_missing_reports_wwdr_first() {
        let dir = tempfile::tempdir().unwrap();
        let status = check_certificates(&paths_in(dir.path()));
        assert!(!status.valid);
        assert!(status.message.contains("WWDR"));
        assert!(status.message.ends_with("not found"));
    }

    #[test]
    fn test_reports_signer_cert_after_wwdr() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        std::fs::write(&paths.wwdr, b"wwdr").unwrap();
        let status = check_certificates(&paths);
        assert!(!status.valid);
        assert_eq!(status.message, "Signer certificate file (signerCert.pem) not found");
    }

    #[test]
    fn test_reports_signer_key_last() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        std::fs::write(&paths.wwdr, b"wwdr").unwrap();
        std::fs::write(&paths.signer_cert, b"cert").unwrap();
        let status = check_certificates(&paths);
        assert_eq!(status.message, "Signer key file (signerKey.pem) not found");
    }

    #[test]
    fn test_all_present_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        for path in [&paths.wwdr, &paths.signer_cert, &paths.signer_key] {
            std::fs::write(path, b"x").unwrap();
        }
        let status = check_certificates(&paths);
        assert!(status.valid);
        assert_eq!(status.message, "Certificates found");
    }

    #[test]
    fn test_nonexistent_directory() {
        let status = check_certificates(&paths_in(Path::new("/nonexistent/wpass/certs")));
        assert!(!status.valid);
        assert!(status.message.contains("WWDR"));
    }

    #[test]
    fn test_load_reads_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        std::fs::write(&paths.wwdr, b"wwdr").unwrap();
        std::fs::write(&paths.signer_cert, b"cert").unwrap();
        std::fs::write(&paths.signer_key, b"key").unwrap();
        let creds = load_credentials(&paths, Some("secret")).unwrap();
        assert_eq!(creds.wwdr, b"wwdr");
        assert_eq!(creds.signer_cert, b"cert");
        assert_eq!(creds.signer_key, b"key");
        assert_eq!(creds.passphrase.as_deref(), Some("secret"));
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_credentials(&paths_in(dir.path()), None).unwrap_err();
        assert!(matches!(err, BuildError::CertificateMissing(_)));
        assert!(err.to_string().starts_with("certificate missing: WWDR"));
    }

    #[test]
    fn test_directory_in_place_of_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        std::fs::create_dir(&paths.wwdr).unwrap();
        std::fs::write(&paths.signer_cert, b"cert").unwrap();
        std::fs::write(&paths.signer_key, b"key").unwrap();
        let err = load_credentials(&paths, None).unwrap_err();
        assert!(matches!(err, BuildError::CertificateUnreadable(_)));
    }
}
