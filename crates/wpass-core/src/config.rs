//! Pass build configuration.
//!
//! Identity strings and credential locations come from the environment and
//! are read on every request; nothing here is cached or hot-reloaded.

use std::path::{Path, PathBuf};

use crate::certificates::CertificatePaths;
use crate::error::ConfigError;

/// Default pass type identifier when `PASS_TYPE_IDENTIFIER` is unset.
pub const DEFAULT_PASS_TYPE_IDENTIFIER: &str = "pass.com.example.wallet";
/// Default organization name when `PASS_ORGANIZATION_NAME` is unset.
pub const DEFAULT_ORGANIZATION_NAME: &str = "Your Organization";
/// Default description when `PASS_DESCRIPTION` is unset.
pub const DEFAULT_DESCRIPTION: &str = "Digital Pass";
/// Default directory holding the credential files.
pub const DEFAULT_CERTIFICATES_DIR: &str = "./certificates";

/// Configuration for building and signing passes.
///
/// Custom `Debug` implementation redacts the signer key passphrase.
#[derive(Clone)]
pub struct PassConfig {
    /// Developer team identifier.
    pub team_identifier: String,
    /// Reverse-DNS pass type identifier (`pass.com.example.wallet`).
    pub pass_type_identifier: String,
    /// Organization name used when the request carries none.
    pub organization_name: String,
    /// Description used when the request carries none.
    pub description: String,
    /// Credential file locations.
    pub certificates: CertificatePaths,
    /// Passphrase protecting the signer key, if any.
    pub signer_key_passphrase: Option<String>,
    /// Update web service base URL, if passes should register for updates.
    pub web_service_url: Option<String>,
}

impl std::fmt::Debug for PassConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassConfig")
            .field("team_identifier", &self.team_identifier)
            .field("pass_type_identifier", &self.pass_type_identifier)
            .field("organization_name", &self.organization_name)
            .field("description", &self.description)
            .field("certificates", &self.certificates)
            .field(
                "signer_key_passphrase",
                &self.signer_key_passphrase.as_ref().map(|_| "[REDACTED]"),
            )
            .field("web_service_url", &self.web_service_url)
            .finish()
    }
}

impl PassConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `APPLE_TEAM_ID` (default: empty)
    /// - `PASS_TYPE_IDENTIFIER` (default: `pass.com.example.wallet`)
    /// - `PASS_ORGANIZATION_NAME` (default: `Your Organization`)
    /// - `PASS_DESCRIPTION` (default: `Digital Pass`)
    /// - `CERTIFICATES_DIR` (default: `./certificates`)
    /// - `WWDR_CERT_PATH` (default: `<dir>/wwdr.pem`)
    /// - `SIGNER_CERT_PATH` (default: `<dir>/signerCert.pem`)
    /// - `SIGNER_KEY_PATH` (default: `<dir>/signerKey.pem`)
    /// - `SIGNER_KEY_PASSPHRASE` (optional)
    /// - `PASS_WEB_SERVICE_URL` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let pass_type_identifier = var("PASS_TYPE_IDENTIFIER")
            .unwrap_or_else(|| DEFAULT_PASS_TYPE_IDENTIFIER.to_string());
        validate_pass_type_identifier(&pass_type_identifier)?;

        let web_service_url = var("PASS_WEB_SERVICE_URL");
        if let Some(url) = &web_service_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::InvalidWebServiceUrl(url.clone()));
            }
        }

        let dir = PathBuf::from(
            var("CERTIFICATES_DIR").unwrap_or_else(|| DEFAULT_CERTIFICATES_DIR.to_string()),
        );
        let certificates = CertificatePaths {
            wwdr: var("WWDR_CERT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| dir.join("wwdr.pem")),
            signer_cert: var("SIGNER_CERT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| dir.join("signerCert.pem")),
            signer_key: var("SIGNER_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| dir.join("signerKey.pem")),
        };

        Ok(Self {
            team_identifier: var("APPLE_TEAM_ID").unwrap_or_default(),
            pass_type_identifier,
            organization_name: var("PASS_ORGANIZATION_NAME")
                .unwrap_or_else(|| DEFAULT_ORGANIZATION_NAME.to_string()),
            description: var("PASS_DESCRIPTION").unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            certificates,
            signer_key_passphrase: lookup("SIGNER_KEY_PASSPHRASE").filter(|p| !p.is_empty()),
            web_service_url,
        })
    }

    /// A configuration with default identity strings and credentials in `dir`.
    pub fn with_certificates_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            team_identifier: String::new(),
            pass_type_identifier: DEFAULT_PASS_TYPE_IDENTIFIER.to_string(),
            organization_name: DEFAULT_ORGANIZATION_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            certificates: CertificatePaths {
                wwdr: dir.join("wwdr.pem"),
                signer_cert: dir.join("signerCert.pem"),
                signer_key: dir.join("signerKey.pem"),
            },
            signer_key_passphrase: None,
            web_service_url: None,
        }
    }
}

fn validate_pass_type_identifier(id: &str) -> Result<(), ConfigError> {
    let well_formed = id.contains('.')
        && !id.starts_with('.')
        && !id.ends_with('.')
        && !id.split('.').any(str::is_empty)
        && !id.chars().any(char::is_whitespace);
    if well_formed {
        Ok(())
    } else {
        Err(ConfigError::InvalidPassTypeIdentifier(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config = PassConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.pass_type_identifier, DEFAULT_PASS_TYPE_IDENTIFIER);
        assert_eq!(config.organization_name, DEFAULT_ORGANIZATION_NAME);
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
        assert_eq!(config.team_identifier, "");
        assert_eq!(
            config.certificates.wwdr,
            Path::new(DEFAULT_CERTIFICATES_DIR).join("wwdr.pem")
        );
        assert!(config.signer_key_passphrase.is_none());
        assert!(config.web_service_url.is_none());
    }

    #[test]
    fn test_explicit_paths_override_directory() {
        let config = PassConfig::from_lookup(lookup(&[
            ("CERTIFICATES_DIR", "/etc/passes"),
            ("SIGNER_KEY_PATH", "/secrets/key.pem"),
            ("APPLE_TEAM_ID", "ABCDE12345"),
            ("SIGNER_KEY_PASSPHRASE", "hunter2"),
        ]))
        .unwrap();
        assert_eq!(config.certificates.wwdr, Path::new("/etc/passes/wwdr.pem"));
        assert_eq!(
            config.certificates.signer_cert,
            Path::new("/etc/passes/signerCert.pem")
        );
        assert_eq!(config.certificates.signer_key, Path::new("/secrets/key.pem"));
        assert_eq!(config.team_identifier, "ABCDE12345");
        assert_eq!(config.signer_key_passphrase.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_malformed_pass_type_identifier_rejected() {
        for bad in ["wallet", "pass..example", "pass.example.", "pass.with space"] {
            let err = PassConfig::from_lookup(lookup(&[("PASS_TYPE_IDENTIFIER", bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPassTypeIdentifier(_)), "{bad}");
        }
    }

    #[test]
    fn test_web_service_url_must_be_http() {
        let err = PassConfig::from_lookup(lookup(&[("PASS_WEB_SERVICE_URL", "ftp://updates")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWebServiceUrl(_)));
        let config =
            PassConfig::from_lookup(lookup(&[("PASS_WEB_SERVICE_URL", "https://passes.example.com")]))
                .unwrap();
        assert_eq!(
            config.web_service_url.as_deref(),
            Some("https://passes.example.com")
        );
    }

    #[test]
    fn test_debug_redacts_passphrase() {
        let config =
            PassConfig::from_lookup(lookup(&[("SIGNER_KEY_PASSPHRASE", "hunter2")])).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
