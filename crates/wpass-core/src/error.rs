//! # Error Types
//!
//! Failures of a pass build, following one taxonomy:
//!
//! - **Configuration**: a credential file is missing or unreadable, or the
//!   environment is malformed. Detected before any assembly work.
//! - **Validation**: the request itself is unusable (missing or unknown
//!   pass type, missing pass data).
//! - **Signing**: the signer rejected the manifest or the credentials.
//!
//! Image decode failures are not here: they are recovered inside the asset
//! resolver (see [`crate::assets::AssetDecodeError`]) and never reach callers.

use thiserror::Error;

/// Failure of one pass build. Every variant is terminal for its request.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A required credential file does not exist.
    #[error("certificate missing: {0}")]
    CertificateMissing(String),

    /// A credential file exists but could not be read.
    #[error("certificate unreadable: {0}")]
    CertificateUnreadable(String),

    /// Environment configuration is malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The request is missing required fields or names an unknown type.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The signer rejected the bundle or the credentials.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Unexpected failure inside the build pipeline.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification used by the HTTP and CLI layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Signing,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Validation => "validation",
            Self::Signing => "signing",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BuildError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CertificateMissing(_) | Self::CertificateUnreadable(_) | Self::Config(_) => {
                ErrorKind::Configuration
            }
            Self::Validation(_) => ErrorKind::Validation,
            Self::Signing(_) => ErrorKind::Signing,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Malformed environment configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The pass type identifier is not reverse-DNS style.
    #[error("PASS_TYPE_IDENTIFIER must be a reverse-DNS identifier, got {0:?}")]
    InvalidPassTypeIdentifier(String),

    /// The update web service URL is not an http(s) URL.
    #[error("PASS_WEB_SERVICE_URL must be an http(s) URL, got {0:?}")]
    InvalidWebServiceUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_prefixes() {
        let err = BuildError::CertificateMissing("WWDR certificate file (wwdr.pem) not found".into());
        assert_eq!(
            err.to_string(),
            "certificate missing: WWDR certificate file (wwdr.pem) not found"
        );
        let err = BuildError::Signing("bad passphrase".into());
        assert_eq!(err.to_string(), "signing failed: bad passphrase");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(BuildError::CertificateMissing(String::new()).kind(), ErrorKind::Configuration);
        assert_eq!(BuildError::CertificateUnreadable(String::new()).kind(), ErrorKind::Configuration);
        assert_eq!(
            BuildError::from(ConfigError::InvalidWebServiceUrl("ftp://x".into())).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(BuildError::Validation(String::new()).kind(), ErrorKind::Validation);
        assert_eq!(BuildError::Signing(String::new()).kind(), ErrorKind::Signing);
        assert_eq!(BuildError::Internal(String::new()).kind(), ErrorKind::Internal);
    }
}
