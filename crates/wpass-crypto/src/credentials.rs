//! # Credential Parsing
//!
//! Turns the raw bytes of the three credential files into a usable signing
//! identity.
//!
//! - Certificates are accepted as PEM (`CERTIFICATE`) or raw DER, so the
//!   `.cer` download of the root authority works as-is.
//! - The signer key must be PKCS#8: plain (`PRIVATE KEY`) or
//!   passphrase-protected (`ENCRYPTED PRIVATE KEY`), in PEM or DER.
//!   Legacy PKCS#1 `RSA PRIVATE KEY` files are rejected with a hint.
//!
//! Private key material never appears in errors or logs.

use pkcs8::EncryptedPrivateKeyInfo;
use wpass_core::{Credentials, SignerError};
use x509_certificate::{CapturedX509Certificate, InMemorySigningKeyPair};

const PEM_PREFIX: &[u8] = b"-----BEGIN";

/// Parsed credentials, ready to sign.
pub struct SigningIdentity {
    pub signer_cert: CapturedX509Certificate,
    pub signing_key: InMemorySigningKeyPair,
    pub wwdr: CapturedX509Certificate,
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("signer", &self.signer_cert.subject_common_name())
            .field("wwdr", &self.wwdr.subject_common_name())
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

impl SigningIdentity {
    /// Parse all three credentials.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self, SignerError> {
        let wwdr = parse_certificate(&credentials.wwdr, "WWDR certificate")?;
        let signer_cert = parse_certificate(&credentials.signer_cert, "signer certificate")?;
        let signing_key =
            parse_private_key(&credentials.signer_key, credentials.passphrase.as_deref())?;
        tracing::debug!(
            signer = ?signer_cert.subject_common_name(),
            wwdr = ?wwdr.subject_common_name(),
            "credentials parsed"
        );
        Ok(Self {
            signer_cert,
            signing_key,
            wwdr,
        })
    }
}

/// Parse a certificate from PEM or DER.
pub fn parse_certificate(bytes: &[u8], what: &str) -> Result<CapturedX509Certificate, SignerError> {
    let result = if is_pem(bytes) {
        CapturedX509Certificate::from_pem(bytes)
    } else {
        CapturedX509Certificate::from_der(bytes.to_vec())
    };
    result.map_err(|e| SignerError::Credentials(format!("{what}: {e}")))
}

/// Parse a PKCS#8 private key, decrypting it with `passphrase` if needed.
pub fn parse_private_key(
    bytes: &[u8],
    passphrase: Option<&str>,
) -> Result<InMemorySigningKeyPair, SignerError> {
    let der = if is_pem(bytes) {
        let pem = pem::parse(bytes)
            .map_err(|e| SignerError::Credentials(format!("signer key is not valid PEM: {e}")))?;
        match pem.tag() {
            "PRIVATE KEY" => pem.contents().to_vec(),
            "ENCRYPTED PRIVATE KEY" => decrypt(pem.contents(), passphrase)?,
            "RSA PRIVATE KEY" | "EC PRIVATE KEY" => {
                return Err(SignerError::Credentials(format!(
                    "signer key is a legacy {} block; convert it to PKCS#8",
                    pem.tag()
                )))
            }
            other => {
                return Err(SignerError::Credentials(format!(
                    "signer key has unexpected PEM label {other:?}"
                )))
            }
        }
    } else if EncryptedPrivateKeyInfo::try_from(bytes).is_ok() {
        decrypt(bytes, passphrase)?
    } else {
        bytes.to_vec()
    };

    InMemorySigningKeyPair::from_pkcs8_der(&der)
        .map_err(|e| SignerError::Credentials(format!("signer key: {e}")))
}

fn decrypt(der: &[u8], passphrase: Option<&str>) -> Result<Vec<u8>, SignerError> {
    let passphrase = passphrase.ok_or_else(|| {
        SignerError::Credentials(
            "signer key is encrypted but no passphrase is configured".to_string(),
        )
    })?;
    let info = EncryptedPrivateKeyInfo::try_from(der)
        .map_err(|e| SignerError::Credentials(format!("encrypted signer key: {e}")))?;
    let document = info.decrypt(passphrase).map_err(|_| {
        SignerError::Credentials("signer key could not be decrypted; check the passphrase".to_string())
    })?;
    Ok(document.as_bytes().to_vec())
}

fn is_pem(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(PEM_PREFIX)
}
