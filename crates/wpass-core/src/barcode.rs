//! # Barcode Resolver
//!
//! Decides whether a scannable code is requested and normalizes it into the
//! manifest's barcode descriptor.
//!
//! - A structured `barcode` record is used as given, with defaults filled in.
//! - A truthy `barcode` flag synthesizes a descriptor from `barcodeMessage`
//!   and `barcodeFormat`, or the same defaults.
//! - An absent or falsy flag emits nothing, regardless of any separately
//!   supplied message or format.
//!
//! The default message is a timestamp placeholder (`PASS-<unix-millis>`) and
//! the default format is QR. The message encoding is always `iso-8859-1`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{non_empty, BarcodeSpec, PassData};

/// Message encoding written into every descriptor.
pub const MESSAGE_ENCODING: &str = "iso-8859-1";

/// Symbology of a barcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeFormat {
    #[serde(rename = "PKBarcodeFormatQR")]
    Qr,
    #[serde(rename = "PKBarcodeFormatPDF417")]
    Pdf417,
    #[serde(rename = "PKBarcodeFormatAztec")]
    Aztec,
    #[serde(rename = "PKBarcodeFormatCode128")]
    Code128,
}

impl BarcodeFormat {
    /// The enum name the signer expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qr => "PKBarcodeFormatQR",
            Self::Pdf417 => "PKBarcodeFormatPDF417",
            Self::Aztec => "PKBarcodeFormatAztec",
            Self::Code128 => "PKBarcodeFormatCode128",
        }
    }

    /// Parse a user format name (`qr`, `pdf417`, `PKBarcodeFormatAztec`, ...).
    pub fn parse(input: &str) -> Option<Self> {
        let token: String = input
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        let token = token.strip_prefix("pkbarcodeformat").unwrap_or(&token);
        match token {
            "qr" | "qrcode" => Some(Self::Qr),
            "pdf417" | "pdf" => Some(Self::Pdf417),
            "aztec" => Some(Self::Aztec),
            "code128" => Some(Self::Code128),
            _ => None,
        }
    }
}

/// A barcode as written into the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeDescriptor {
    pub message: String,
    pub format: BarcodeFormat,
    pub message_encoding: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

/// Resolve the barcode of a pass, if any.
///
/// `issued_at` seeds the placeholder message when none is supplied.
pub fn resolve_barcode(data: &PassData, issued_at: DateTime<Utc>) -> Option<BarcodeDescriptor> {
    let spec = data.barcode.as_ref()?;
    let (message, format, alt_text) = match spec {
        BarcodeSpec::Record(record) => (
            non_empty(&record.message),
            non_empty(&record.format),
            non_empty(&record.alt_text),
        ),
        other if other.is_requested() => (
            non_empty(&data.barcode_message),
            non_empty(&data.barcode_format),
            None,
        ),
        _ => return None,
    };

    let message = message
        .map(str::to_string)
        .unwrap_or_else(|| format!("PASS-{}", issued_at.timestamp_millis()));
    let format = match format {
        Some(raw) => BarcodeFormat::parse(raw).unwrap_or_else(|| {
            tracing::warn!(format = %raw, "unknown barcode format; using QR");
            BarcodeFormat::Qr
        }),
        None => BarcodeFormat::Qr,
    };

    Some(BarcodeDescriptor {
        message,
        format,
        message_encoding: MESSAGE_ENCODING.to_string(),
        alt_text: alt_text.map(str::to_string),
    })
}
