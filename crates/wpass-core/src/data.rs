//! # Pass Data: User Input Model
//!
//! [`PassData`] is the complete, transient input for one build: identity
//! strings, color tokens, dates, barcode request, custom fields, inline image
//! payloads, and the type-specific attributes of each pass style.
//!
//! Every text field is optional. The editor sends empty strings and `null`
//! interchangeably, so consumers read text through [`non_empty`], which
//! treats both as absent. Boolean flags accept any JSON value and apply the
//! usual truthiness rules (`"yes"` and `1` are set, `""` and `0` are not).

use serde::{Deserialize, Deserializer, Serialize};

/// User-supplied content of a pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub logo_text: Option<String>,
    pub organization_name: Option<String>,

    // Colors
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
    pub label_color: Option<String>,
    pub logo_text_color: Option<String>,

    // Location and dates
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub relevant_date: Option<String>,
    pub expiration_date: Option<String>,
    #[serde(deserialize_with = "truthy")]
    pub voided: bool,

    // Barcode
    pub barcode: Option<BarcodeSpec>,
    pub barcode_message: Option<String>,
    pub barcode_format: Option<String>,

    /// Request update notifications (needs a configured web service).
    #[serde(deserialize_with = "truthy")]
    pub notifications: bool,

    // Inline image payloads (base64, optionally as a data URL)
    pub logo_image: Option<String>,
    pub icon_image: Option<String>,
    pub strip_image: Option<String>,
    pub background_image: Option<String>,
    pub thumbnail_image: Option<String>,
    pub footer_image: Option<String>,

    // Custom fields
    pub custom_fields: Vec<CustomField>,
    pub header_fields: Vec<CustomField>,
    pub primary_fields: Vec<CustomField>,
    pub secondary_fields: Vec<CustomField>,
    pub auxiliary_fields: Vec<CustomField>,
    pub back_fields: Vec<CustomField>,

    // Type-specific attributes
    pub discount: Option<String>,
    pub membership_number: Option<String>,
    pub balance: Option<String>,
    pub flight_number: Option<String>,
    pub gate: Option<String>,
    pub seat: Option<String>,
    pub boarding_time: Option<String>,
    pub transit_type: Option<String>,

    // Contact details (back of the pass)
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub contact_address: Option<String>,
    pub contact_website: Option<String>,

    // Layout preferences
    pub header_alignment: Option<String>,
    pub primary_alignment: Option<String>,
    pub secondary_alignment: Option<String>,
    pub auxiliary_alignment: Option<String>,
    pub date_style: Option<String>,
    pub time_style: Option<String>,

    /// Full customization requested; forces the `generic` style.
    #[serde(deserialize_with = "truthy")]
    pub custom_pass_type: bool,
}

/// A user-defined display field.
///
/// `key` must be unique within its section only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomField {
    pub key: String,
    pub label: String,
    pub value: String,
    pub text_alignment: Option<String>,
}

impl CustomField {
    /// Convenience constructor with natural alignment.
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: value.into(),
            text_alignment: None,
        }
    }
}

/// The `barcode` member of a request.
///
/// The editor sends a boolean toggle; API clients may send a full record.
/// Anything else is judged by truthiness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BarcodeSpec {
    Enabled(bool),
    Record(BarcodeRecord),
    Other(serde_json::Value),
}

/// Explicit barcode content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BarcodeRecord {
    pub message: Option<String>,
    pub format: Option<String>,
    pub encoding: Option<String>,
    pub alt_text: Option<String>,
}

impl BarcodeSpec {
    /// Whether this value requests a barcode at all.
    pub fn is_requested(&self) -> bool {
        match self {
            Self::Enabled(flag) => *flag,
            Self::Record(_) => true,
            Self::Other(value) => is_truthy(value),
        }
    }
}

/// Return the trimmed text if it is present and non-empty.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_payload_deserializes() {
        let json = r##"{
            "title": "Executive Engineers Conference",
            "subtitle": "",
            "primaryColor": "#00a8e1",
            "location": "San Francisco, CA",
            "date": "2025-06-15",
            "time": "09:00",
            "barcode": true,
            "barcodeFormat": "qr",
            "notifications": true,
            "logoImage": "",
            "voided": false,
            "customFields": [
                {"id": "field_1", "key": "seat", "label": "Seat", "value": "12A", "textAlignment": "left"}
            ]
        }"##;
        let data: PassData = serde_json::from_str(json).unwrap();
        assert_eq!(non_empty(&data.title), Some("Executive Engineers Conference"));
        assert_eq!(non_empty(&data.subtitle), None);
        assert_eq!(data.barcode, Some(BarcodeSpec::Enabled(true)));
        assert!(data.notifications);
        assert!(!data.voided);
        assert_eq!(data.custom_fields.len(), 1);
        assert_eq!(data.custom_fields[0].text_alignment.as_deref(), Some("left"));
    }

    #[test]
    fn test_nulls_are_absent() {
        let data: PassData =
            serde_json::from_str(r#"{"title": null, "barcode": null, "voided": null}"#).unwrap();
        assert_eq!(data.title, None);
        assert_eq!(data.barcode, None);
        assert!(!data.voided);
    }

    #[test]
    fn test_barcode_record_deserializes() {
        let data: PassData = serde_json::from_str(
            r#"{"barcode": {"message": "ABC-123", "format": "pdf417", "encoding": "utf-8"}}"#,
        )
        .unwrap();
        match data.barcode {
            Some(BarcodeSpec::Record(record)) => {
                assert_eq!(record.message.as_deref(), Some("ABC-123"));
                assert_eq!(record.format.as_deref(), Some("pdf417"));
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn test_barcode_truthiness() {
        assert!(BarcodeSpec::Enabled(true).is_requested());
        assert!(!BarcodeSpec::Enabled(false).is_requested());
        assert!(BarcodeSpec::Record(BarcodeRecord::default()).is_requested());
        assert!(BarcodeSpec::Other(serde_json::json!("yes")).is_requested());
        assert!(!BarcodeSpec::Other(serde_json::json!("")).is_requested());
        assert!(!BarcodeSpec::Other(serde_json::json!(0)).is_requested());
    }

    #[test]
    fn test_custom_pass_type_accepts_strings() {
        let data: PassData = serde_json::from_str(r#"{"customPassType": "freeform"}"#).unwrap();
        assert!(data.custom_pass_type);
        let data: PassData = serde_json::from_str(r#"{"customPassType": ""}"#).unwrap();
        assert!(!data.custom_pass_type);
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty(&Some("  Hall A ".to_string())), Some("Hall A"));
        assert_eq!(non_empty(&Some("   ".to_string())), None);
        assert_eq!(non_empty(&None), None);
    }
}
