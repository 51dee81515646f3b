//! # Manifest Assembler
//!
//! Composes the `pass.json` document from identity configuration, normalized
//! colors, relevance dates, the barcode descriptor, and the field groups.
//!
//! The field groups sit under exactly one style key. [`PassStyle`] is a
//! tagged variant over the five pass types, so a manifest cannot carry two
//! styles at once. The key is always the *effective* type: a request with
//! `customPassType` set is written as `generic` whatever type it named.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::barcode::{resolve_barcode, BarcodeDescriptor};
use crate::config::PassConfig;
use crate::data::{non_empty, PassData};
use crate::fields::{map_fields, FieldGroups};
use crate::normalize::{normalize_color, normalize_w3c_date, ColorToken};
use crate::pass_type::PassType;
use crate::serial::SerialNumber;

/// Version of the pass format written by this assembler.
pub const FORMAT_VERSION: u32 = 1;

const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";
const DEFAULT_FOREGROUND_COLOR: &str = "#000000";
const DEFAULT_LABEL_COLOR: &str = "#6B7280";

// ---------------------------------------------------------------------------
// Manifest document
// ---------------------------------------------------------------------------

/// The pre-signing `pass.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub format_version: u32,
    pub pass_type_identifier: String,
    pub team_identifier: String,
    pub serial_number: String,
    pub organization_name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_text: Option<String>,

    pub background_color: ColorToken,
    pub foreground_color: ColorToken,
    pub label_color: ColorToken,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub voided: bool,

    /// Legacy single-barcode key, mirrored from `barcodes[0]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<BarcodeDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub barcodes: Vec<BarcodeDescriptor>,

    #[serde(
        rename = "webServiceURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub web_service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_token: Option<String>,

    #[serde(flatten)]
    pub style: PassStyle,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Manifest {
    /// The pass type keying the field groups.
    pub fn pass_type(&self) -> PassType {
        self.style.pass_type()
    }

    /// Serialize to the `pass.json` bytes handed to the signer.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

/// The field-group object, keyed by pass type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassStyle {
    EventTicket(PassStructure),
    BoardingPass(PassStructure),
    Coupon(PassStructure),
    StoreCard(PassStructure),
    Generic(PassStructure),
}

impl PassStyle {
    pub fn new(pass_type: PassType, structure: PassStructure) -> Self {
        match pass_type {
            PassType::EventTicket => Self::EventTicket(structure),
            PassType::BoardingPass => Self::BoardingPass(structure),
            PassType::Coupon => Self::Coupon(structure),
            PassType::StoreCard => Self::StoreCard(structure),
            PassType::Generic => Self::Generic(structure),
        }
    }

    pub fn pass_type(&self) -> PassType {
        match self {
            Self::EventTicket(_) => PassType::EventTicket,
            Self::BoardingPass(_) => PassType::BoardingPass,
            Self::Coupon(_) => PassType::Coupon,
            Self::StoreCard(_) => PassType::StoreCard,
            Self::Generic(_) => PassType::Generic,
        }
    }

    pub fn structure(&self) -> &PassStructure {
        match self {
            Self::EventTicket(s)
            | Self::BoardingPass(s)
            | Self::Coupon(s)
            | Self::StoreCard(s)
            | Self::Generic(s) => s,
        }
    }
}

/// Field groups plus the style-specific keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassStructure {
    #[serde(flatten)]
    pub groups: FieldGroups,
    /// Boarding passes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_type: Option<TransitType>,
}

/// Transit mode of a boarding pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransitType {
    #[default]
    #[serde(rename = "PKTransitTypeAir")]
    Air,
    #[serde(rename = "PKTransitTypeTrain")]
    Train,
    #[serde(rename = "PKTransitTypeBus")]
    Bus,
    #[serde(rename = "PKTransitTypeBoat")]
    Boat,
    #[serde(rename = "PKTransitTypeGeneric")]
    Generic,
}

impl TransitType {
    /// Parse a user transit mode; absent or unknown means air.
    pub fn parse(input: Option<&str>) -> Self {
        let Some(raw) = input else {
            return Self::Air;
        };
        let token = raw.trim().to_ascii_lowercase();
        match token.strip_prefix("pktransittype").unwrap_or(&token) {
            "train" | "rail" => Self::Train,
            "bus" => Self::Bus,
            "boat" | "ferry" => Self::Boat,
            "generic" => Self::Generic,
            _ => Self::Air,
        }
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Per-build values that are not derived from the request.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub issued_at: DateTime<Utc>,
    pub serial: SerialNumber,
    /// Emitted only when update notifications are enabled.
    pub authentication_token: String,
}

impl BuildContext {
    /// Context for a build issued now.
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Context for a build issued at `issued_at`.
    pub fn at(issued_at: DateTime<Utc>) -> Self {
        let mut token = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut token);
        Self {
            issued_at,
            serial: SerialNumber::generate(issued_at),
            authentication_token: hex::encode(token),
        }
    }
}

/// Run the field mapper, barcode resolver and assembler for one request.
pub fn assemble_pass(
    pass_type: PassType,
    data: &PassData,
    config: &PassConfig,
    ctx: &BuildContext,
) -> Manifest {
    let effective = pass_type.effective(data);
    let fields = map_fields(effective, data);
    let barcode = resolve_barcode(data, ctx.issued_at);
    assemble(pass_type, data, fields, barcode, config, ctx)
}

/// Merge identity, colors, dates, barcode and field groups into a manifest.
///
/// `pass_type` is the requested type; the style key is the effective one.
pub fn assemble(
    pass_type: PassType,
    data: &PassData,
    fields: FieldGroups,
    barcode: Option<BarcodeDescriptor>,
    config: &PassConfig,
    ctx: &BuildContext,
) -> Manifest {
    let effective = pass_type.effective(data);
    if effective != pass_type {
        tracing::debug!(requested = %pass_type, effective = %effective, "custom layout forces generic style");
    }

    let color = |value: &Option<String>, default: &str| {
        normalize_color(non_empty(value).unwrap_or(default))
    };
    let background_color = match non_empty(&data.background_color) {
        Some(c) => normalize_color(c),
        None => color(&data.primary_color, DEFAULT_BACKGROUND_COLOR),
    };

    let (web_service_url, authentication_token) =
        match (data.notifications, config.web_service_url.as_deref()) {
            (true, Some(url)) => (
                Some(url.to_string()),
                Some(ctx.authentication_token.clone()),
            ),
            _ => (None, None),
        };

    let transit_type = (effective == PassType::BoardingPass)
        .then(|| TransitType::parse(non_empty(&data.transit_type)));

    Manifest {
        format_version: FORMAT_VERSION,
        pass_type_identifier: config.pass_type_identifier.clone(),
        team_identifier: config.team_identifier.clone(),
        serial_number: ctx.serial.to_string(),
        organization_name: non_empty(&data.organization_name)
            .unwrap_or(&config.organization_name)
            .to_string(),
        description: non_empty(&data.description)
            .unwrap_or(&config.description)
            .to_string(),
        logo_text: non_empty(&data.logo_text).map(str::to_string),
        background_color,
        foreground_color: color(&data.foreground_color, DEFAULT_FOREGROUND_COLOR),
        label_color: color(&data.label_color, DEFAULT_LABEL_COLOR),
        relevant_date: non_empty(&data.relevant_date).map(normalize_w3c_date),
        expiration_date: non_empty(&data.expiration_date).map(normalize_w3c_date),
        voided: data.voided,
        barcode: barcode.clone(),
        barcodes: barcode.into_iter().collect(),
        web_service_url,
        authentication_token,
        style: PassStyle::new(
            effective,
            PassStructure {
                groups: fields,
                transit_type,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BarcodeSpec;
    use chrono::TimeZone;
    use serde_json::Value;

    fn config() -> PassConfig {
        PassConfig::with_certificates_dir("/nonexistent")
    }

    fn ctx() -> BuildContext {
        BuildContext::at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    fn gala() -> PassData {
        PassData {
            title: Some("Gala".to_string()),
            location: Some("Hall A".to_string()),
            date: Some("2024-05-01".to_string()),
            barcode: Some(BarcodeSpec::Enabled(true)),
            ..Default::default()
        }
    }

    fn to_json(manifest: &Manifest) -> Value {
        serde_json::to_value(manifest).unwrap()
    }

    fn style_keys(json: &Value) -> Vec<&'static str> {
        PassType::ALL
            .iter()
            .map(PassType::as_str)
            .filter(|k| json.get(*k).is_some())
            .collect()
    }

    #[test]
    fn test_gala_event_ticket() {
        let manifest = assemble_pass(PassType::EventTicket, &gala(), &config(), &ctx());
        let json = to_json(&manifest);
        assert_eq!(json["formatVersion"], 1);
        assert_eq!(json["eventTicket"]["primaryFields"][0]["value"], "Gala");
        assert_eq!(json["eventTicket"]["secondaryFields"][0]["value"], "Hall A");
        let barcodes = json["barcodes"].as_array().unwrap();
        assert_eq!(barcodes.len(), 1);
        assert!(barcodes[0]["format"].as_str().unwrap().ends_with("QR"));
        assert_eq!(json["barcode"], barcodes[0]);
    }

    #[test]
    fn test_absent_barcode_emits_no_keys() {
        let data = PassData {
            barcode: None,
            barcode_message: Some("X".to_string()),
            ..gala()
        };
        let json = to_json(&assemble_pass(PassType::Coupon, &data, &config(), &ctx()));
        assert!(json.get("barcode").is_none());
        assert!(json.get("barcodes").is_none());
    }

    #[test]
    fn test_exactly_one_style_key_matches_effective_type() {
        for pass_type in PassType::ALL {
            let json = to_json(&assemble_pass(pass_type, &gala(), &config(), &ctx()));
            assert_eq!(style_keys(&json), vec![pass_type.as_str()]);
        }
    }

    #[test]
    fn test_custom_pass_type_forces_generic() {
        let data = PassData {
            custom_pass_type: true,
            ..gala()
        };
        let manifest = assemble_pass(PassType::BoardingPass, &data, &config(), &ctx());
        assert_eq!(manifest.pass_type(), PassType::Generic);
        let json = to_json(&manifest);
        assert_eq!(style_keys(&json), vec!["generic"]);
        assert!(json["generic"].get("transitType").is_none());
    }

    #[test]
    fn test_identity_falls_back_to_config() {
        let manifest = assemble_pass(PassType::Generic, &gala(), &config(), &ctx());
        assert_eq!(manifest.organization_name, "Your Organization");
        assert_eq!(manifest.description, "Digital Pass");
        assert_eq!(manifest.pass_type_identifier, "pass.com.example.wallet");
        assert!(manifest.serial_number.starts_with("pass-1714564800000-"));

        let data = PassData {
            organization_name: Some("Acme".to_string()),
            description: Some("VIP entry".to_string()),
            ..gala()
        };
        let manifest = assemble_pass(PassType::Generic, &data, &config(), &ctx());
        assert_eq!(manifest.organization_name, "Acme");
        assert_eq!(manifest.description, "VIP entry");
    }

    #[test]
    fn test_default_colors() {
        let json = to_json(&assemble_pass(PassType::Generic, &gala(), &config(), &ctx()));
        assert_eq!(json["backgroundColor"], "#FFFFFF");
        assert_eq!(json["foregroundColor"], "#000000");
        assert_eq!(json["labelColor"], "#6B7280");
    }

    #[test]
    fn test_primary_color_backs_background() {
        let data = PassData {
            primary_color: Some("#00a8e1".to_string()),
            ..gala()
        };
        let manifest = assemble_pass(PassType::Generic, &data, &config(), &ctx());
        assert_eq!(manifest.background_color.as_str(), "#00a8e1");

        let data = PassData {
            background_color: Some("#112233".to_string()),
            ..data
        };
        let manifest = assemble_pass(PassType::Generic, &data, &config(), &ctx());
        assert_eq!(manifest.background_color.as_str(), "#112233");
    }

    #[test]
    fn test_optional_dates_and_voided() {
        let json = to_json(&assemble_pass(PassType::Generic, &gala(), &config(), &ctx()));
        assert!(json.get("relevantDate").is_none());
        assert!(json.get("expirationDate").is_none());
        assert!(json.get("voided").is_none());

        let data = PassData {
            relevant_date: Some("2024-05-01T18:30".to_string()),
            expiration_date: Some("2024-05-02".to_string()),
            voided: true,
            ..gala()
        };
        let json = to_json(&assemble_pass(PassType::Generic, &data, &config(), &ctx()));
        assert_eq!(json["relevantDate"], "2024-05-01T18:30:00Z");
        assert_eq!(json["expirationDate"], "2024-05-02T00:00:00Z");
        assert_eq!(json["voided"], true);
    }

    #[test]
    fn test_boarding_pass_transit_type() {
        let json = to_json(&assemble_pass(PassType::BoardingPass, &gala(), &config(), &ctx()));
        assert_eq!(json["boardingPass"]["transitType"], "PKTransitTypeAir");

        let data = PassData {
            transit_type: Some("train".to_string()),
            ..gala()
        };
        let json = to_json(&assemble_pass(PassType::BoardingPass, &data, &config(), &ctx()));
        assert_eq!(json["boardingPass"]["transitType"], "PKTransitTypeTrain");
    }

    #[test]
    fn test_web_service_requires_notifications_and_url() {
        let mut config = config();
        let data = PassData {
            notifications: true,
            ..gala()
        };
        let json = to_json(&assemble_pass(PassType::Generic, &data, &config, &ctx()));
        assert!(json.get("webServiceURL").is_none());

        config.web_service_url = Some("https://passes.example.com".to_string());
        let json = to_json(&assemble_pass(PassType::Generic, &data, &config, &ctx()));
        assert_eq!(json["webServiceURL"], "https://passes.example.com");
        let token = json["authenticationToken"].as_str().unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

        let quiet = PassData {
            notifications: false,
            ..gala()
        };
        let json = to_json(&assemble_pass(PassType::Generic, &quiet, &config, &ctx()));
        assert!(json.get("authenticationToken").is_none());
    }

    #[test]
    fn test_empty_groups_are_present() {
        let json = to_json(&assemble_pass(PassType::Coupon, &PassData::default(), &config(), &ctx()));
        for group in ["headerFields", "primaryFields", "secondaryFields", "auxiliaryFields", "backFields"] {
            assert!(json["coupon"][group].is_array(), "{group}");
        }
    }

    #[test]
    fn test_manifest_round_trips_through_json() {
        let manifest = assemble_pass(PassType::StoreCard, &gala(), &config(), &ctx());
        let bytes = manifest.to_json_bytes().unwrap();
        let parsed: Manifest = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_transit_type_parsing() {
        assert_eq!(TransitType::parse(None), TransitType::Air);
        assert_eq!(TransitType::parse(Some("Bus")), TransitType::Bus);
        assert_eq!(TransitType::parse(Some("PKTransitTypeBoat")), TransitType::Boat);
        assert_eq!(TransitType::parse(Some("zeppelin")), TransitType::Air);
    }
}
