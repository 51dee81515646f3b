//! # Pass Types
//!
//! The five pass styles a manifest can carry. Exactly one of them keys the
//! field-group object of a manifest.
//!
//! Requests may name a type by its canonical manifest key (`eventTicket`) or
//! by the short names the editor uses (`event`, `boarding`, `loyalty`).
//! `custom` is accepted and always downgraded to [`PassType::Generic`], the
//! only style that tolerates arbitrary field layouts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::data::PassData;
use crate::error::BuildError;

/// A wallet pass style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PassType {
    EventTicket,
    BoardingPass,
    Coupon,
    StoreCard,
    Generic,
}

impl PassType {
    /// All pass types, in manifest-key order.
    pub const ALL: [PassType; 5] = [
        PassType::EventTicket,
        PassType::BoardingPass,
        PassType::Coupon,
        PassType::StoreCard,
        PassType::Generic,
    ];

    /// The manifest key for this style.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventTicket => "eventTicket",
            Self::BoardingPass => "boardingPass",
            Self::Coupon => "coupon",
            Self::StoreCard => "storeCard",
            Self::Generic => "generic",
        }
    }

    /// Resolve the type actually written into the manifest.
    ///
    /// A request that asks for full customization (`customPassType`) is
    /// always built as `generic`, whatever type the caller named.
    pub fn effective(self, data: &PassData) -> PassType {
        if data.custom_pass_type {
            PassType::Generic
        } else {
            self
        }
    }
}

impl fmt::Display for PassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassType {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eventticket" | "event" => Ok(Self::EventTicket),
            "boardingpass" | "boarding" => Ok(Self::BoardingPass),
            "coupon" => Ok(Self::Coupon),
            "storecard" | "store" | "loyalty" => Ok(Self::StoreCard),
            "generic" | "custom" => Ok(Self::Generic),
            "" => Err(BuildError::Validation("passType must not be empty".to_string())),
            other => Err(BuildError::Validation(format!("unknown passType: {other}"))),
        }
    }
}

impl<'de> Deserialize<'de> for PassType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
