//! # Color and Value Normalizer
//!
//! Converts user-entered tokens into the enumerated values of the pass
//! format: colors, text alignment, date/time styles, and relevance dates.
//!
//! None of these functions fail. Malformed input is passed through (colors,
//! dates) or mapped to the neutral value (alignment, styles); the signer is
//! the final authority on what it accepts.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// A color value as written into the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the token is a well-formed `#RRGGBB` value.
    pub fn is_hex(&self) -> bool {
        is_hex_rgb(&self.0)
    }
}

/// Normalize a user color.
///
/// `#RRGGBB` is returned unchanged. Anything else, surrounding whitespace
/// included, is passed through unmodified; a malformed `#`-prefixed value is
/// logged.
pub fn normalize_color(input: &str) -> ColorToken {
    if input.starts_with('#') && !is_hex_rgb(input) {
        tracing::warn!(color = %input, "color is not a #RRGGBB value; passing through");
    }
    ColorToken(input.to_string())
}

fn is_hex_rgb(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Text alignment of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    #[serde(rename = "PKTextAlignmentLeft")]
    Left,
    #[serde(rename = "PKTextAlignmentCenter")]
    Center,
    #[serde(rename = "PKTextAlignmentRight")]
    Right,
    #[serde(rename = "PKTextAlignmentNatural")]
    Natural,
}

/// Map `left`/`center`/`right` to their alignment; everything else is natural.
pub fn normalize_alignment(input: Option<&str>) -> Alignment {
    let Some(raw) = input else {
        return Alignment::Natural;
    };
    let token = raw.trim().to_ascii_lowercase();
    let token = token.strip_prefix("pktextalignment").unwrap_or(&token);
    match token {
        "left" => Alignment::Left,
        "center" => Alignment::Center,
        "right" => Alignment::Right,
        _ => Alignment::Natural,
    }
}

// ---------------------------------------------------------------------------
// Date and time styles
// ---------------------------------------------------------------------------

/// Display style of a date or time field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateStyle {
    #[serde(rename = "PKDateStyleShort")]
    Short,
    #[serde(rename = "PKDateStyleMedium")]
    Medium,
    #[serde(rename = "PKDateStyleLong")]
    Long,
    #[serde(rename = "PKDateStyleFull")]
    Full,
}

/// Parse a style preference. `none`, absent, and unknown values yield `None`,
/// meaning no style attribute is attached.
pub fn normalize_date_style(input: Option<&str>) -> Option<DateStyle> {
    let token = input?.trim().to_ascii_lowercase();
    let token = token.strip_prefix("pkdatestyle").unwrap_or(&token);
    match token {
        "short" => Some(DateStyle::Short),
        "medium" => Some(DateStyle::Medium),
        "long" => Some(DateStyle::Long),
        "full" => Some(DateStyle::Full),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Relevance dates
// ---------------------------------------------------------------------------

/// Normalize a relevance or expiration date to a W3C timestamp.
///
/// Accepts RFC 3339, the `YYYY-MM-DDTHH:MM[:SS]` value of an HTML
/// `datetime-local` input (read as UTC), and bare `YYYY-MM-DD` dates.
/// Unparseable input is passed through unchanged.
pub fn normalize_w3c_date(input: &str) -> String {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.to_rfc3339_opts(SecondsFormat::Secs, true);
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return naive.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true);
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return midnight.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true);
    }
    tracing::debug!(date = %trimmed, "unrecognized date format; passing through");
    trimmed.to_string()
}
