//! # Asset Resolver
//!
//! Decodes the inline image payloads of a request into the named PNG buffers
//! bundled beside `pass.json`.
//!
//! `icon.png`, `icon@2x.png` and `logo.png` are always present: when the user
//! supplied no usable image, a built-in 29x29 placeholder is used. Every other
//! file appears only when its payload decodes. Decode failures are logged and
//! the asset is treated as absent; they never abort a build.

use std::collections::BTreeMap;

use base64::alphabet;
use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use base64::Engine as _;
use thiserror::Error;

use crate::data::{non_empty, PassData};

/// Built-in 29x29 PNG used when no icon or logo is supplied.
pub const PLACEHOLDER_ICON: &[u8] = include_bytes!("../assets/placeholder-icon.png");

/// Standard alphabet, tolerant of missing or present padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Image roles a request may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    Icon,
    Logo,
    Strip,
    Background,
    Thumbnail,
    Footer,
}

impl ImageRole {
    pub const ALL: [ImageRole; 6] = [
        ImageRole::Icon,
        ImageRole::Logo,
        ImageRole::Strip,
        ImageRole::Background,
        ImageRole::Thumbnail,
        ImageRole::Footer,
    ];

    /// Base filename of the asset (`strip` for `strip.png`).
    pub fn stem(&self) -> &'static str {
        match self {
            Self::Icon => "icon",
            Self::Logo => "logo",
            Self::Strip => "strip",
            Self::Background => "background",
            Self::Thumbnail => "thumbnail",
            Self::Footer => "footer",
        }
    }

    fn payload<'a>(&self, data: &'a PassData) -> Option<&'a str> {
        let field = match self {
            Self::Icon => &data.icon_image,
            Self::Logo => &data.logo_image,
            Self::Strip => &data.strip_image,
            Self::Background => &data.background_image,
            Self::Thumbnail => &data.thumbnail_image,
            Self::Footer => &data.footer_image,
        };
        non_empty(field)
    }
}

/// A payload that could not be turned into image bytes.
#[derive(Error, Debug)]
pub enum AssetDecodeError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload decoded to zero bytes")]
    Empty,
}

/// Decode one inline image payload.
///
/// Strips an optional `data:<mime>;base64,` prefix and any whitespace.
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>, AssetDecodeError> {
    let body = match payload.trim().split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => payload.trim(),
    };
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = PAYLOAD_ENGINE.decode(compact.as_bytes())?;
    if bytes.is_empty() {
        return Err(AssetDecodeError::Empty);
    }
    Ok(bytes)
}

/// Named image buffers bundled with a pass, ordered by filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSet {
    files: BTreeMap<String, Vec<u8>>,
}

impl AssetSet {
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(name.into(), bytes);
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Resolve every image of a request into an [`AssetSet`].
pub fn resolve_assets(data: &PassData) -> AssetSet {
    let mut assets = AssetSet::default();
    for role in ImageRole::ALL {
        let decoded = role.payload(data).and_then(|payload| {
            decode_image_payload(payload)
                .map_err(|e| {
                    tracing::warn!(role = role.stem(), error = %e, "image payload ignored");
                })
                .ok()
        });
        let stem = role.stem();
        match (role, decoded) {
            (ImageRole::Icon, decoded) => {
                let bytes = decoded.unwrap_or_else(|| PLACEHOLDER_ICON.to_vec());
                assets.insert("icon@2x.png", bytes.clone());
                assets.insert("icon.png", bytes);
            }
            (ImageRole::Logo, None) => {
                assets.insert("logo.png", PLACEHOLDER_ICON.to_vec());
            }
            (_, Some(bytes)) => {
                assets.insert(format!("{stem}@2x.png"), bytes.clone());
                assets.insert(format!("{stem}.png"), bytes);
            }
            (_, None) => {}
        }
    }
    tracing::debug!(count = assets.len(), "assets resolved");
    assets
}
