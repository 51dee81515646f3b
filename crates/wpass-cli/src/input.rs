//! # Pass Input Files
//!
//! Reads the pass data a command works on. The file is JSON unless its
//! extension is `.yaml` or `.yml`.
//!
//! Two shapes are accepted:
//!
//! - a bare pass data object, with the type given by `--type`;
//! - an API request body, `{"passType": ..., "passData": {...}}`. An explicit
//!   `--type` wins over the body's `passType`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use wpass_core::{PassBuildRequest, PassData};

/// Input selection shared by the pass commands.
#[derive(Args, Debug, Clone)]
pub struct PassInput {
    /// Pass type (`eventTicket`, `boardingPass`, `storeCard`, `coupon`,
    /// `generic`, or an editor alias such as `event` or `loyalty`).
    #[arg(long = "type", value_name = "TYPE")]
    pub pass_type: Option<String>,

    /// Pass data file (JSON, or YAML by extension).
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,
}

impl PassInput {
    /// Read and parse the input into a build request.
    pub fn load(&self) -> Result<PassBuildRequest> {
        let document = read_document(&self.input)?;
        request_from_document(self.pass_type.as_deref(), document)
            .with_context(|| format!("invalid pass input {}", self.input.display()))
    }
}

/// Read a JSON or YAML file into a JSON value.
pub fn read_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if is_yaml(path) {
        serde_yaml::from_str(&text).with_context(|| format!("invalid YAML in {}", path.display()))
    } else {
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
    }
}

/// Turn a parsed document into a build request.
pub fn request_from_document(pass_type: Option<&str>, document: Value) -> Result<PassBuildRequest> {
    let (body_type, data) = match document {
        Value::Object(mut object) if object.contains_key("passData") => {
            let body_type = object
                .remove("passType")
                .and_then(|t| t.as_str().map(str::to_string));
            let data = object.remove("passData").unwrap_or(Value::Null);
            (body_type, data)
        }
        other => (None, other),
    };
    let data: PassData = serde_json::from_value(data).context("pass data is not an object")?;
    let pass_type = pass_type.map(str::to_string).or(body_type);
    Ok(PassBuildRequest::from_parts(pass_type.as_deref(), Some(data))?)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wpass_core::PassType;

    #[test]
    fn test_bare_data_with_type() {
        let req = request_from_document(Some("event"), json!({"title": "Gala"})).unwrap();
        assert_eq!(req.pass_type, PassType::EventTicket);
        assert_eq!(req.data.title.as_deref(), Some("Gala"));
    }

    #[test]
    fn test_request_body_supplies_type() {
        let doc = json!({"passType": "coupon", "passData": {"discount": "10%"}});
        let req = request_from_document(None, doc).unwrap();
        assert_eq!(req.pass_type, PassType::Coupon);
        assert_eq!(req.data.discount.as_deref(), Some("10%"));
    }

    #[test]
    fn test_flag_overrides_body_type() {
        let doc = json!({"passType": "coupon", "passData": {}});
        let req = request_from_document(Some("storeCard"), doc).unwrap();
        assert_eq!(req.pass_type, PassType::StoreCard);
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let err = request_from_document(None, json!({"title": "Gala"})).unwrap_err();
        assert!(format!("{err:#}").contains("passType"));
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pass.yml");
        std::fs::write(&path, "title: Coffee Club\nmembershipNumber: M-1001\n").unwrap();
        let input = PassInput {
            pass_type: Some("loyalty".into()),
            input: path,
        };
        let req = input.load().unwrap();
        assert_eq!(req.pass_type, PassType::StoreCard);
        assert_eq!(req.data.membership_number.as_deref(), Some("M-1001"));
    }

    #[test]
    fn test_invalid_json_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pass.json");
        std::fs::write(&path, "{title").unwrap();
        let err = read_document(&path).unwrap_err();
        assert!(err.to_string().contains("pass.json"));
    }
}
