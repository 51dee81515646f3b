//! # Pass Build Orchestrator
//!
//! Sequences one build through its states:
//!
//! ```text
//! Idle -> CertificatesChecked -> Assembled -> AssetsResolved -> Signed
//!   \            \                    \              \
//!    +------------+--------------------+--------------+--> Failed(kind)
//! ```
//!
//! - **Idle → CertificatesChecked**: the credential files must exist and be
//!   readable, otherwise the build fails with a configuration error.
//! - **CertificatesChecked → Assembled**: field mapping, barcode resolution
//!   and manifest assembly. Pure; malformed input passes through.
//! - **Assembled → AssetsResolved**: image decoding. Never fails.
//! - **AssetsResolved → Signed**: the [`PassSigner`] produces the archive;
//!   its errors are rewrapped as [`BuildError::Signing`].
//!
//! There are no retries. Every failure is terminal for its request, and a
//! build yields either a complete signed buffer or nothing.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::assets::resolve_assets;
use crate::certificates::load_credentials;
use crate::config::PassConfig;
use crate::data::PassData;
use crate::error::{BuildError, ErrorKind};
use crate::manifest::{assemble_pass, BuildContext, Manifest};
use crate::pass_type::PassType;
use crate::serial::SerialNumber;
use crate::signer::{ManifestInspector, PassBundle, PassSigner};

/// State of one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    CertificatesChecked,
    Assembled,
    AssetsResolved,
    Signed,
    /// Terminal; carries the class of the error that ended the build.
    Failed(ErrorKind),
}

impl BuildState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Signed | Self::Failed(_))
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::CertificatesChecked => "certificates_checked",
            Self::Assembled => "assembled",
            Self::AssetsResolved => "assets_resolved",
            Self::Signed => "signed",
            Self::Failed(kind) => return write!(f, "failed({kind})"),
        };
        f.write_str(name)
    }
}

/// A validated build request.
#[derive(Debug, Clone, PartialEq)]
pub struct PassBuildRequest {
    /// Requested type; may be overridden by `customPassType`.
    pub pass_type: PassType,
    pub data: PassData,
}

impl PassBuildRequest {
    pub fn new(pass_type: PassType, data: PassData) -> Self {
        Self { pass_type, data }
    }

    /// Build a request from possibly-missing wire fields.
    pub fn from_parts(pass_type: Option<&str>, data: Option<PassData>) -> Result<Self, BuildError> {
        let (Some(pass_type), Some(data)) = (pass_type, data) else {
            return Err(BuildError::Validation(
                "passType and passData are required".to_string(),
            ));
        };
        Ok(Self::new(pass_type.parse()?, data))
    }
}

/// The output of a successful build.
#[derive(Debug, Clone)]
pub struct SignedPass {
    /// The signed archive.
    pub bytes: Vec<u8>,
    pub serial: SerialNumber,
    /// The effective pass type written into the manifest.
    pub pass_type: PassType,
    pub build_id: Uuid,
    pub issued_at: DateTime<Utc>,
}

impl SignedPass {
    /// Download filename: `<prefix>-<unix-millis>.pkpass`.
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{prefix}-{}.pkpass", self.issued_at.timestamp_millis())
    }
}

/// Runs builds against one configuration and signer.
pub struct PassBuilder<'a> {
    config: &'a PassConfig,
    signer: &'a dyn PassSigner,
    inspector: Option<&'a dyn ManifestInspector>,
}

impl<'a> PassBuilder<'a> {
    pub fn new(config: &'a PassConfig, signer: &'a dyn PassSigner) -> Self {
        Self {
            config,
            signer,
            inspector: None,
        }
    }

    /// Attach an advisory manifest check. Findings are logged only.
    pub fn with_inspector(mut self, inspector: &'a dyn ManifestInspector) -> Self {
        self.inspector = Some(inspector);
        self
    }

    /// Assemble the manifest a build would sign, without credentials.
    pub fn preview_manifest(&self, request: &PassBuildRequest) -> Manifest {
        let manifest = assemble_pass(
            request.pass_type,
            &request.data,
            self.config,
            &BuildContext::now(),
        );
        self.inspect(&manifest);
        manifest
    }

    /// Run a full build.
    pub fn build(&self, request: &PassBuildRequest) -> Result<SignedPass, BuildError> {
        let build_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "pass_build",
            %build_id,
            pass_type = %request.pass_type,
        );
        let _guard = span.enter();
        let started = Instant::now();

        let result = self.run(request, build_id);

        let outcome = match &result {
            Ok(_) => "signed",
            Err(e) => match e.kind() {
                ErrorKind::Configuration => "configuration_error",
                ErrorKind::Validation => "validation_error",
                ErrorKind::Signing => "signing_error",
                ErrorKind::Internal => "internal_error",
            },
        };
        metrics::counter!("wpass_builds_total", "outcome" => outcome).increment(1);
        metrics::histogram!("wpass_build_duration_seconds").record(started.elapsed().as_secs_f64());

        match &result {
            Ok(pass) => tracing::info!(
                serial = %pass.serial,
                bytes = pass.bytes.len(),
                "pass signed"
            ),
            Err(e) if e.kind() == ErrorKind::Signing => tracing::error!(error = %e, "build failed"),
            Err(e) => tracing::warn!(error = %e, "build failed"),
        }
        result
    }

    fn run(&self, request: &PassBuildRequest, build_id: Uuid) -> Result<SignedPass, BuildError> {
        let mut state = BuildState::Idle;
        let result = self.run_steps(request, build_id, &mut state);
        if let Err(e) = &result {
            let failed = BuildState::Failed(e.kind());
            tracing::debug!(from = %state, to = %failed, reason = %e, "build state");
            state = failed;
        }
        debug_assert!(state.is_terminal());
        result
    }

    /// Walk the happy path, leaving `state` at the last state reached.
    fn run_steps(
        &self,
        request: &PassBuildRequest,
        build_id: Uuid,
        state: &mut BuildState,
    ) -> Result<SignedPass, BuildError> {
        let credentials = load_credentials(
            &self.config.certificates,
            self.config.signer_key_passphrase.as_deref(),
        )?;
        advance(state, BuildState::CertificatesChecked);

        let ctx = BuildContext::now();
        let manifest = assemble_pass(request.pass_type, &request.data, self.config, &ctx);
        self.inspect(&manifest);
        let pass_type = manifest.pass_type();
        let pass_json = manifest
            .to_json_bytes()
            .map_err(|e| BuildError::Internal(format!("manifest serialization: {e}")))?;
        advance(state, BuildState::Assembled);

        let assets = resolve_assets(&request.data);
        advance(state, BuildState::AssetsResolved);

        let bundle = PassBundle { pass_json, assets };
        let bytes = self
            .signer
            .sign(&bundle, &credentials)
            .map_err(|e| BuildError::Signing(e.to_string()))?;
        advance(state, BuildState::Signed);

        Ok(SignedPass {
            bytes,
            serial: ctx.serial,
            pass_type,
            build_id,
            issued_at: ctx.issued_at,
        })
    }

    fn inspect(&self, manifest: &Manifest) {
        let Some(inspector) = self.inspector else {
            return;
        };
        let value = match serde_json::to_value(manifest) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "manifest could not be inspected");
                return;
            }
        };
        for finding in inspector.inspect(&value) {
            tracing::warn!(finding = %finding, "manifest check");
        }
    }
}

fn advance(state: &mut BuildState, next: BuildState) {
    tracing::debug!(from = %state, to = %next, "build state");
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BarcodeSpec;
    use crate::mock::{FailingSigner, MockSigner};
    use std::path::Path;
    use std::sync::Mutex;

    fn config_with_certs(dir: &Path) -> PassConfig {
        let config = PassConfig::with_certificates_dir(dir);
        for path in [
            &config.certificates.wwdr,
            &config.certificates.signer_cert,
            &config.certificates.signer_key,
        ] {
            std::fs::write(path, b"-----BEGIN TEST-----").unwrap();
        }
        config
    }

    fn gala() -> PassBuildRequest {
        PassBuildRequest::new(
            PassType::EventTicket,
            PassData {
                title: Some("Gala".to_string()),
                location: Some("Hall A".to_string()),
                date: Some("2024-05-01".to_string()),
                barcode: Some(BarcodeSpec::Enabled(true)),
                ..Default::default()
            },
        )
    }

    fn pass_json(bytes: &[u8]) -> serde_json::Value {
        let text = std::str::from_utf8(bytes).unwrap();
        let (_, json) = text.split_once("\n\n").unwrap();
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_missing_certificates_fail_before_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let config = PassConfig::with_certificates_dir(dir.path());
        let err = PassBuilder::new(&config, &MockSigner).build(&gala()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().starts_with("certificate missing: WWDR"));
    }

    #[test]
    fn test_successful_build_reaches_signer() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_certs(dir.path());
        let pass = PassBuilder::new(&config, &MockSigner).build(&gala()).unwrap();
        assert_eq!(pass.pass_type, PassType::EventTicket);
        assert!(pass.serial.as_str().starts_with("pass-"));
        assert!(pass.file_name("pass").ends_with(".pkpass"));

        let listing = String::from_utf8(pass.bytes.clone()).unwrap();
        assert!(listing.contains("icon.png "));
        assert!(listing.contains("icon@2x.png "));
        assert!(listing.contains("logo.png "));

        let json = pass_json(&pass.bytes);
        assert_eq!(json["serialNumber"], pass.serial.as_str());
        assert_eq!(json["eventTicket"]["primaryFields"][0]["value"], "Gala");
    }

    #[test]
    fn test_signer_failure_is_rewrapped() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_certs(dir.path());
        let signer = FailingSigner::new("bad passphrase");
        let err = PassBuilder::new(&config, &signer).build(&gala()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Signing);
        assert!(err.to_string().starts_with("signing failed: "));
        assert!(err.to_string().contains("bad passphrase"));
    }

    #[test]
    fn test_invalid_strip_image_does_not_escape() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_certs(dir.path());
        let mut request = gala();
        request.data.strip_image = Some("!!not base64!!".to_string());
        let pass = PassBuilder::new(&config, &MockSigner).build(&request).unwrap();
        let listing = String::from_utf8(pass.bytes).unwrap();
        assert!(!listing.contains("strip.png"));
    }

    #[test]
    fn test_custom_layout_builds_generic() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_certs(dir.path());
        let request = PassBuildRequest::new(
            PassType::BoardingPass,
            PassData {
                custom_pass_type: true,
                ..gala().data
            },
        );
        let pass = PassBuilder::new(&config, &MockSigner).build(&request).unwrap();
        assert_eq!(pass.pass_type, PassType::Generic);
        let json = pass_json(&pass.bytes);
        assert!(json.get("generic").is_some());
        assert!(json.get("boardingPass").is_none());
    }

    #[test]
    fn test_preview_needs_no_credentials() {
        let config = PassConfig::with_certificates_dir("/nonexistent");
        let manifest = PassBuilder::new(&config, &MockSigner).preview_manifest(&gala());
        assert_eq!(manifest.pass_type(), PassType::EventTicket);
        assert_eq!(manifest.barcodes.len(), 1);
    }

    struct RecordingInspector(Mutex<usize>);

    impl ManifestInspector for RecordingInspector {
        fn inspect(&self, manifest: &serde_json::Value) -> Vec<String> {
            *self.0.lock().unwrap() += 1;
            assert!(manifest.get("formatVersion").is_some());
            vec!["advisory finding".to_string()]
        }
    }

    #[test]
    fn test_inspector_findings_do_not_fail_build() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_certs(dir.path());
        let inspector = RecordingInspector(Mutex::new(0));
        let builder = PassBuilder::new(&config, &MockSigner).with_inspector(&inspector);
        builder.build(&gala()).unwrap();
        assert_eq!(*inspector.0.lock().unwrap(), 1);
    }

    #[test]
    fn test_request_from_parts() {
        let err = PassBuildRequest::from_parts(None, Some(PassData::default())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = PassBuildRequest::from_parts(Some("eventTicket"), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = PassBuildRequest::from_parts(Some("zeppelin"), Some(PassData::default()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let request =
            PassBuildRequest::from_parts(Some("boarding"), Some(PassData::default())).unwrap();
        assert_eq!(request.pass_type, PassType::BoardingPass);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(BuildState::CertificatesChecked.to_string(), "certificates_checked");
        assert_eq!(
            BuildState::Failed(ErrorKind::Signing).to_string(),
            "failed(signing)"
        );
        assert_eq!(
            BuildState::Failed(ErrorKind::Configuration).to_string(),
            "failed(configuration)"
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(BuildState::Signed.is_terminal());
        assert!(BuildState::Failed(ErrorKind::Internal).is_terminal());
        assert!(!BuildState::Idle.is_terminal());
        assert!(!BuildState::AssetsResolved.is_terminal());
    }
}
