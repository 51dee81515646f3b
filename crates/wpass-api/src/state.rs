//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! Nothing here changes after startup. The signer and the schema validator
//! are shared read-only; pass configuration is produced fresh for every
//! request by the configured [`ConfigSource`], so credential rotation and
//! environment changes apply without a restart.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use wpass_core::{ConfigError, PassConfig, PassSigner};
use wpass_crypto::CmsPassSigner;
use wpass_schema::ManifestValidator;

/// Produces the pass configuration for one request.
pub type ConfigSource = Arc<dyn Fn() -> Result<PassConfig, ConfigError> + Send + Sync>;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Read `PORT` (default 3000) and `LOG_FORMAT` (`json` or text).
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(defaults.port);
        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self { port, log_format }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub signer: Arc<dyn PassSigner>,
    pub validator: Option<Arc<ManifestValidator>>,
    pub prometheus: Option<PrometheusHandle>,
    config_source: ConfigSource,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("validator", &self.validator.is_some())
            .field("prometheus", &self.prometheus.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Production state: CMS signing, schema checks, configuration from the
    /// environment.
    pub fn new() -> Self {
        let validator = match ManifestValidator::new() {
            Ok(v) => Some(Arc::new(v)),
            Err(e) => {
                tracing::warn!(error = %e, "manifest schema unavailable; builds will not be checked");
                None
            }
        };
        Self {
            signer: Arc::new(CmsPassSigner::new()),
            validator,
            prometheus: None,
            config_source: Arc::new(PassConfig::from_env),
        }
    }

    /// Replace the signer.
    pub fn with_signer(mut self, signer: impl PassSigner + 'static) -> Self {
        self.signer = Arc::new(signer);
        self
    }

    /// Serve every request with a fixed configuration.
    pub fn with_pass_config(mut self, config: PassConfig) -> Self {
        self.config_source = Arc::new(move || Ok::<_, ConfigError>(config.clone()));
        self
    }

    /// Produce configuration through an arbitrary source.
    pub fn with_config_source(
        mut self,
        source: impl Fn() -> Result<PassConfig, ConfigError> + Send + Sync + 'static,
    ) -> Self {
        self.config_source = Arc::new(source);
        self
    }

    /// Expose metrics recorded through this handle at `/metrics`.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Configuration for the current request.
    pub fn pass_config(&self) -> Result<PassConfig, ConfigError> {
        (self.config_source)()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
