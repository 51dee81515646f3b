//! # wpass-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for pass builds.
//! Binds to `PORT` (default 3000); `LOG_FORMAT=json` switches to JSON logs.

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;
use wpass_api::state::{AppConfig, AppState, LogFormat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();

    // Initialize structured tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let mut state = AppState::new();
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_prometheus(handle),
        Err(e) => tracing::warn!("Prometheus recorder not installed: {e}"),
    }

    // Report credential status once at startup; builds re-check per request.
    match state.pass_config() {
        Ok(pass_config) => {
            let status = wpass_core::check_certificates(&pass_config.certificates);
            if status.valid {
                tracing::info!(pass_type_identifier = %pass_config.pass_type_identifier, "{}", status.message);
            } else {
                tracing::warn!("{}. Builds will fail until the file is provided.", status.message);
            }
        }
        Err(e) => tracing::error!("Pass configuration invalid: {e}"),
    }

    let app = wpass_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Wallet pass API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
