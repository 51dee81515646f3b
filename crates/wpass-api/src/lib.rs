//! # wpass-api: Axum API for Wallet Pass Builds
//!
//! HTTP surface over the pass build orchestrator in `wpass-core`, signing
//! with `wpass-crypto` and checking manifests with `wpass-schema`.
//!
//! ## API Surface
//!
//! | Route                 | Module               | Purpose                          |
//! |-----------------------|----------------------|----------------------------------|
//! | `POST /passes`        | [`routes::passes`]   | Build and download a signed pass |
//! | `GET /passes`         | [`routes::passes`]   | Certificate precondition status  |
//! | `POST /generic-pass`  | [`routes::passes`]   | Generic pass from bare pass data |
//! | `GET /health/*`       | [`routes::health`]   | Liveness and readiness probes    |
//! | `GET /metrics`        | [`routes::health`]   | Prometheus exposition            |
//! | `GET /openapi.json`   | [`openapi`]          | OpenAPI document                 |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CorsLayer → MetricsMiddleware → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - Handlers never block the runtime: builds run on the blocking pool.
//! - Pass configuration is read per request, never cached.
//! - Every failure leaves the API as `{"error": "<message>"}`.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::http::{header, Method};
use axum::middleware::from_fn;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION]);

    Router::new()
        .merge(routes::passes::router())
        .merge(routes::health::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(cors)
        .layer(middleware::tracing_layer::layer())
        .with_state(state)
}
