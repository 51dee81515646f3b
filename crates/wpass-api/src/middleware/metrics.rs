//! # Request Metrics
//!
//! Records every request through the `metrics` facade:
//!
//! - `wpass_http_requests_total{method, route, status}`
//! - `wpass_http_request_duration_seconds{method, route}`
//!
//! `route` is the matched route template, so request paths never become
//! label values. Without an installed recorder the macros are no-ops.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

const UNMATCHED_ROUTE: &str = "unmatched";

/// Middleware that counts requests and times them.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = route_label(request.extensions().get::<MatchedPath>());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    ::metrics::counter!(
        "wpass_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status
    )
    .increment(1);
    ::metrics::histogram!(
        "wpass_http_request_duration_seconds",
        "method" => method,
        "route" => route
    )
    .record(started.elapsed().as_secs_f64());

    response
}

fn route_label(matched: Option<&MatchedPath>) -> String {
    matched
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_requests_share_a_label() {
        assert_eq!(route_label(None), UNMATCHED_ROUTE);
    }
}
