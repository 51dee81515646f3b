//! # Middleware
//!
//! Request metrics and request/response tracing.

pub mod metrics;
pub mod tracing_layer;
