//! # API Route Modules
//!
//! - `passes`: pass builds, certificate status, and generic passes.
//! - `health`: liveness and readiness probes, Prometheus metrics.

pub mod health;
pub mod passes;
