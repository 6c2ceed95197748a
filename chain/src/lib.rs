//! Chain library crate.
//!
//! This crate provides the core building blocks for the Proof-of-Knowledge
//! peer-attestation engine:
//!
//! - strongly-typed domain types (`types`),
//! - a modular consensus engine (`consensus`),
//! - curriculum loading (`curriculum`),
//! - Prometheus-based metrics (`metrics`),
//! - and a top-level node configuration (`config`).
//!
//! Higher-level binaries (and the `api-gateway` crate) compose these
//! pieces to build running nodes.

pub mod config;
pub mod consensus;
pub mod curriculum;
pub mod metrics;
pub mod types;

// Re-export top-level configuration types.
pub use config::{EngineConfig, MetricsConfig};

// Re-export "core" consensus types.
pub use consensus::{ConsensusConfig, Engine, EngineError};

// Re-export curriculum loading.
pub use curriculum::load_curriculum;

// Re-export metrics registry and consensus metrics.
pub use metrics::{ConsensusMetrics, MetricsRegistry, run_prometheus_http_server};

// Re-export domain types at the crate root for convenience.
pub use types::*;
