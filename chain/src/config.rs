//! Top-level configuration for an engine node.
//!
//! This module aggregates configuration for:
//!
//! - consensus parameters (`ConsensusConfig`),
//! - curriculum loading (path to the question catalog JSON file),
//! - metrics exporter (enable flag + listen address).
//!
//! The goal is to have a single `EngineConfig` struct that higher-level
//! binaries (e.g. `main.rs`) can construct from defaults, config files,
//! or environment variables as needed.

use std::net::SocketAddr;

use crate::consensus::ConsensusConfig;

/// Configuration for the Prometheus metrics exporter.
#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// Whether to run a `/metrics` HTTP exporter.
    pub enabled: bool,
    /// Address to bind the metrics HTTP server to.
    pub listen_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        let addr: SocketAddr = "127.0.0.1:9898"
            .parse()
            .expect("hard-coded metrics listen address should parse");
        Self {
            enabled: true,
            listen_addr: addr,
        }
    }
}

/// Top-level configuration for an engine node.
///
/// This aggregates all the sub-configs needed to wire up a typical node:
///
/// - consensus tuning (`consensus`),
/// - the curriculum JSON file to load at startup (`curriculum_path`),
/// - Prometheus metrics exporter (`metrics`).
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub consensus: ConsensusConfig,
    pub curriculum_path: String,
    pub metrics: MetricsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            consensus: ConsensusConfig::default(),
            curriculum_path: "curriculum.json".to_string(),
            metrics: MetricsConfig::default(),
        }
    }
}
