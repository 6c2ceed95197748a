//! Consensus engine and related abstractions.
//!
//! This module provides a modular, testable consensus layer consisting of:
//!
//! - configuration parameters ([`config::ConsensusConfig`]),
//! - the convergence evaluator ([`convergence`]),
//! - reputation scoring ([`reputation`]),
//! - block proposal ([`proposer`]),
//! - peer sync ([`sync`]), and
//! - the [`engine::Engine`] that wires them together.

pub mod config;
pub mod convergence;
pub mod engine;
pub mod error;
pub mod proposer;
pub mod reputation;
pub mod sync;

pub use config::ConsensusConfig;
pub use engine::Engine;
pub use error::EngineError;
