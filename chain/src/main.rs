// src/main.rs
//
// Minimal demo node that wires up the chain library:
//
// - Loads the curriculum from disk
// - Registers one demo node
// - Prometheus metrics exporter on /metrics
// - Proposes blocks for that node on a fixed interval.

use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use chain::{load_curriculum, run_prometheus_http_server, Engine, EngineConfig, MetricsRegistry};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run_node().await {
        tracing::error!(%err, "fatal error");
        std::process::exit(1);
    }
}

async fn run_node() -> Result<(), String> {
    let cfg = EngineConfig::default();

    let metrics = Arc::new(
        MetricsRegistry::new()
            .map_err(|e| format!("failed to initialise metrics registry: {e}"))?,
    );

    if cfg.metrics.enabled {
        let metrics_clone = metrics.clone();
        let addr = cfg.metrics.listen_addr;
        tokio::spawn(async move {
            if let Err(e) = run_prometheus_http_server(metrics_clone, addr).await {
                tracing::error!(%e, "metrics HTTP server error");
            }
        });
        tracing::info!(%addr, "metrics exporter listening");
    }

    let curriculum = load_curriculum(&cfg.curriculum_path)
        .map_err(|e| format!("failed to load curriculum: {e}"))?;
    tracing::info!(questions = curriculum.len(), "curriculum loaded");

    let mut engine = Engine::new(cfg.consensus.clone(), curriculum);
    let pubkey = "demo-node";
    engine.add_node(pubkey, "student", Some(1.0));

    tracing::info!(pubkey, "starting proposal loop");

    loop {
        let start = std::time::Instant::now();
        let now = current_unix_timestamp() as f64;

        match engine.propose(pubkey, now) {
            Ok(()) => {
                let elapsed = start.elapsed().as_secs_f64();
                metrics.consensus.convergence_eval_seconds.observe(elapsed);
            }
            Err(e) => {
                tracing::warn!(%e, "propose failed");
            }
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}

/// Returns the current wall-clock time as seconds since Unix epoch.
///
/// On error (system clock before epoch) this falls back to 0.
fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs()
}
