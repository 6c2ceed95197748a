// api-gateway/src/main.rs

//! API gateway binary.
//!
//! This binary exposes the Proof-of-Knowledge engine's HTTP surface:
//!
//! - `GET /health`
//! - `GET /init`
//! - `GET /state/{pubkey}`
//! - `POST /node/add`
//! - `POST /txn/create`
//! - `POST /sync`
//! - `POST /block/propose/{pubkey}`
//! - `GET /convergence/{pubkey}/{qid}`
//! - `POST /ap_reveal`
//!
//! It embeds a `chain::Engine`, a Prometheus metrics exporter on
//! `/metrics`, and nothing else: block proposal is a caller-invoked
//! operation per node, not a background loop.

mod config;
mod routes;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::signal;

use chain::{load_curriculum, run_prometheus_http_server, Engine, EngineConfig, MetricsRegistry};
use config::ApiConfig;
use routes::{ap_reveal, blocks, convergence, health, init, nodes, sync, txns};
use state::{AppState, SharedState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "api_gateway=info,chain=info".to_string()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(%e, "fatal error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let api_cfg = ApiConfig::default();
    let engine_cfg = EngineConfig::default();

    // ---------------------------
    // Metrics
    // ---------------------------

    let metrics = Arc::new(
        MetricsRegistry::new()
            .map_err(|e| format!("failed to initialise metrics registry: {e}"))?,
    );

    if engine_cfg.metrics.enabled {
        let metrics_clone = metrics.clone();
        let addr = engine_cfg.metrics.listen_addr;
        tokio::spawn(async move {
            if let Err(e) = run_prometheus_http_server(metrics_clone, addr).await {
                tracing::error!(%e, "metrics HTTP server error");
            }
        });
        tracing::info!(%addr, "metrics exporter listening");
    }

    // ---------------------------
    // Engine
    // ---------------------------

    let curriculum = load_curriculum(&engine_cfg.curriculum_path)
        .map_err(|e| format!("failed to load curriculum: {e}"))?;
    tracing::info!(questions = curriculum.len(), "curriculum loaded");

    let engine = Engine::new(engine_cfg.consensus.clone(), curriculum);

    // ---------------------------
    // Shared state
    // ---------------------------

    let app_state: SharedState = Arc::new(AppState {
        engine: tokio::sync::Mutex::new(engine),
        metrics: metrics.clone(),
    });

    // ---------------------------
    // HTTP router
    // ---------------------------

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/init", get(init::init))
        .route("/state/{pubkey}", get(nodes::get_state))
        .route("/node/add", post(nodes::add_node))
        .route("/txn/create", post(txns::create_txn))
        .route("/sync", post(sync::sync))
        .route("/block/propose/{pubkey}", post(blocks::propose))
        .route("/convergence/{pubkey}/{qid}", get(convergence::get_convergence))
        .route("/ap_reveal", post(ap_reveal::ap_reveal))
        .with_state(app_state);

    tracing::info!(addr = %api_cfg.listen_addr, "API gateway listening");

    let listener = tokio::net::TcpListener::bind(api_cfg.listen_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", api_cfg.listen_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("API server error: {e}"))?;

    Ok(())
}

/// Waits for Ctrl-C and returns, used for graceful shutdown.
async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
