//! Prometheus-backed metrics and HTTP exporter.
//!
//! This module defines a [`MetricsRegistry`] that owns a Prometheus
//! registry and a set of strongly-typed consensus metrics, and an
//! async HTTP exporter that serves `/metrics` using `hyper`.

use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    Method, Request, Response, StatusCode, body::Incoming, header, server::conn::http1,
    service::service_fn,
};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use prometheus::{
    self, Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Consensus-related Prometheus metrics.
///
/// These are registered into a [`Registry`] and can be updated from
/// engine code.
#[derive(Clone)]
pub struct ConsensusMetrics {
    /// Blocks proposed, labeled by kind (`attestation` / `pok`).
    pub blocks_proposed_total: IntCounterVec,
    /// Thought-leader bonus reputation rewards granted.
    pub thought_leader_bonuses_total: IntCounterVec,
    /// Ordinary (non-bonus) reputation rewards granted.
    pub reputation_rewards_total: IntCounterVec,
    /// Pairwise sync operations completed.
    pub sync_operations_total: IntCounterVec,
    /// Time to evaluate convergence for one question, in seconds.
    pub convergence_eval_seconds: Histogram,
}

impl ConsensusMetrics {
    /// Registers consensus metrics into the given `Registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let blocks_proposed_total = IntCounterVec::new(
            Opts::new(
                "consensus_blocks_proposed_total",
                "Total blocks proposed, labeled by block kind",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(blocks_proposed_total.clone()))?;

        let thought_leader_bonuses_total = IntCounterVec::new(
            Opts::new(
                "consensus_thought_leader_bonuses_total",
                "Total reputation rewards granted at the thought-leader bonus rate",
            ),
            &["pubkey"],
        )?;
        registry.register(Box::new(thought_leader_bonuses_total.clone()))?;

        let reputation_rewards_total = IntCounterVec::new(
            Opts::new(
                "consensus_reputation_rewards_total",
                "Total reputation rewards granted at the ordinary rate",
            ),
            &["pubkey"],
        )?;
        registry.register(Box::new(reputation_rewards_total.clone()))?;

        let sync_operations_total = IntCounterVec::new(
            Opts::new(
                "consensus_sync_operations_total",
                "Total pairwise node sync operations completed",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(sync_operations_total.clone()))?;

        let convergence_eval_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "consensus_convergence_eval_seconds",
                "Time to evaluate the convergence score for one question",
            )
            .buckets(vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25,
            ]),
        )?;
        registry.register(Box::new(convergence_eval_seconds.clone()))?;

        Ok(Self {
            blocks_proposed_total,
            thought_leader_bonuses_total,
            reputation_rewards_total,
            sync_operations_total,
            convergence_eval_seconds,
        })
    }
}

/// Wrapper around a Prometheus registry and the consensus metrics.
///
/// This is the main handle you pass around in the node. It can be wrapped
/// in an [`Arc`] and shared across threads/tasks.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    pub consensus: ConsensusMetrics,
}

impl MetricsRegistry {
    /// Creates a new `MetricsRegistry` with a fresh underlying `Registry`
    /// and registers the consensus metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("chain".to_string()), None)?;
        let consensus = ConsensusMetrics::register(&registry)?;
        Ok(Self {
            registry,
            consensus,
        })
    }

    /// Encodes all metrics in this registry into the Prometheus text format.
    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            eprintln!("failed to encode Prometheus metrics: {e}");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// Runs an HTTP server that exposes Prometheus metrics.
///
/// The server listens on `addr` and serves `GET /metrics` with the
/// Prometheus text exposition format. All other paths return 404.
///
/// This function is `async` and is intended to be spawned onto a Tokio
/// runtime, e.g.:
///
/// ```ignore
/// let registry = Arc::new(MetricsRegistry::new()?);
/// let addr: SocketAddr = "127.0.0.1:9898".parse()?;
/// tokio::spawn(run_prometheus_http_server(registry.clone(), addr));
/// ```
pub async fn run_prometheus_http_server(
    metrics: Arc<MetricsRegistry>,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |req| {
                let metrics = metrics.clone();
                handle_request(req, metrics)
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, svc).await {
                eprintln!("prometheus HTTP server error: {err}");
            }
        });
    }
}

async fn handle_request(
    req: Request<Incoming>,
    metrics: Arc<MetricsRegistry>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/metrics") => {
            let body = metrics.gather_text();
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
                .body(Full::new(Bytes::from(body)))
                .unwrap())
        }
        _ => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("not found")))
            .unwrap()),
    }
}
