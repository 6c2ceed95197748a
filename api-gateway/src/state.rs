//! Shared application state.

use std::sync::Arc;

use tokio::sync::Mutex;

use chain::{Engine, MetricsRegistry};

/// Shared state held by the API and request handlers.
///
/// This is wrapped in an [`Arc`] and passed to handlers via Axum's `State`
/// extractor. The engine owns every node's mempool and chain directly, so
/// unlike a typical block-producer design there is no separate pending-tx
/// pool here — `/txn/create` writes straight into the owning node's
/// mempool.
pub struct AppState {
    /// Embedded Proof-of-Knowledge engine.
    pub engine: Mutex<Engine>,
    /// Metrics registry shared between the engine and the API.
    pub metrics: Arc<MetricsRegistry>,
}

/// Thread-safe alias for `AppState`.
pub type SharedState = Arc<AppState>;
