// chain/src/types/node.rs

//! Per-node mutable state: mempool, chain, progress, reputation, and the
//! append-only consensus-history log.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::block::Block;
use super::tx::Transaction;

/// One consensus-history snapshot: the answer-share distribution for a
/// question at a point in time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub timestamp: f64,
    pub shares: HashMap<String, f64>,
}

/// A participant in the network. Owns its own mempool, chain, and
/// reputation; the engine owns the table of nodes but never reaches into
/// this state except through the consensus operations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub pubkey: String,
    pub archetype: String,
    pub mempool: Vec<Transaction>,
    pub chain: Vec<Block>,
    pub progress: usize,
    pub reputation: f64,
    pub consensus_history: HashMap<String, Vec<HistorySnapshot>>,
}

impl Node {
    pub fn new(pubkey: impl Into<String>, archetype: impl Into<String>, reputation: f64) -> Self {
        Self {
            pubkey: pubkey.into(),
            archetype: archetype.into(),
            mempool: Vec::new(),
            chain: Vec::new(),
            progress: 0,
            reputation,
            consensus_history: HashMap::new(),
        }
    }

    /// Every transaction visible to this node: its mempool plus every
    /// transaction recorded in any block of its chain.
    pub fn visible_txns(&self) -> impl Iterator<Item = &Transaction> {
        self.mempool
            .iter()
            .chain(self.chain.iter().flat_map(|b| b.txns.iter()))
    }
}
