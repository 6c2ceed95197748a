//! Pairwise peer sync: longest-chain adoption plus sampled attestation
//! gossip.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::types::{HistorySnapshot, Node, Transaction, TransactionKind};

use super::config::ConsensusConfig;
use super::convergence::unweighted_shares;
use super::error::EngineError;

/// Syncs two nodes against each other.
///
/// Three steps. First, longest chain wins outright: the shorter chain is
/// replaced by a clone of the longer one; a tie mutates neither. Second,
/// both nodes snapshot their mempools before any mutation, draw one shared
/// random sample `G` from the combined, deduplicated set of plain
/// attestations across both mempools, and each adopts (by transaction id)
/// everything in its partner's *pre-sync* mempool plus everything in `G`.
/// Third, every question id that appears in `G` gets a fresh unweighted
/// consensus-history snapshot appended to both nodes.
pub fn sync_nodes(
    cfg: &ConsensusConfig,
    rng: &mut StdRng,
    nodes: &mut HashMap<String, Node>,
    pubkey_a: &str,
    pubkey_b: &str,
    now: f64,
) -> Result<(), EngineError> {
    if !nodes.contains_key(pubkey_a) {
        return Err(EngineError::NotFound(pubkey_a.to_string()));
    }
    if !nodes.contains_key(pubkey_b) {
        return Err(EngineError::NotFound(pubkey_b.to_string()));
    }

    let (mempool_a, chain_len_a) = {
        let a = &nodes[pubkey_a];
        (a.mempool.clone(), a.chain.len())
    };
    let (mempool_b, chain_len_b) = {
        let b = &nodes[pubkey_b];
        (b.mempool.clone(), b.chain.len())
    };

    if chain_len_a != chain_len_b {
        let (longer, shorter) = if chain_len_a > chain_len_b {
            (pubkey_a, pubkey_b)
        } else {
            (pubkey_b, pubkey_a)
        };
        let adopted = nodes[longer].chain.clone();
        nodes.get_mut(shorter).unwrap().chain = adopted;
    }

    let gossip_set = sample_gossip_set(cfg, rng, &mempool_a, &mempool_b);

    nodes.get_mut(pubkey_a).unwrap().mempool =
        merge_into_mempool(&mempool_a, &mempool_b, &gossip_set);
    nodes.get_mut(pubkey_b).unwrap().mempool =
        merge_into_mempool(&mempool_b, &mempool_a, &gossip_set);

    let question_ids: HashSet<&str> = gossip_set
        .iter()
        .map(|t| t.question_id.as_str())
        .collect();

    for question_id in question_ids {
        for pubkey in [pubkey_a, pubkey_b] {
            let shares = unweighted_shares(&nodes[pubkey], question_id, now);
            nodes
                .get_mut(pubkey)
                .unwrap()
                .consensus_history
                .entry(question_id.to_string())
                .or_default()
                .push(HistorySnapshot {
                    timestamp: now,
                    shares,
                });
        }
    }

    Ok(())
}

/// Draws the single shared gossip sample `G`: a floor-sized, uniform,
/// without-replacement sample of the deduplicated union of plain
/// attestations (never completions or `ap_reveal`) across both mempools.
/// A combined set small enough that the floor rounds to zero yields an
/// empty sample.
fn sample_gossip_set(
    cfg: &ConsensusConfig,
    rng: &mut StdRng,
    mempool_a: &[Transaction],
    mempool_b: &[Transaction],
) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    let mut combined: Vec<Transaction> = mempool_a
        .iter()
        .chain(mempool_b.iter())
        .filter(|t| t.kind == TransactionKind::Attestation)
        .filter(|t| seen.insert(t.id.clone()))
        .cloned()
        .collect();

    let sample_size = (combined.len() as f64 * cfg.gossip_sample_fraction).floor() as usize;

    combined.shuffle(rng);
    combined.truncate(sample_size);
    combined
}

/// `own`'s post-sync mempool: every transaction it already held, plus
/// anything it lacks (by id) from `partner`'s pre-sync mempool or from the
/// shared gossip sample `gossip_set`.
fn merge_into_mempool(
    own: &[Transaction],
    partner: &[Transaction],
    gossip_set: &[Transaction],
) -> Vec<Transaction> {
    let mut result = own.to_vec();
    let mut held: HashSet<String> = own.iter().map(|t| t.id.clone()).collect();

    for txn in partner.iter().chain(gossip_set.iter()) {
        if held.insert(txn.id.clone()) {
            result.push(txn.clone());
        }
    }
    result
}
