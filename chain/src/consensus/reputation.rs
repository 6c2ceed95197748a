//! Reputation updates triggered by a successful Proof-of-Knowledge block.
//!
//! Implements the thought-leader bonus: an attester whose correct vote
//! landed before the crowd's running agreement crossed
//! `thought_leader_thresh` earns `thought_leader_bonus` times the usual
//! `log(1 + reputation)` weight; once consensus is visibly forming, later
//! correct attesters earn 1x. This replays the attestation sequence rather
//! than consulting `consensus_history`, so the reward is deterministic
//! given the attestation set and independent of when sync snapshots were
//! taken.
//!
//! Attestations sharing the exact same timestamp are scored as one batch:
//! every member reads the running distribution as of *before* the batch
//! started, but reputation mutation still applies member-by-member in
//! order, so a repeat attester within the batch sees its own just-applied
//! bonus by the time its second vote is weighted. Only once the whole
//! batch is scored does the running distribution advance by all of the
//! batch's hashes at once.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::{Node, Transaction, TransactionKind};

use super::config::ConsensusConfig;

/// Applies the thought-leader reputation rule for one mined completion.
///
/// `visible` is every attestation/ap_reveal transaction for the mined
/// question visible to the mining node, in arbitrary order; this function
/// sorts it by timestamp before replaying.
pub fn apply_reputation_update(
    cfg: &ConsensusConfig,
    nodes: &mut HashMap<String, Node>,
    mined_hash: &str,
    mut visible: Vec<Transaction>,
) {
    visible.sort_by(|a, b| {
        a.timestamp
            .partial_cmp(&b.timestamp)
            .unwrap_or(Ordering::Equal)
    });

    let mut running: HashMap<String, u64> = HashMap::new();
    let mut running_total: u64 = 0;

    let mut i = 0;
    while i < visible.len() {
        let mut j = i + 1;
        while j < visible.len() && visible[j].timestamp == visible[i].timestamp {
            j += 1;
        }

        let prop_at_time = if running_total == 0 {
            0.0
        } else {
            let dominant = running.values().cloned().max().unwrap_or(0);
            dominant as f64 / running_total as f64
        };

        for txn in &visible[i..j] {
            if !txn.is_vote() || txn.payload.hash != mined_hash {
                continue;
            }
            if let Some(attester) = nodes.get_mut(&txn.owner_pubkey) {
                let bonus = if prop_at_time < cfg.thought_leader_thresh {
                    cfg.thought_leader_bonus
                } else {
                    1.0
                };
                let weight = (attester.reputation + 1.0).ln();
                attester.reputation += bonus * weight;
            }
        }

        for txn in &visible[i..j] {
            *running.entry(txn.payload.hash.clone()).or_insert(0) += 1;
            running_total += 1;
        }

        i = j;
    }
}
