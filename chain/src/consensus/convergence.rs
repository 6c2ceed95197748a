//! Convergence evaluator: dominant-answer share over weighted attestations.

use std::collections::HashMap;

use crate::types::{Node, TransactionKind};

/// Weight assigned to an `ap_reveal` transaction; a teacher's revealed
/// answer always dominates ordinary attestation weighting.
const AP_REVEAL_WEIGHT: f64 = 10.0;

/// Computes the convergence score for `question_id` as seen by `node`.
///
/// Scans every attestation/ap_reveal transaction visible to `node` (its
/// mempool plus every block in its chain) for `question_id`, buckets them
/// by answer hash, and returns the dominant bucket's share of the total
/// weight. Attestations from an unregistered owner are discarded. Returns
/// `0.0` if no attestation weight is visible, which always fails the
/// quorum test.
pub fn convergence(
    nodes: &HashMap<String, Node>,
    node: &Node,
    question_id: &str,
    weighted: bool,
) -> f64 {
    let mut buckets: HashMap<&str, f64> = HashMap::new();

    for txn in node.visible_txns() {
        if txn.question_id != question_id || !txn.is_vote() {
            continue;
        }
        let Some(attester) = nodes.get(&txn.owner_pubkey) else {
            continue;
        };

        let weight = if matches!(txn.kind, TransactionKind::ApReveal) {
            AP_REVEAL_WEIGHT
        } else if weighted {
            (attester.reputation + 1.0).ln()
        } else {
            1.0
        };

        *buckets.entry(txn.payload.hash.as_str()).or_insert(0.0) += weight;
    }

    let total: f64 = buckets.values().sum();
    if total <= 0.0 {
        return 0.0;
    }
    buckets.values().cloned().fold(0.0, f64::max) / total
}

/// Unweighted answer-share distribution for `question_id`, as of `as_of`.
///
/// Used for consensus-history snapshots, which are always unweighted and
/// restricted to plain attestations (not `ap_reveal`).
pub fn unweighted_shares(node: &Node, question_id: &str, as_of: f64) -> HashMap<String, f64> {
    let mut dist: HashMap<String, f64> = HashMap::new();

    for txn in node.visible_txns() {
        if txn.question_id == question_id
            && txn.kind == TransactionKind::Attestation
            && txn.timestamp <= as_of
        {
            *dist.entry(txn.payload.hash.clone()).or_insert(0.0) += 1.0;
        }
    }

    let total: f64 = dist.values().sum();
    if total > 0.0 {
        for v in dist.values_mut() {
            *v /= total;
        }
    }
    dist
}
