//! Block proposal: batching pending attestations, and mining every minable
//! completion into a Proof-of-Knowledge block once quorum and convergence
//! are met.

use std::collections::{HashMap, HashSet};

use crate::types::{Block, BlockKind, HistorySnapshot, Node, Question, Transaction, TransactionKind};

use super::config::ConsensusConfig;
use super::convergence::{convergence, unweighted_shares};

/// Rolls a proposing node's pending attestations into a new attestation
/// block if at least `attestation_batch_size` are queued. Returns `true`
/// if a block was appended.
pub fn propose_attestation_block(cfg: &ConsensusConfig, node: &mut Node) -> bool {
    let pending: Vec<Transaction> = node
        .mempool
        .iter()
        .filter(|t| t.kind == TransactionKind::Attestation)
        .cloned()
        .collect();

    if pending.len() < cfg.attestation_batch_size {
        return false;
    }

    let block = Block::new(node.chain.len(), pending, BlockKind::Attestation);
    node.chain.push(block);
    node.mempool.retain(|t| t.kind != TransactionKind::Attestation);
    true
}

/// Minimum attestation count required before a completion can be mined,
/// tightening once the node is past the halfway point of the curriculum.
fn min_attest(curriculum_len: usize, progress: usize) -> usize {
    if progress < curriculum_len / 2 {
        2
    } else {
        4
    }
}

/// A completion mined into a Proof-of-Knowledge block: its question and the
/// winning answer hash. Used afterward to drive the reputation updater.
pub struct MinedCompletion {
    pub question_id: String,
    pub completion_hash: String,
}

/// Mines every one of the proposing node's own completions that currently
/// clears quorum into a single Proof-of-Knowledge block.
///
/// A completion is a candidate only if its `owner_pubkey` is the proposing
/// node's own pubkey; `node.progress` is used only to pick `min_attest`, not
/// to restrict which question may be mined. A candidate is minable once the
/// attestation count visible for its question reaches `min_attest` and the
/// weighted convergence score for that question clears
/// `cfg.quorum_conv_thresh`.
///
/// On a non-empty minable set: appends a `Pok` block holding (a) the minable
/// completions, then (b) every mempool-resident vote whose question appears
/// in the minable set; removes those transactions from the mempool by id;
/// records an unweighted history snapshot per mined question. Returns an
/// empty vector (no-op) if nothing is minable.
pub fn propose_pok_block(
    cfg: &ConsensusConfig,
    curriculum: &[Question],
    nodes: &mut HashMap<String, Node>,
    pubkey: &str,
    now: f64,
) -> Vec<MinedCompletion> {
    let Some(node) = nodes.get(pubkey) else {
        return Vec::new();
    };

    let min_attest_count = min_attest(curriculum.len(), node.progress);

    let minable: Vec<Transaction> = node
        .mempool
        .iter()
        .filter(|t| t.kind == TransactionKind::Completion && t.owner_pubkey == pubkey)
        .filter(|t| {
            let attn_count = node
                .visible_txns()
                .filter(|v| v.question_id == t.question_id && v.is_vote())
                .count();
            attn_count >= min_attest_count
                && convergence(nodes, node, &t.question_id, true) >= cfg.quorum_conv_thresh
        })
        .cloned()
        .collect();

    if minable.is_empty() {
        return Vec::new();
    }

    let minable_question_ids: HashSet<&str> =
        minable.iter().map(|t| t.question_id.as_str()).collect();

    let node = nodes.get_mut(pubkey).expect("checked present above");

    let mut block_txns = minable.clone();
    block_txns.extend(
        node.mempool
            .iter()
            .filter(|t| t.is_vote() && minable_question_ids.contains(t.question_id.as_str()))
            .cloned(),
    );

    let mined_ids: HashSet<String> = block_txns.iter().map(|t| t.id.clone()).collect();

    node.chain
        .push(Block::new(node.chain.len(), block_txns, BlockKind::Pok));
    node.mempool.retain(|t| !mined_ids.contains(&t.id));

    for question_id in &minable_question_ids {
        let shares = unweighted_shares(node, question_id, now);
        node.consensus_history
            .entry(question_id.to_string())
            .or_default()
            .push(HistorySnapshot {
                timestamp: now,
                shares,
            });
    }

    minable
        .into_iter()
        .map(|t| MinedCompletion {
            question_id: t.question_id,
            completion_hash: t.payload.hash,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attachments, Question, QuestionType};

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            prompt: "2+2?".to_string(),
            qtype: QuestionType::Frq,
            attachments: Attachments::default(),
        }
    }

    #[test]
    fn attestation_block_requires_batch_size() {
        let cfg = ConsensusConfig::default();
        let mut node = Node::new("alice", "student", 1.0);
        for i in 0..4 {
            node.mempool.push(Transaction::new(
                "q1",
                "alice",
                "A",
                i as f64,
                TransactionKind::Attestation,
            ));
        }
        assert!(!propose_attestation_block(&cfg, &mut node));
        node.mempool.push(Transaction::new(
            "q1",
            "alice",
            "A",
            5.0,
            TransactionKind::Attestation,
        ));
        assert!(propose_attestation_block(&cfg, &mut node));
        assert_eq!(node.chain.len(), 1);
        assert!(node.mempool.is_empty());
        assert_eq!(node.chain[0].txns.len(), 5);
        assert_eq!(node.chain[0].kind, BlockKind::Attestation);
        // Batching attestations never touches reputation; only a mined PoK block does.
        assert_eq!(node.reputation, 1.0);
    }

    #[test]
    fn pok_block_requires_quorum_and_convergence() {
        let cfg = ConsensusConfig::default();
        let curriculum = vec![question("q1"), question("q2")];
        let mut nodes = HashMap::new();
        let mut alice = Node::new("alice", "student", 1.0);
        alice.mempool.push(Transaction::new(
            "q1",
            "alice",
            "4",
            1.0,
            TransactionKind::Completion,
        ));
        nodes.insert("alice".to_string(), alice);
        nodes.insert("bob".to_string(), Node::new("bob", "student", 1.0));

        assert!(propose_pok_block(&cfg, &curriculum, &mut nodes, "alice", 2.0).is_empty());

        nodes
            .get_mut("alice")
            .unwrap()
            .mempool
            .push(Transaction::new(
                "q1",
                "alice",
                "4",
                2.0,
                TransactionKind::Attestation,
            ));
        nodes
            .get_mut("alice")
            .unwrap()
            .mempool
            .push(Transaction::new(
                "q1",
                "bob",
                "4",
                3.0,
                TransactionKind::Attestation,
            ));

        let mined = propose_pok_block(&cfg, &curriculum, &mut nodes, "alice", 4.0);
        assert_eq!(mined.len(), 1);
        assert_eq!(mined[0].question_id, "q1");
        assert_eq!(nodes["alice"].chain.len(), 1);
        assert_eq!(nodes["alice"].chain[0].txns.len(), 3);
        assert!(nodes["alice"].mempool.is_empty());
    }

    #[test]
    fn mines_a_minable_completion_regardless_of_progress() {
        // Node's progress cursor still sits at 0 (q1 unanswered), but it has
        // already completed q3 with quorum met. Candidacy is scoped by
        // ownership, not by the progress cursor.
        let cfg = ConsensusConfig::default();
        let curriculum = vec![question("q1"), question("q2"), question("q3"), question("q4")];
        let mut alice = Node::new("alice", "student", 1.0);
        alice.mempool.push(Transaction::new(
            "q3",
            "alice",
            "4",
            1.0,
            TransactionKind::Completion,
        ));
        alice.mempool.push(Transaction::new(
            "q3",
            "alice",
            "4",
            2.0,
            TransactionKind::Attestation,
        ));
        alice.mempool.push(Transaction::new(
            "q3",
            "bob",
            "4",
            3.0,
            TransactionKind::Attestation,
        ));
        let mut nodes = HashMap::new();
        nodes.insert("alice".to_string(), alice);
        nodes.insert("bob".to_string(), Node::new("bob", "student", 1.0));

        let mined = propose_pok_block(&cfg, &curriculum, &mut nodes, "alice", 4.0);
        assert_eq!(mined.len(), 1);
        assert_eq!(mined[0].question_id, "q3");
        // progress is never advanced by mining; it only picks min_attest.
        assert_eq!(nodes["alice"].progress, 0);
    }

    #[test]
    fn mines_two_simultaneously_minable_questions_into_one_block() {
        let cfg = ConsensusConfig::default();
        let curriculum = vec![question("q1"), question("q2")];
        let mut alice = Node::new("alice", "student", 1.0);
        for (qid, ts) in [("q1", 1.0), ("q2", 10.0)] {
            alice.mempool.push(Transaction::new(
                qid,
                "alice",
                "4",
                ts,
                TransactionKind::Completion,
            ));
            alice.mempool.push(Transaction::new(
                qid,
                "alice",
                "4",
                ts + 1.0,
                TransactionKind::Attestation,
            ));
            alice.mempool.push(Transaction::new(
                qid,
                "bob",
                "4",
                ts + 2.0,
                TransactionKind::Attestation,
            ));
        }
        let mut nodes = HashMap::new();
        nodes.insert("alice".to_string(), alice);
        nodes.insert("bob".to_string(), Node::new("bob", "student", 1.0));

        let mined = propose_pok_block(&cfg, &curriculum, &mut nodes, "alice", 20.0);
        assert_eq!(mined.len(), 2);
        assert_eq!(nodes["alice"].chain.len(), 1);
        assert_eq!(nodes["alice"].chain[0].txns.len(), 6);
        assert!(nodes["alice"].mempool.is_empty());
        assert_eq!(
            nodes["alice"].consensus_history.get("q1").map(Vec::len),
            Some(1)
        );
        assert_eq!(
            nodes["alice"].consensus_history.get("q2").map(Vec::len),
            Some(1)
        );
    }

    #[test]
    fn min_attest_tightens_past_curriculum_midpoint() {
        assert_eq!(min_attest(10, 0), 2);
        assert_eq!(min_attest(10, 4), 2);
        assert_eq!(min_attest(10, 5), 4);
    }

    #[test]
    fn split_vote_below_quorum_leaves_mempool_untouched() {
        let cfg = ConsensusConfig::default();
        let curriculum = vec![question("q1"), question("q2")];
        let mut nodes = HashMap::new();
        let mut alice = Node::new("alice", "student", 1.0);
        alice.mempool.push(Transaction::new(
            "q1",
            "alice",
            "A",
            1.0,
            TransactionKind::Completion,
        ));
        alice.mempool.push(Transaction::new(
            "q1",
            "alice",
            "A",
            2.0,
            TransactionKind::Attestation,
        ));
        alice.mempool.push(Transaction::new(
            "q1",
            "bob",
            "A",
            3.0,
            TransactionKind::Attestation,
        ));
        alice.mempool.push(Transaction::new(
            "q1",
            "carol",
            "B",
            4.0,
            TransactionKind::Attestation,
        ));
        let mempool_before = alice.mempool.len();
        nodes.insert("alice".to_string(), alice);
        nodes.insert("bob".to_string(), Node::new("bob", "student", 1.0));
        nodes.insert("carol".to_string(), Node::new("carol", "student", 1.0));

        // Unweighted and weighted convergence agree here since every voter
        // shares the same reputation: 2/3 dominant share, below the 0.7 gate.
        let score = convergence(&nodes, &nodes["alice"], "q1", true);
        assert!((score - 2.0 / 3.0).abs() < 1e-9);

        let mined = propose_pok_block(&cfg, &curriculum, &mut nodes, "alice", 5.0);
        assert!(mined.is_empty());
        assert_eq!(nodes["alice"].mempool.len(), mempool_before);
        assert!(nodes["alice"].chain.is_empty());
    }
}
