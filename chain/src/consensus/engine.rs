//! High-level consensus engine orchestration.
//!
//! The engine owns the full node registry and curriculum, and exposes the
//! operations the HTTP facade calls: registering nodes, submitting
//! transactions, proposing blocks, syncing peers, reading convergence, and
//! recording a teacher's `ap_reveal`.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Node, Question, Transaction, TransactionKind};

use super::config::ConsensusConfig;
use super::convergence::convergence as convergence_score;
use super::error::EngineError;
use super::proposer::{propose_attestation_block, propose_pok_block};
use super::reputation::apply_reputation_update;
use super::sync::sync_nodes;

/// Proof-of-Knowledge consensus engine: a flat node registry plus a shared
/// curriculum, mutated only through the methods below.
pub struct Engine {
    pub config: ConsensusConfig,
    pub curriculum: Vec<Question>,
    nodes: HashMap<String, Node>,
    rng: StdRng,
}

impl Engine {
    /// Builds an engine over a curriculum with a time-seeded rng.
    pub fn new(config: ConsensusConfig, curriculum: Vec<Question>) -> Self {
        Self::with_seed(config, curriculum, rand::random())
    }

    /// Builds an engine with a fixed rng seed, for deterministic tests.
    pub fn with_seed(config: ConsensusConfig, curriculum: Vec<Question>, seed: u64) -> Self {
        Self {
            config,
            curriculum,
            nodes: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Registers a new node, or returns the existing one unchanged.
    pub fn add_node(&mut self, pubkey: &str, archetype: &str, provisional: Option<f64>) -> &Node {
        let reputation = provisional.unwrap_or_else(|| median_reputation(&self.nodes));
        self.nodes
            .entry(pubkey.to_string())
            .or_insert_with(|| Node::new(pubkey, archetype, reputation))
    }

    /// Returns a node's full state.
    pub fn node(&self, pubkey: &str) -> Result<&Node, EngineError> {
        self.nodes
            .get(pubkey)
            .ok_or_else(|| EngineError::NotFound(pubkey.to_string()))
    }

    /// Submits a completion, attestation, or `ap_reveal` transaction to a
    /// node's mempool.
    pub fn create_txn(
        &mut self,
        owner_pubkey: &str,
        question_id: &str,
        answer: &str,
        timestamp: f64,
        kind: TransactionKind,
    ) -> Result<Transaction, EngineError> {
        if !self.nodes.contains_key(owner_pubkey) {
            return Err(EngineError::NotFound(owner_pubkey.to_string()));
        }
        if !self.curriculum.iter().any(|q| q.id == question_id) {
            return Err(EngineError::BadRequest(format!(
                "unknown question id {question_id}"
            )));
        }
        let txn = Transaction::new(question_id, owner_pubkey, answer, timestamp, kind);
        self.nodes
            .get_mut(owner_pubkey)
            .unwrap()
            .mempool
            .push(txn.clone());
        Ok(txn)
    }

    /// A teacher's authoritative answer reveal: picks a uniformly random
    /// registered node to host the transaction, weighted at 10x in
    /// convergence regardless of the revealing node's reputation.
    pub fn submit_ap_reveal(
        &mut self,
        question_id: &str,
        answer: &str,
        timestamp: f64,
    ) -> Result<Transaction, EngineError> {
        if self.nodes.is_empty() {
            return Err(EngineError::NotFound("no registered nodes".to_string()));
        }
        let pubkeys: Vec<String> = self.nodes.keys().cloned().collect();
        let idx = self.rng.gen_range(0..pubkeys.len());
        let pubkey = pubkeys[idx].clone();
        self.create_txn(
            &pubkey,
            question_id,
            answer,
            timestamp,
            TransactionKind::ApReveal,
        )
    }

    /// Runs both proposal steps for one node: batch pending attestations,
    /// then mine every one of the node's own completions that currently
    /// clears quorum.
    pub fn propose(&mut self, pubkey: &str, now: f64) -> Result<(), EngineError> {
        if !self.nodes.contains_key(pubkey) {
            return Err(EngineError::NotFound(pubkey.to_string()));
        }
        propose_attestation_block(&self.config, self.nodes.get_mut(pubkey).unwrap());

        let mined = propose_pok_block(&self.config, &self.curriculum, &mut self.nodes, pubkey, now);

        for completion in mined {
            let votes: Vec<Transaction> = self.nodes[pubkey]
                .visible_txns()
                .filter(|t| t.question_id == completion.question_id && t.is_vote())
                .cloned()
                .collect();
            apply_reputation_update(
                &self.config,
                &mut self.nodes,
                &completion.completion_hash,
                votes,
            );
        }

        Ok(())
    }

    /// Reads the convergence score for a question as seen by `pubkey`.
    pub fn convergence(
        &self,
        pubkey: &str,
        question_id: &str,
        weighted: bool,
    ) -> Result<f64, EngineError> {
        let node = self.node(pubkey)?;
        Ok(convergence_score(&self.nodes, node, question_id, weighted))
    }

    /// Syncs two peers: chain adoption plus sampled attestation gossip.
    pub fn sync(&mut self, pubkey_a: &str, pubkey_b: &str, now: f64) -> Result<(), EngineError> {
        sync_nodes(
            &self.config,
            &mut self.rng,
            &mut self.nodes,
            pubkey_a,
            pubkey_b,
            now,
        )
    }
}

/// Median reputation across the current registry, or `1.0` when empty.
fn median_reputation(nodes: &HashMap<String, Node>) -> f64 {
    if nodes.is_empty() {
        return 1.0;
    }
    let mut reputations: Vec<f64> = nodes.values().map(|n| n.reputation).collect();
    reputations.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = reputations.len() / 2;
    if reputations.len() % 2 == 0 {
        (reputations[mid - 1] + reputations[mid]) / 2.0
    } else {
        reputations[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attachments, Question, QuestionType};

    // Two questions so `progress = 0` sits strictly below `curriculum_len / 2`
    // and `min_attest` resolves to 2, not 4.
    fn curriculum() -> Vec<Question> {
        vec![
            Question {
                id: "q1".to_string(),
                prompt: "2+2?".to_string(),
                qtype: QuestionType::Frq,
                attachments: Attachments::default(),
            },
            Question {
                id: "q2".to_string(),
                prompt: "3+3?".to_string(),
                qtype: QuestionType::Frq,
                attachments: Attachments::default(),
            },
        ]
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut engine = Engine::with_seed(ConsensusConfig::default(), curriculum(), 1);
        engine.add_node("alice", "student", Some(1.0));
        engine.add_node("alice", "student", Some(99.0));
        assert_eq!(engine.node("alice").unwrap().reputation, 1.0);
    }

    #[test]
    fn create_txn_rejects_unknown_question() {
        let mut engine = Engine::with_seed(ConsensusConfig::default(), curriculum(), 1);
        engine.add_node("alice", "student", Some(1.0));
        let err = engine
            .create_txn("alice", "ghost-question", "A", 1.0, TransactionKind::Completion)
            .unwrap_err();
        assert!(matches!(err, EngineError::BadRequest(_)));
    }

    #[test]
    fn full_round_mines_a_pok_block_and_rewards_attesters() {
        let mut engine = Engine::with_seed(ConsensusConfig::default(), curriculum(), 1);
        engine.add_node("alice", "student", Some(1.0));
        engine.add_node("bob", "student", Some(1.0));
        engine.add_node("carol", "student", Some(1.0));

        engine
            .create_txn("alice", "q1", "4", 1.0, TransactionKind::Completion)
            .unwrap();
        engine
            .create_txn("alice", "q1", "4", 2.0, TransactionKind::Attestation)
            .unwrap();
        engine
            .create_txn("bob", "q1", "4", 3.0, TransactionKind::Attestation)
            .unwrap();

        // bob and carol's votes need to be visible to alice: sync them in.
        engine.sync("alice", "bob", 5.0).unwrap();

        engine.propose("alice", 10.0).unwrap();

        let node = engine.node("alice").unwrap();
        assert_eq!(node.chain.len(), 1);
        assert_eq!(node.chain[0].kind, crate::types::BlockKind::Pok);
        assert!(node.reputation > 1.0);
    }

    #[test]
    fn solo_mining_reputation_matches_the_two_self_attestation_formula() {
        let mut engine = Engine::with_seed(ConsensusConfig::default(), curriculum(), 1);
        engine.add_node("n", "student", Some(1.0));

        engine
            .create_txn("n", "q1", "A", 1.0, TransactionKind::Completion)
            .unwrap();
        engine
            .create_txn("n", "q1", "A", 2.0, TransactionKind::Attestation)
            .unwrap();
        engine
            .create_txn("n", "q1", "A", 2.0, TransactionKind::Attestation)
            .unwrap();

        engine.propose("n", 3.0).unwrap();

        let node = engine.node("n").unwrap();
        assert_eq!(node.chain.len(), 1);
        assert_eq!(node.chain[0].kind, crate::types::BlockKind::Pok);
        assert!(node.mempool.is_empty());

        let expected = 1.0 + 2.5 * 2.0_f64.ln() + 2.5 * (2.0 + 2.5 * 2.0_f64.ln()).ln();
        assert!((node.reputation - expected).abs() < 1e-9);
    }

    #[test]
    fn ap_reveal_requires_at_least_one_node() {
        let mut engine = Engine::with_seed(ConsensusConfig::default(), curriculum(), 1);
        assert!(engine.submit_ap_reveal("q1", "4", 1.0).is_err());
        engine.add_node("teacher", "teacher", Some(1.0));
        assert!(engine.submit_ap_reveal("q1", "4", 1.0).is_ok());
    }

    #[test]
    fn omitted_provisional_reputation_defaults_to_the_registry_median() {
        let mut engine = Engine::with_seed(ConsensusConfig::default(), curriculum(), 1);
        engine.add_node("alice", "student", Some(5.0));
        engine.add_node("bob", "student", Some(10.0));
        engine.add_node("carol", "student", Some(15.0));

        engine.add_node("dave", "student", None);

        assert_eq!(engine.node("dave").unwrap().reputation, 10.0);
    }

    #[test]
    fn empty_registry_defaults_omitted_reputation_to_one() {
        let mut engine = Engine::with_seed(ConsensusConfig::default(), curriculum(), 1);
        engine.add_node("alice", "student", None);
        assert_eq!(engine.node("alice").unwrap().reputation, 1.0);
    }
}
