// chain/src/types/tx.rs

//! Transaction and payload types.
//!
//! A transaction is a completion, an attestation, or a teacher-authored
//! `ap_reveal`; the only thing that distinguishes them at the type level is
//! the [`TransactionKind`] tag. All three carry the same [`Payload`] shape.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The content of a transaction: a raw answer string plus its digest.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub answer: String,
    pub hash: String,
}

impl Payload {
    /// Builds a payload from a raw answer, computing `hash = SHA-256(answer)`
    /// as a lowercase hex string.
    pub fn new(answer: impl Into<String>) -> Self {
        let answer = answer.into();
        let hash = hex::encode(Sha256::digest(answer.as_bytes()));
        Self { answer, hash }
    }
}

/// Kind of transaction recognized by the engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// A node's claim of having completed a question.
    Completion,
    /// A peer vote on another node's (or its own) answer.
    Attestation,
    /// A privileged, teacher-authored reveal; weighted heavily in convergence.
    ApReveal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Completion => "completion",
            TransactionKind::Attestation => "attestation",
            TransactionKind::ApReveal => "ap_reveal",
        }
    }
}

/// A single transaction: who created it, what question it answers, and
/// what kind of claim it makes about that answer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub timestamp: f64,
    pub owner_pubkey: String,
    pub question_id: String,
    pub kind: TransactionKind,
    pub payload: Payload,
}

impl Transaction {
    /// Constructs a transaction the way the engine's factory does: the id
    /// is built from the timestamp, a short prefix of the owner's pubkey,
    /// and the kind, which is unique enough for a single node's sequential
    /// creation stream but is not a security commitment.
    pub fn new(
        question_id: impl Into<String>,
        owner_pubkey: impl Into<String>,
        answer: impl Into<String>,
        timestamp: f64,
        kind: TransactionKind,
    ) -> Self {
        let owner_pubkey = owner_pubkey.into();
        let question_id = question_id.into();
        let pk_prefix: String = owner_pubkey.chars().take(8).collect();
        let id = format!("{timestamp}-{pk_prefix}-{}", kind.as_str());

        Self {
            id,
            timestamp,
            owner_pubkey,
            question_id,
            kind,
            payload: Payload::new(answer),
        }
    }

    /// True for attestations and ap_reveals: anything that counts toward
    /// convergence rather than just claiming completion.
    pub fn is_vote(&self) -> bool {
        matches!(
            self.kind,
            TransactionKind::Attestation | TransactionKind::ApReveal
        )
    }
}
