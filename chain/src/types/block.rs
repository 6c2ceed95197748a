// chain/src/types/block.rs

//! Block types.
//!
//! A block's `hash` is an opaque per-node identifier, not a content or
//! Merkle hash: blocks here are not cryptographically linked to one
//! another.

use serde::{Deserialize, Serialize};

use super::tx::Transaction;

/// Whether a block is a lightweight attestation batch or a mined
/// Proof-of-Knowledge block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Attestation,
    Pok,
}

/// A node's local, append-only unit of consensus: an ordered, non-empty
/// list of transactions plus a kind tag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub hash: String,
    pub txns: Vec<Transaction>,
    pub kind: BlockKind,
}

impl Block {
    /// Builds a block with the identifier convention this engine uses:
    /// `<chain length before append>-<kind>-block`.
    pub fn new(chain_len_before_append: usize, txns: Vec<Transaction>, kind: BlockKind) -> Self {
        let tag = match kind {
            BlockKind::Attestation => "att",
            BlockKind::Pok => "pok",
        };
        Self {
            hash: format!("{chain_len_before_append}-{tag}-block"),
            txns,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;

    #[test]
    fn block_hash_encodes_position_and_kind() {
        let txns = vec![Transaction::new(
            "q1",
            "alice",
            "A",
            1.0,
            TransactionKind::Attestation,
        )];
        let block = Block::new(3, txns, BlockKind::Attestation);
        assert_eq!(block.hash, "3-att-block");
    }
}
