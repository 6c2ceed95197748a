//! Core domain types for the Proof-of-Knowledge consensus engine.
//!
//! These are plain, serializable value types: transactions, blocks,
//! questions, and per-node state. None of them carry behavior beyond small
//! constructors and accessors; the consensus logic itself lives in
//! `consensus`.

pub mod block;
pub mod node;
pub mod question;
pub mod tx;

pub use block::{Block, BlockKind};
pub use node::{HistorySnapshot, Node};
pub use question::{Attachments, Choice, Question, QuestionType};
pub use tx::{Payload, Transaction, TransactionKind};
