//! Implements an immutable binary merkle tree over an ordered snapshot of leaf digests,
//! together with inclusion proofs that can be checked against the root alone.

/// Defines errors that might arise while building or checking proofs.
pub mod error;
/// Defines proofs on the tree.
pub mod proof;
/// Defines the merkle tree itself.
pub mod tree;
/// Utilities for computing facts about trees from their size or proofs.
pub mod utils;
