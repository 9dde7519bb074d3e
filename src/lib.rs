#![cfg_attr(not(feature = "std"), no_std)]
//! Binary merkle commitments over ordered lists of identifiers, with compact membership proofs.
//!
//! A list of identifiers (for example email addresses) is hashed into leaves, and the leaves are
//! hashed pairwise into a single root. Anyone holding the root can check a [`Proof`] that a given
//! identifier was committed, without learning the rest of the list.
//!
//! ```
//! use whitelist_merkle::{build_tree, hash_identifier, prove_index, verify};
//!
//! let leaves = ["alice@example.com", "bob@example.com", "carol@example.com"]
//!     .iter()
//!     .map(hash_identifier)
//!     .collect();
//! let tree = build_tree(leaves);
//! let proof = prove_index(&tree, 2).unwrap();
//! assert!(verify(&hash_identifier("carol@example.com"), &proof, &tree.root()));
//! ```
#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod maybestd {
    #[cfg(not(feature = "std"))]
    pub use alloc::{collections, vec};
    #[cfg(not(feature = "std"))]
    pub use core::{fmt, hash};

    #[cfg(feature = "std")]
    pub use std::{collections, fmt, hash, vec};
}

/// Sha256 hashers for leaves and inner nodes.
pub mod sha256_hash;
/// A binary merkle tree with inclusion proofs.
pub mod simple_merkle;
/// Membership proofs over a committed list of identifiers.
pub mod whitelist;

pub use sha256_hash::{
    hash_identifier, PrefixedSha256Hasher, Sha256Digest, Sha256Hasher, EMPTY_SHA256, HASH_LEN,
};
pub use simple_merkle::{
    error::ProofError,
    proof::{Proof, ProofStep, Side},
    tree::{MerkleHash, MerkleTree},
};
pub use whitelist::{MembershipProof, Whitelist};

/// Builds a merkle tree over the given leaf digests with the default sha256 hasher.
/// An empty list of leaves yields a tree whose root is the hash of the empty string.
pub fn build_tree(leaves: maybestd::vec::Vec<Sha256Digest>) -> MerkleTree {
    MerkleTree::build(leaves)
}

/// Creates an inclusion proof for the leaf at `index`.
pub fn prove_index(tree: &MerkleTree, index: usize) -> Result<Proof, ProofError> {
    tree.prove_index(index)
}

/// Checks that `leaf` is included under `root`, according to `proof`.
pub fn verify(leaf: &Sha256Digest, proof: &Proof, root: &Sha256Digest) -> bool {
    proof.verify(leaf, root)
}
