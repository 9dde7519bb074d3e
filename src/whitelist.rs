//! A committed list of identifiers, such as email addresses, which can prove membership by identifier.
//!
//! The merkle tree itself only deals in leaf indices. [`Whitelist`] keeps the identifier snapshot
//! alongside its tree so that callers can ask for a proof by identifier, and learn when an
//! identifier was never committed.

use crate::maybestd::{collections::BTreeMap, vec::Vec};
use crate::sha256_hash::{Sha256Digest, Sha256Hasher};
use crate::simple_merkle::{
    error::ProofError,
    proof::Proof,
    tree::{MerkleHash, MerkleTree},
};

/// A leaf digest together with the proof that places it under a root.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MembershipProof<H = Sha256Digest> {
    /// The hash of the identifier being proven.
    pub leaf: H,
    /// The sibling path from the leaf to the root.
    pub proof: Proof<H>,
}

impl<H: PartialEq + Clone> MembershipProof<H> {
    /// Check the membership proof against a root using the given hasher
    pub fn verify_with_hasher<M>(&self, root: &H, hasher: &M) -> bool
    where
        M: MerkleHash<Output = H>,
    {
        self.proof.verify_with_hasher(&self.leaf, root, hasher)
    }
}

impl MembershipProof<Sha256Digest> {
    /// Check the membership proof against a root using the default sha256 hasher
    pub fn verify(&self, root: &Sha256Digest) -> bool {
        self.proof.verify(&self.leaf, root)
    }
}

/// An immutable snapshot of identifiers committed to by a merkle tree.
///
/// Identifiers are committed in the order they are given. Duplicates are allowed and committed
/// as separate leaves; lookups resolve to the first occurrence.
#[derive(Debug, Clone)]
pub struct Whitelist<M: MerkleHash = Sha256Hasher> {
    indices: BTreeMap<Vec<u8>, usize>,
    tree: MerkleTree<M>,
}

impl Whitelist<Sha256Hasher> {
    /// Commits to the given identifiers using the default sha256 hasher
    pub fn new<I, T>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self::with_hasher(identifiers, Sha256Hasher)
    }
}

impl<M: MerkleHash> Whitelist<M> {
    /// Commits to the given identifiers using the provided hasher
    pub fn with_hasher<I, T>(identifiers: I, hasher: M) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut indices = BTreeMap::new();
        let mut leaves = Vec::new();
        for (index, identifier) in identifiers.into_iter().enumerate() {
            let identifier = identifier.as_ref();
            leaves.push(hasher.hash_leaf(identifier));
            indices.entry(identifier.to_vec()).or_insert(index);
        }
        Self {
            indices,
            tree: MerkleTree::build_with_hasher(hasher, leaves),
        }
    }

    /// Returns the root committing to the whole list
    pub fn root(&self) -> M::Output {
        self.tree.root()
    }

    /// Returns the underlying merkle tree
    pub fn tree(&self) -> &MerkleTree<M> {
        &self.tree
    }

    /// Returns the number of committed identifiers, counting duplicates
    pub fn len(&self) -> usize {
        self.tree.leaf_count()
    }

    /// Returns true if no identifiers were committed
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the leaf index of the first occurrence of the identifier
    pub fn index_of(&self, identifier: impl AsRef<[u8]>) -> Option<usize> {
        self.indices.get(identifier.as_ref()).copied()
    }

    /// Returns true if the identifier was committed
    pub fn contains(&self, identifier: impl AsRef<[u8]>) -> bool {
        self.index_of(identifier).is_some()
    }

    /// Proves that the identifier is part of the committed list
    pub fn prove(
        &self,
        identifier: impl AsRef<[u8]>,
    ) -> Result<MembershipProof<M::Output>, ProofError> {
        let index = self.index_of(identifier).ok_or(ProofError::NotFound)?;
        let (leaf, proof) = self.tree.get_index_with_proof(index)?;
        Ok(MembershipProof { leaf, proof })
    }
}
