use super::error::ProofError;
use super::proof::{Proof, ProofStep, Side};
use super::utils::parent_level_len;
use crate::maybestd::{fmt::Debug, hash::Hash, vec, vec::Vec};
use crate::sha256_hash::Sha256Hasher;

/// A trait for hashing data into a merkle tree
pub trait MerkleHash {
    /// The output of this hasher.
    type Output: Debug + PartialEq + Eq + Clone + Default + Hash + AsRef<[u8]>;

    /// The hash of the empty tree. This is often defined as the hash of the empty string.
    const EMPTY_ROOT: Self::Output;

    /// Hashes data as a "leaf" of the tree.
    fn hash_leaf(&self, data: &[u8]) -> Self::Output;
    /// Hashes two digests into one. The left digest is hashed first.
    fn hash_nodes(&self, l: &Self::Output, r: &Self::Output) -> Self::Output;
}

/// An immutable binary merkle tree, built bottom-up from an ordered snapshot of leaf digests.
///
/// Level 0 holds the leaves and each higher level holds `ceil(len / 2)` nodes. When a level has
/// an odd number of nodes, its last node is paired with itself. The final level holds the root.
///
/// ```ascii
///              root
///            /      \
///          A          B
///         / \        / \
///        C   D      E   E
/// ```
///
/// A tree with no leaves has no levels and its root is [`MerkleHash::EMPTY_ROOT`].
#[derive(Debug, Clone)]
pub struct MerkleTree<M: MerkleHash = Sha256Hasher> {
    levels: Vec<Vec<M::Output>>,
    root: M::Output,
    hasher: M,
}

impl MerkleTree<Sha256Hasher> {
    /// Builds a tree over the given leaf digests using the default sha256 hasher
    pub fn build(leaves: Vec<<Sha256Hasher as MerkleHash>::Output>) -> Self {
        Self::build_with_hasher(Sha256Hasher, leaves)
    }

    /// Hashes each identifier into a leaf with the default sha256 hasher, then builds the tree
    pub fn from_raw_leaves<I, T>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self::from_raw_leaves_with_hasher(Sha256Hasher, identifiers)
    }
}

impl<M: MerkleHash> MerkleTree<M> {
    /// Builds a tree over the given leaf digests using the provided hasher
    pub fn build_with_hasher(hasher: M, leaves: Vec<M::Output>) -> Self {
        Self::build_with_visitor(hasher, leaves, &mut |_| {})
    }

    /// Hashes each identifier into a leaf with the provided hasher, then builds the tree
    pub fn from_raw_leaves_with_hasher<I, T>(hasher: M, identifiers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let leaves = identifiers
            .into_iter()
            .map(|identifier| hasher.hash_leaf(identifier.as_ref()))
            .collect();
        Self::build_with_hasher(hasher, leaves)
    }

    /// Builds a tree, invoking the visitor on every node as it is computed: first each leaf from
    /// left to right, then each level above it. For an empty tree the visitor sees only the empty root.
    pub fn build_with_visitor(
        hasher: M,
        leaves: Vec<M::Output>,
        visitor: &mut dyn FnMut(&M::Output),
    ) -> Self {
        if leaves.is_empty() {
            let root = M::EMPTY_ROOT;
            visitor(&root);
            return Self {
                levels: Vec::new(),
                root,
                hasher,
            };
        }

        leaves.iter().for_each(|leaf| visitor(leaf));
        let mut levels = vec![leaves];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let mut parents = Vec::with_capacity(parent_level_len(level.len()));
            for pair in level.chunks(2) {
                let left = &pair[0];
                // The odd node out is paired with itself
                let right = pair.get(1).unwrap_or(left);
                let parent = hasher.hash_nodes(left, right);
                visitor(&parent);
                parents.push(parent);
            }
            levels.push(parents);
        }

        let root = levels
            .last()
            .and_then(|level| level.first())
            .cloned()
            .unwrap_or(M::EMPTY_ROOT);
        let tree = Self {
            levels,
            root,
            hasher,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            leaf_count = tree.leaf_count(),
            depth = tree.depth(),
            "built merkle tree"
        );
        tree
    }

    /// Returns the root of the tree.
    pub fn root(&self) -> M::Output {
        self.root.clone()
    }

    /// Returns the number of leaves committed to by the tree
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Returns true if the tree has no leaves
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the number of levels between the leaves and the root, i.e. `ceil(log2(leaf_count))`.
    /// This is also the length of every proof the tree produces.
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Returns all leaves in the tree
    pub fn leaves(&self) -> &[M::Output] {
        self.levels.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns every level of the tree, starting with the leaves and ending with the root
    pub fn levels(&self) -> &[Vec<M::Output>] {
        &self.levels
    }

    /// Returns the hasher used to build the tree
    pub fn hasher(&self) -> &M {
        &self.hasher
    }

    /// Creates an inclusion proof for the leaf at `index`.
    ///
    /// Walks from the leaf level towards the root, recording the node paired with the current
    /// node at each level (the node itself when it was the odd one out) and the side that sibling
    /// occupies, then moves to the parent at `index / 2`.
    pub fn prove_index(&self, index: usize) -> Result<Proof<M::Output>, ProofError> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            #[cfg(feature = "tracing")]
            tracing::debug!(index, leaf_count, "proof requested for a missing leaf");
            return Err(ProofError::IndexOutOfRange { index, leaf_count });
        }

        let mut steps = Vec::with_capacity(self.depth());
        let mut current = index;
        for level in self.levels.iter().take(self.depth()) {
            let step = if current % 2 == 0 {
                let sibling = level.get(current + 1).unwrap_or(&level[current]);
                ProofStep::new(sibling.clone(), Side::Right)
            } else {
                ProofStep::new(level[current - 1].clone(), Side::Left)
            };
            steps.push(step);
            current /= 2;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(index, depth = steps.len(), "created inclusion proof");
        Ok(Proof::new(steps))
    }

    /// Fetches the leaf at the given index, along with a proof of inclusion.
    pub fn get_index_with_proof(
        &self,
        index: usize,
    ) -> Result<(M::Output, Proof<M::Output>), ProofError> {
        let proof = self.prove_index(index)?;
        Ok((self.leaves()[index].clone(), proof))
    }

    /// Checks a proof against this tree's root, using this tree's hasher
    pub fn verify(&self, leaf: &M::Output, proof: &Proof<M::Output>) -> bool {
        proof.verify_with_hasher(leaf, &self.root, &self.hasher)
    }
}
