use sha2::{Digest, Sha256};

use crate::simple_merkle::tree::MerkleHash;

/// The length of a hash in bytes
pub const HASH_LEN: usize = 32;

/// A raw sha256 digest. Leaves, inner nodes and roots all share this representation.
pub type Sha256Digest = [u8; HASH_LEN];

/// A domain separator indicating that a node is a leaf
pub const LEAF_DOMAIN_SEPARATOR: [u8; 1] = [0u8];
/// A domain separator indicating that a node is internal
pub const INTERNAL_NODE_DOMAIN_SEPARATOR: [u8; 1] = [1u8];

/// The sha256 hash of the empty string, used as the root of a tree with no leaves.
pub const EMPTY_SHA256: Sha256Digest = [
    227, 176, 196, 66, 152, 252, 28, 20, 154, 251, 244, 200, 153, 111, 185, 36, 39, 174, 65, 228,
    100, 155, 147, 76, 164, 149, 153, 27, 120, 82, 184, 85,
];

/// Hashes an identifier into a leaf digest using the default [`Sha256Hasher`].
///
/// Structured identifiers must be serialized deterministically by the caller before hashing.
pub fn hash_identifier(identifier: impl AsRef<[u8]>) -> Sha256Digest {
    Sha256Hasher.hash_leaf(identifier.as_ref())
}

/// A plain sha256 hasher: leaves are `sha256(identifier)` and inner nodes are `sha256(left || right)`.
///
/// Leaves and inner nodes share a single hash domain. Use [`PrefixedSha256Hasher`] when a leaf
/// must never be mistaken for an inner node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sha256Hasher;

impl Sha256Hasher {
    /// Create a new instance of the hasher
    pub fn new() -> Self {
        Sha256Hasher
    }
}

impl MerkleHash for Sha256Hasher {
    type Output = Sha256Digest;

    const EMPTY_ROOT: Self::Output = EMPTY_SHA256;

    fn hash_leaf(&self, data: &[u8]) -> Self::Output {
        Sha256::digest(data).into()
    }

    fn hash_nodes(&self, left: &Self::Output, right: &Self::Output) -> Self::Output {
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}

/// A sha256 hasher with [RFC 6962](https://www.rfc-editor.org/rfc/rfc6962#section-2.1) style
/// domain separation between leaves and inner nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixedSha256Hasher;

impl PrefixedSha256Hasher {
    /// Create a new instance of the hasher
    pub fn new() -> Self {
        PrefixedSha256Hasher
    }
}

impl MerkleHash for PrefixedSha256Hasher {
    type Output = Sha256Digest;

    const EMPTY_ROOT: Self::Output = EMPTY_SHA256;

    fn hash_leaf(&self, data: &[u8]) -> Self::Output {
        let mut hasher = Sha256::new_with_prefix(LEAF_DOMAIN_SEPARATOR);
        hasher.update(data);
        hasher.finalize().into()
    }

    fn hash_nodes(&self, left: &Self::Output, right: &Self::Output) -> Self::Output {
        let mut hasher = Sha256::new_with_prefix(INTERNAL_NODE_DOMAIN_SEPARATOR);
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}
