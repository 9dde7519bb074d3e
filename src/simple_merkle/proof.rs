use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{error::ProofError, tree::MerkleHash, utils::compute_leaf_index};
use crate::maybestd::vec::Vec;
use crate::sha256_hash::{Sha256Digest, Sha256Hasher, HASH_LEN};

/// Length of the step count prefix of an encoded proof
const ENCODED_LEN_PREFIX: usize = 4;
/// Length of one encoded step: a side byte followed by the sibling digest
const ENCODED_STEP_LEN: usize = 1 + HASH_LEN;

/// The position of a sibling relative to the node being proven.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// The sibling is the left operand: `parent = hash(sibling || current)`
    Left,
    /// The sibling is the right operand: `parent = hash(current || sibling)`
    Right,
}

impl Side {
    fn to_byte(self) -> u8 {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = ProofError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Side::Left),
            1 => Ok(Side::Right),
            _ => Err(ProofError::MalformedProof("unknown sibling side")),
        }
    }
}

/// One level of an inclusion proof.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofStep<H> {
    /// The node paired with the current node on this level.
    pub sibling: H,
    /// Which operand the sibling is when hashing the parent.
    pub side: Side,
}

impl<H> ProofStep<H> {
    /// Create a new proof step
    pub fn new(sibling: H, side: Side) -> Self {
        Self { sibling, side }
    }
}

/// A proof that some leaf is included in a merkle tree at a particular index.
///
/// The steps are ordered from the leaf level up to the level just below the root, so a proof
/// for a tree of `n` leaves has `ceil(log2(n))` steps.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proof<H = Sha256Digest> {
    /// The siblings to be used to build the path to the root.
    pub steps: Vec<ProofStep<H>>,
}

impl<H> Default for Proof<H> {
    fn default() -> Self {
        Self {
            steps: Default::default(),
        }
    }
}

impl<H> Proof<H> {
    /// Create a proof from its steps
    pub fn new(steps: Vec<ProofStep<H>>) -> Self {
        Self { steps }
    }

    /// Returns the steps of the proof, from the leaf level upwards.
    pub fn steps(&self) -> &[ProofStep<H>] {
        &self.steps
    }

    /// Returns the number of levels the proof spans, equal to the depth of the tree it was built from.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Returns the index of the proven leaf, as implied by the sides of its siblings.
    /// Returns `None` if the proof is too deep to describe a valid index.
    pub fn leaf_index(&self) -> Option<usize> {
        compute_leaf_index(self.steps.iter().map(|step| step.side))
    }
}

impl<H: PartialEq + Clone> Proof<H> {
    /// Recombine the leaf with every sibling in order, returning the root this proof implies.
    pub fn compute_root_with_hasher<M>(&self, leaf: &H, hasher: &M) -> H
    where
        M: MerkleHash<Output = H>,
    {
        self.steps
            .iter()
            .fold(leaf.clone(), |current, step| match step.side {
                Side::Left => hasher.hash_nodes(&step.sibling, &current),
                Side::Right => hasher.hash_nodes(&current, &step.sibling),
            })
    }

    /// Verify that the leaf is included in the tree with the claimed root. A malformed proof simply
    /// fails to verify.
    pub fn verify_with_hasher<M>(&self, leaf: &H, claimed_root: &H, hasher: &M) -> bool
    where
        M: MerkleHash<Output = H>,
    {
        let verified = &self.compute_root_with_hasher(leaf, hasher) == claimed_root;
        #[cfg(feature = "tracing")]
        if !verified {
            tracing::trace!(depth = self.depth(), "inclusion proof does not match root");
        }
        verified
    }
}

impl Proof<Sha256Digest> {
    /// Returns the root implied by this proof under the default sha256 hasher.
    pub fn compute_root(&self, leaf: &Sha256Digest) -> Sha256Digest {
        self.compute_root_with_hasher(leaf, &Sha256Hasher)
    }

    /// Verify the proof under the default sha256 hasher.
    pub fn verify(&self, leaf: &Sha256Digest, claimed_root: &Sha256Digest) -> bool {
        self.verify_with_hasher(leaf, claimed_root, &Sha256Hasher)
    }

    /// Encodes the proof as a big-endian `u32` step count, followed by each step as a side byte
    /// (`0` for left, `1` for right) and the 32 bytes of the sibling digest.
    pub fn encode(&self) -> Bytes {
        let mut buf =
            BytesMut::with_capacity(ENCODED_LEN_PREFIX + self.steps.len() * ENCODED_STEP_LEN);
        // A tree of at most usize::MAX leaves never has more than usize::BITS levels
        buf.put_u32(self.steps.len() as u32);
        for step in &self.steps {
            buf.put_u8(step.side.to_byte());
            buf.put_slice(&step.sibling);
        }
        buf.freeze()
    }

    /// Decodes a proof produced by [`Proof::encode`]. The buffer must contain exactly one proof.
    pub fn decode(mut buf: impl Buf) -> Result<Self, ProofError> {
        if buf.remaining() < ENCODED_LEN_PREFIX {
            return Err(ProofError::MalformedProof("missing step count"));
        }
        let num_steps = buf.get_u32() as usize;
        let expected_len = num_steps
            .checked_mul(ENCODED_STEP_LEN)
            .ok_or(ProofError::MalformedProof("step count overflows"))?;
        if buf.remaining() < expected_len {
            return Err(ProofError::MalformedProof("proof is truncated"));
        }
        if buf.remaining() > expected_len {
            return Err(ProofError::MalformedProof("trailing bytes after proof"));
        }

        let mut steps = Vec::with_capacity(num_steps);
        for _ in 0..num_steps {
            let side = Side::try_from(buf.get_u8())?;
            let mut sibling = [0u8; HASH_LEN];
            buf.copy_to_slice(&mut sibling);
            steps.push(ProofStep::new(sibling, side));
        }
        Ok(Self { steps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sha256_hash::hash_identifier;
    use crate::simple_merkle::tree::MerkleTree;

    fn sample_proof() -> (Sha256Digest, Proof, Sha256Digest) {
        let tree = MerkleTree::from_raw_leaves(["a", "b", "c", "d", "e"]);
        let (leaf, proof) = tree.get_index_with_proof(4).unwrap();
        (leaf, proof, tree.root())
    }

    #[test]
    fn test_verify() {
        let (leaf, proof, root) = sample_proof();
        assert!(proof.verify(&leaf, &root));
        assert_eq!(proof.compute_root(&leaf), root);
    }

    #[test]
    fn test_tampered_leaf_fails() {
        let (leaf, proof, root) = sample_proof();
        for byte in 0..HASH_LEN {
            let mut tampered = leaf;
            tampered[byte] ^= 0x01;
            assert!(!proof.verify(&tampered, &root));
        }
    }

    #[test]
    fn test_tampered_proof_fails() {
        let (leaf, proof, root) = sample_proof();

        // the top step pairs two distinct nodes, so swapping its operands changes the root
        let mut flipped_side = proof.clone();
        flipped_side.steps[2].side = Side::Right;
        assert!(!flipped_side.verify(&leaf, &root));

        let mut truncated = proof.clone();
        truncated.steps.pop();
        assert!(!truncated.verify(&leaf, &root));

        let mut extended = proof.clone();
        extended
            .steps
            .push(ProofStep::new(hash_identifier("f"), Side::Right));
        assert!(!extended.verify(&leaf, &root));

        assert!(!Proof::default().verify(&leaf, &root));
    }

    #[test]
    fn test_leaf_index() {
        let (_, proof, _) = sample_proof();
        assert_eq!(proof.depth(), 3);
        assert_eq!(proof.leaf_index(), Some(4));
    }

    #[test]
    fn test_encoding() {
        let (leaf, proof, root) = sample_proof();
        let encoded = proof.encode();
        assert_eq!(encoded.len(), ENCODED_LEN_PREFIX + 3 * ENCODED_STEP_LEN);
        assert_eq!(&encoded[..ENCODED_LEN_PREFIX], &[0, 0, 0, 3]);
        // leaf 4 is the odd one out on the first level, so it is paired with itself on the right
        assert_eq!(encoded[ENCODED_LEN_PREFIX], 1);
        assert_eq!(
            &encoded[ENCODED_LEN_PREFIX + 1..ENCODED_LEN_PREFIX + ENCODED_STEP_LEN],
            &leaf[..]
        );

        let decoded = Proof::decode(encoded).unwrap();
        assert_eq!(decoded, proof);
        assert!(decoded.verify(&leaf, &root));
    }

    #[test]
    fn test_decode_malformed() {
        let (_, proof, _) = sample_proof();
        let encoded = proof.encode();

        assert_eq!(
            Proof::decode(&encoded[..2]),
            Err(ProofError::MalformedProof("missing step count"))
        );
        assert_eq!(
            Proof::decode(&encoded[..encoded.len() - 1]),
            Err(ProofError::MalformedProof("proof is truncated"))
        );

        let mut trailing = encoded.to_vec();
        trailing.push(0);
        assert_eq!(
            Proof::decode(&trailing[..]),
            Err(ProofError::MalformedProof("trailing bytes after proof"))
        );

        let mut bad_side = encoded.to_vec();
        bad_side[ENCODED_LEN_PREFIX] = 7;
        assert_eq!(
            Proof::decode(&bad_side[..]),
            Err(ProofError::MalformedProof("unknown sibling side"))
        );
    }

    #[test]
    fn test_empty_proof_encoding() {
        let encoded = Proof::default().encode();
        assert_eq!(&encoded[..], &[0, 0, 0, 0]);
        assert_eq!(Proof::decode(encoded), Ok(Proof::default()));
    }

    #[cfg(feature = "borsh")]
    #[test]
    fn test_proof_borsh() {
        use borsh::BorshDeserialize;

        let (_, proof, _) = sample_proof();
        let serialized = borsh::to_vec(&proof).expect("Serialization to vec must succeed");
        // borsh also length-prefixes the steps, with one digest and one side byte per step
        assert_eq!(serialized.len(), ENCODED_LEN_PREFIX + 3 * ENCODED_STEP_LEN);
        let got = Proof::try_from_slice(&serialized).expect("serialized proof is correct");
        assert_eq!(got, proof);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_proof_serde_json() {
        let (_, proof, _) = sample_proof();
        let serialized = serde_json::to_vec(&proof).expect("Serialization to vec must succeed");
        let got: Proof = serde_json::from_slice(&serialized).expect("serialized proof is correct");
        assert_eq!(got, proof);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_proof_serde_postcard() {
        let (_, proof, _) = sample_proof();
        let serialized: Vec<u8> =
            postcard::to_allocvec(&proof).expect("Serialization to vec must succeed");
        let got: Proof = postcard::from_bytes(&serialized).expect("serialized proof is correct");
        assert_eq!(got, proof);
    }
}
