/// An error that occurred while building, decoding or resolving a membership proof.
#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
pub enum ProofError {
    /// A proof was requested for a leaf index the tree does not have
    #[error("index {index} is out of range for a tree of {leaf_count} leaves")]
    IndexOutOfRange {
        /// The requested leaf index
        index: usize,
        /// The number of leaves in the tree
        leaf_count: usize,
    },
    /// The identifier is not part of the committed list
    #[error("identifier is not present in the committed list")]
    NotFound,
    /// A catch all error which indicates that an encoded proof is malformed
    #[error("malformed proof: {0}")]
    MalformedProof(&'static str),
}
