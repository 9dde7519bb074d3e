use super::proof::Side;

/// Compute the depth of a tree with `leaf_count` leaves, i.e. `ceil(log2(leaf_count))`.
/// Empty and single-leaf trees have depth zero.
pub fn compute_tree_depth(leaf_count: usize) -> usize {
    if leaf_count <= 1 {
        return 0;
    }
    (leaf_count - 1).ilog2() as usize + 1
}

/// Returns the number of nodes on the level above a level of `level_len` nodes.
/// An odd trailing node is paired with itself, so this rounds up.
pub fn parent_level_len(level_len: usize) -> usize {
    level_len.div_ceil(2)
}

/// Reconstruct the index of a leaf from the sides of its proof siblings.
///
/// The binary representation of a leaf index is a *path* from the leaf to the root: if the
/// sibling at level `k` sits on the left, the current node is a right child, so bit `k` is set.
/// Returns `None` if the path is too long to fit in a `usize`.
pub fn compute_leaf_index(sides: impl IntoIterator<Item = Side>) -> Option<usize> {
    let mut index = 0usize;
    for (level, side) in sides.into_iter().enumerate() {
        if side == Side::Left {
            let bit = 1usize.checked_shl(level.try_into().ok()?)?;
            index |= bit;
        }
    }
    Some(index)
}
