//! SSZ Merkle branch recomputation.

use causeway_primitives::Hash;
use sha2::{Digest, Sha256};

/// SHA256 hash of two 32-byte nodes concatenated.
pub(crate) fn sha256_pair(a: &Hash, b: &Hash) -> Hash {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(a);
    data[32..].copy_from_slice(b);
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Recompute a root from a leaf and its sibling branch.
///
/// Bit *i* of `index` decides whether the current node is the right
/// (`1`) or left (`0`) child when hashed with sibling *i*.
pub fn compute_merkle_root(leaf: &Hash, branch: &[Hash], index: u64) -> Hash {
    let mut current = *leaf;
    for (i, node) in branch.iter().enumerate() {
        if (index >> i) & 1 == 1 {
            current = sha256_pair(node, &current);
        } else {
            current = sha256_pair(&current, node);
        }
    }
    current
}

/// Verify a Merkle branch against an expected root.
///
/// A branch of the wrong length fails before any hashing is attempted.
pub fn verify_merkle_branch(
    leaf: &Hash,
    branch: &[Hash],
    depth: usize,
    index: u64,
    root: &Hash,
) -> bool {
    if branch.len() != depth {
        return false;
    }
    compute_merkle_root(leaf, branch, index) == *root
}

/// Merkleize exactly eight 32-byte chunks into their subtree root.
///
/// This is the fixed three-level tree over a container with eight field
/// roots; no padding is involved.
pub fn merkleize8(chunks: &[Hash; 8]) -> Hash {
    let h01 = sha256_pair(&chunks[0], &chunks[1]);
    let h23 = sha256_pair(&chunks[2], &chunks[3]);
    let h45 = sha256_pair(&chunks[4], &chunks[5]);
    let h67 = sha256_pair(&chunks[6], &chunks[7]);

    let h0123 = sha256_pair(&h01, &h23);
    let h4567 = sha256_pair(&h45, &h67);

    sha256_pair(&h0123, &h4567)
}
