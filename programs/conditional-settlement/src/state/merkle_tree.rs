//! Incremental Merkle Tree for payment commitments
//!
//! Implements an append-only Merkle tree optimized for on-chain storage.
//! Uses filled_subtrees pattern for O(depth) insertions.
//!
//! # Zero subtrees
//! Empty subtrees are seeded from a per-tree domain value, so two trees
//! with different seeds never share padding values:
//! ```text
//! zero[0] = H(H(seed) || H(seed))
//! zero[i] = H(zero[i-1] || zero[i-1])
//! ```
//! Only `H(seed)` is persisted; the zero values are recomputed on demand.
//! The root of an empty tree is `zero[depth - 1]`.
//!
//! # Determinism
//! For the same seed, depth and sequence of appends, the root is bit-for-bit
//! identical everywhere. Off-chain mirrors rely on this.

use anchor_lang::prelude::*;

use crate::crypto::hash::{hash_leaf, hash_left_right, hash_seeds, Hash};
use crate::error::SettlementError;

/// Maximum supported tree depth (2^64 leaves)
pub const MAX_TREE_DEPTH: u8 = 64;

/// Minimum supported tree depth
pub const MIN_TREE_DEPTH: u8 = 1;

/// Append-only fixed-depth Merkle tree, embedded in the pool account.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    /// Tree depth (immutable after init)
    pub depth: u8,

    /// Next leaf index to be filled (also = total leaves inserted)
    pub next_index: u64,

    /// Current root hash
    pub root: Hash,

    /// H(domain seeds); everything else about empty subtrees derives from it
    pub seed_hash: Hash,

    /// Most recent left node at each level, waiting for a right sibling.
    /// Length = depth
    pub filled_subtrees: Vec<Hash>,
}

impl MerkleTree {
    /// Serialized size of a tree of the given depth.
    pub fn space(depth: u8) -> usize {
        1                                   // depth
            + 8                             // next_index
            + 32                            // root
            + 32                            // seed_hash
            + 4 + (32 * depth as usize)     // filled_subtrees (vec)
    }

    /// Build an empty tree whose zero values are derived from `seeds`.
    pub fn new(seeds: &[&[u8]], depth: u8) -> Result<Self> {
        require!(
            (MIN_TREE_DEPTH..=MAX_TREE_DEPTH).contains(&depth),
            SettlementError::InvalidTreeDepth
        );

        let seed_hash = hash_seeds(seeds);
        let zeros = Self::compute_zero_subtrees(&seed_hash, depth);

        Ok(Self {
            depth,
            next_index: 0,
            root: zeros[depth as usize - 1],
            seed_hash,
            filled_subtrees: zeros,
        })
    }

    /// Compute the empty-subtree hash for each of `depth` levels.
    pub fn compute_zero_subtrees(seed_hash: &Hash, depth: u8) -> Vec<Hash> {
        let mut zeros = Vec::with_capacity(depth as usize);
        let mut current = *seed_hash;

        for _ in 0..depth {
            current = hash_left_right(&current, &current);
            zeros.push(current);
        }

        zeros
    }

    /// Zero values for this tree.
    pub fn zero_subtrees(&self) -> Vec<Hash> {
        Self::compute_zero_subtrees(&self.seed_hash, self.depth)
    }

    /// Append a leaf.
    ///
    /// `preimage` is hashed once before it is stored, so the tree only
    /// ever contains `H(preimage)`.
    ///
    /// # Returns
    /// The index the leaf was written to
    ///
    /// # Errors
    /// * `TreeFull` once 2^depth leaves have been appended, or once the
    ///   leaf counter is exhausted at depth 64
    pub fn append(&mut self, preimage: &Hash) -> Result<u64> {
        require!(!self.is_full(), SettlementError::TreeFull);
        let next_index = self
            .next_index
            .checked_add(1)
            .ok_or(error!(SettlementError::TreeFull))?;

        let zeros = self.zero_subtrees();
        let leaf_index = self.next_index;
        let mut current_index = leaf_index;
        let mut current_hash = hash_leaf(preimage);

        for level in 0..self.depth as usize {
            if current_index % 2 == 0 {
                // Left node: remember it, pair with the empty right subtree
                self.filled_subtrees[level] = current_hash;
                current_hash = hash_left_right(&current_hash, &zeros[level]);
            } else {
                // Right node: pair with the stored left sibling
                current_hash = hash_left_right(&self.filled_subtrees[level], &current_hash);
            }
            current_index /= 2;
        }

        self.root = current_hash;
        self.next_index = next_index;

        Ok(leaf_index)
    }

    /// Get the current Merkle root.
    pub fn root(&self) -> Hash {
        self.root
    }

    /// Number of leaves appended so far.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Get tree capacity (2^depth; u128 so depth 64 does not overflow).
    pub fn capacity(&self) -> u128 {
        1u128 << self.depth
    }

    /// Check if tree is full.
    pub fn is_full(&self) -> bool {
        u128::from(self.next_index) >= self.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEEDS: &[&[u8]] = &[b"merkletree", b"test-pool"];

    #[test]
    fn test_depth_bounds() {
        assert!(MerkleTree::new(SEEDS, 0).is_err());
        assert!(MerkleTree::new(SEEDS, MAX_TREE_DEPTH + 1).is_err());
        assert!(MerkleTree::new(SEEDS, MIN_TREE_DEPTH).is_ok());
        assert!(MerkleTree::new(SEEDS, MAX_TREE_DEPTH).is_ok());
    }

    #[test]
    fn test_empty_tree_layout() {
        let tree = MerkleTree::new(SEEDS, 4).unwrap();
        let zeros = tree.zero_subtrees();

        assert_eq!(zeros.len(), 4);
        assert_eq!(tree.root, zeros[3]);
        assert_eq!(tree.filled_subtrees, zeros);
        assert_eq!(tree.next_index, 0);
    }

    #[test]
    fn test_zero_values_chain() {
        let seed_hash = hash_seeds(SEEDS);
        let zeros = MerkleTree::compute_zero_subtrees(&seed_hash, 3);

        assert_eq!(zeros[0], hash_left_right(&seed_hash, &seed_hash));
        assert_eq!(zeros[1], hash_left_right(&zeros[0], &zeros[0]));
        assert_eq!(zeros[2], hash_left_right(&zeros[1], &zeros[1]));
    }

    #[test]
    fn test_exhausted_counter_leaves_tree_untouched() {
        let mut tree = MerkleTree::new(SEEDS, MAX_TREE_DEPTH).unwrap();
        tree.next_index = u64::MAX;
        tree.filled_subtrees[0] = [3u8; 32];
        let before = tree.clone();

        let err = tree.append(&[1u8; 32]).unwrap_err();
        assert_eq!(crate::tests::code_of(err), crate::tests::code(SettlementError::TreeFull));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_seed_scopes_zero_values() {
        let a = MerkleTree::new(&[b"merkletree", b"pool-a"], 8).unwrap();
        let b = MerkleTree::new(&[b"merkletree", b"pool-b"], 8).unwrap();
        assert_ne!(a.root, b.root);
        assert_ne!(a.zero_subtrees()[0], b.zero_subtrees()[0]);
    }

    #[test]
    fn test_single_leaf_root() {
        let mut tree = MerkleTree::new(SEEDS, 2).unwrap();
        let zeros = tree.zero_subtrees();
        let preimage = [0x42u8; 32];

        assert_eq!(tree.append(&preimage).unwrap(), 0);

        let level1 = hash_left_right(&hash_leaf(&preimage), &zeros[0]);
        let root = hash_left_right(&level1, &zeros[1]);
        assert_eq!(tree.root, root);
    }

    #[test]
    fn test_two_leaves_share_parent() {
        let mut tree = MerkleTree::new(SEEDS, 2).unwrap();
        let zeros = tree.zero_subtrees();
        let (a, b) = ([1u8; 32], [2u8; 32]);

        tree.append(&a).unwrap();
        tree.append(&b).unwrap();

        let parent = hash_left_right(&hash_leaf(&a), &hash_leaf(&b));
        assert_eq!(tree.root, hash_left_right(&parent, &zeros[1]));
    }

    #[test]
    fn test_indices_are_sequential() {
        let mut tree = MerkleTree::new(SEEDS, 4).unwrap();
        for expected in 0..5u64 {
            assert_eq!(tree.append(&[expected as u8; 32]).unwrap(), expected);
        }
        assert_eq!(tree.next_index(), 5);
    }

    #[test]
    fn test_capacity_exhaustion() {
        let mut tree = MerkleTree::new(SEEDS, 3).unwrap();
        assert_eq!(tree.capacity(), 8);

        for i in 0..8u8 {
            tree.append(&[i; 32]).unwrap();
        }
        assert!(tree.is_full());

        let root_before = tree.root;
        let err = tree.append(&[9u8; 32]).unwrap_err();
        assert_eq!(crate::tests::code_of(err), crate::tests::code(SettlementError::TreeFull));
        assert_eq!(tree.root, root_before, "failed append must not mutate");
        assert_eq!(tree.next_index, 8);
    }

    #[test]
    fn test_root_changes_on_every_append() {
        let mut tree = MerkleTree::new(SEEDS, 4).unwrap();
        let mut prev = tree.root;
        for i in 0..6u8 {
            tree.append(&[i; 32]).unwrap();
            assert_ne!(tree.root, prev);
            prev = tree.root;
        }
    }

    #[test]
    fn test_space_matches_serialized_len() {
        let mut tree = MerkleTree::new(SEEDS, 10).unwrap();
        tree.append(&[1u8; 32]).unwrap();
        let mut bytes = Vec::new();
        tree.serialize(&mut bytes).unwrap();
        assert_eq!(bytes.len(), MerkleTree::space(10));
    }
}
