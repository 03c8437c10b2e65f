//! Merkle inclusion proofs
//!
//! A proof is the list of siblings from the leaf up to the root, one per
//! level. Because nodes are combined with sorted-pair hashing, the side of
//! each sibling is not part of the proof. The same fold runs on-chain (proof
//! record verification) and off-chain (mirror self-checks).

use anchor_lang::prelude::*;

use super::hash::{hash_leaf, hash_left_right, Hash};
use crate::error::SettlementError;

/// Sibling path whose length is fixed to the tree depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofPath(Vec<Hash>);

impl ProofPath {
    /// Wrap `siblings`, rejecting any length other than `depth`.
    pub fn new(siblings: Vec<Hash>, depth: u8) -> Result<Self> {
        require!(
            siblings.len() == depth as usize,
            SettlementError::InvalidProofSize
        );
        Ok(Self(siblings))
    }

    pub fn depth(&self) -> u8 {
        self.0.len() as u8
    }

    pub fn siblings(&self) -> &[Hash] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Hash> {
        self.0
    }

    /// Check this path proves `leaf_preimage` under `root`.
    pub fn verify(&self, root: &Hash, leaf_preimage: &Hash) -> bool {
        verify(&self.0, root, leaf_preimage)
    }
}

impl AsRef<[Hash]> for ProofPath {
    fn as_ref(&self) -> &[Hash] {
        &self.0
    }
}

/// Fold `path` over the hashed preimage and return the resulting root.
pub fn compute_root(path: &[Hash], leaf_preimage: &Hash) -> Hash {
    path.iter().fold(hash_leaf(leaf_preimage), |acc, sibling| {
        hash_left_right(&acc, sibling)
    })
}

/// Returns true if `leaf_preimage` is proven to be in the tree with `root`.
///
/// Pure predicate; safe to call from both the program and clients.
pub fn verify(path: &[Hash], root: &Hash, leaf_preimage: &Hash) -> bool {
    compute_root(path, leaf_preimage) == *root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_length_must_match_depth() {
        assert!(ProofPath::new(vec![[0u8; 32]; 3], 4).is_err());
        assert!(ProofPath::new(vec![[0u8; 32]; 5], 4).is_err());
        assert!(ProofPath::new(vec![[0u8; 32]; 4], 4).is_ok());
    }

    #[test]
    fn test_single_level_proof() {
        let preimage = [0x11u8; 32];
        let sibling = [0x22u8; 32];
        let root = hash_left_right(&hash_leaf(&preimage), &sibling);

        assert!(verify(&[sibling], &root, &preimage));
        assert!(!verify(&[sibling], &root, &[0x12u8; 32]));
    }

    #[test]
    fn test_empty_path_is_the_leaf_itself() {
        let preimage = [0x11u8; 32];
        assert_eq!(compute_root(&[], &preimage), hash_leaf(&preimage));
    }

    #[test]
    fn test_raw_preimage_is_not_the_leaf() {
        // The preimage must be hashed once; treating it as the stored leaf fails
        let preimage = [0x11u8; 32];
        let sibling = [0x22u8; 32];
        let wrong_root = hash_left_right(&preimage, &sibling);
        assert!(!verify(&[sibling], &wrong_root, &preimage));
    }
}
