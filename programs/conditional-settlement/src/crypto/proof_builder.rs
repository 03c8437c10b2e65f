//! Off-chain proof builder
//!
//! CLIENT HELPERS: the program never calls into this module. A backend that
//! observes the pool's authorized payments mirrors the tree here and builds
//! the sibling paths that get uploaded into proof records.
//!
//! # Algorithm
//! Brute force: every level is recomputed from the leaf prefix on each call,
//! padding an odd layer with that level's zero subtree. Cost is
//! O(until_index * depth). Fine for moderate trees; a production indexer
//! should cache intermediate layers instead, returning the same siblings.

use anchor_lang::prelude::*;

use super::hash::{hash_leaf, hash_left_right, Hash};
use super::merkle_proof::ProofPath;
use crate::addressing::Namespace;
use crate::error::SettlementError;
use crate::state::MerkleTree;

/// Default number of siblings sent per `upload_proof` call.
pub const DEFAULT_CHUNK_SIZE: usize = 32;

/// Build the inclusion path of `leaf_index` in the tree made of the first
/// `until_index` stored leaves.
///
/// `leaves` are stored leaf values (already hashed), in insertion order.
///
/// # Errors
/// * `InvalidRange` if `leaf_index > until_index`, if `until_index` exceeds
///   the known leaves, or if the leaf is not part of a non-empty prefix
/// * `InvalidProofSize` if `zero_subtrees` does not have `depth` entries
pub fn build_proof(
    leaf_index: u64,
    until_index: u64,
    leaves: &[Hash],
    zero_subtrees: &[Hash],
    depth: u8,
) -> Result<ProofPath> {
    require!(leaf_index <= until_index, SettlementError::InvalidRange);
    require!(
        until_index <= leaves.len() as u64,
        SettlementError::InvalidRange
    );
    require!(
        zero_subtrees.len() == depth as usize,
        SettlementError::InvalidProofSize
    );

    let prefix = &leaves[..until_index as usize];
    if prefix.is_empty() {
        return ProofPath::new(zero_subtrees.to_vec(), depth);
    }
    require!(leaf_index < until_index, SettlementError::InvalidRange);

    let (siblings, _) = walk_layers(prefix, zero_subtrees, leaf_index);
    ProofPath::new(siblings, depth)
}

/// Root of the tree made of `leaves` (stored values), padded with zero
/// subtrees. Agrees with `MerkleTree::root` after the same appends.
pub fn root_of(leaves: &[Hash], zero_subtrees: &[Hash]) -> Hash {
    match zero_subtrees.last() {
        Some(empty_root) if leaves.is_empty() => *empty_root,
        _ => walk_layers(leaves, zero_subtrees, 0).1,
    }
}

/// Hash `leaves` up one level per zero subtree, collecting the sibling of
/// `leaf_index` on the way. Returns `(siblings, root)`.
fn walk_layers(leaves: &[Hash], zero_subtrees: &[Hash], leaf_index: u64) -> (Vec<Hash>, Hash) {
    let mut layer = leaves.to_vec();
    let mut index = leaf_index as usize;
    let mut siblings = Vec::with_capacity(zero_subtrees.len());

    for zero in zero_subtrees {
        if layer.len() % 2 != 0 {
            layer.push(*zero);
        }
        siblings.push(layer[index ^ 1]);

        layer = layer
            .chunks_exact(2)
            .map(|pair| hash_left_right(&pair[0], &pair[1]))
            .collect();
        index /= 2;
    }

    (siblings, layer[0])
}

/// One `upload_proof` call worth of siblings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofChunk {
    pub offset: u8,
    pub siblings: Vec<Hash>,
}

/// Split `path` into gapless chunks of at most `chunk_size` siblings.
pub fn upload_plan(path: &ProofPath, chunk_size: usize) -> Vec<ProofChunk> {
    let chunk_size = chunk_size.max(1);
    path.siblings()
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, chunk)| ProofChunk {
            offset: (i * chunk_size) as u8,
            siblings: chunk.to_vec(),
        })
        .collect()
}

/// Off-chain replica of a pool tree that also keeps the leaf history.
#[derive(Clone, Debug)]
pub struct MerkleMirror {
    tree: MerkleTree,
    zero_subtrees: Vec<Hash>,
    leaves: Vec<Hash>,
}

impl MerkleMirror {
    pub fn new(seeds: &[&[u8]], depth: u8) -> Result<Self> {
        let tree = MerkleTree::new(seeds, depth)?;
        let zero_subtrees = tree.zero_subtrees();
        Ok(Self {
            tree,
            zero_subtrees,
            leaves: Vec::new(),
        })
    }

    /// Mirror of the tree the program creates for `pool`.
    pub fn for_pool(pool: &Pubkey, depth: u8) -> Result<Self> {
        Self::new(&[Namespace::MerkleTree.tag(), pool.as_ref()], depth)
    }

    /// Append a commitment exactly as the program does.
    pub fn add_leaf(&mut self, preimage: &Hash) -> Result<u64> {
        let index = self.tree.append(preimage)?;
        self.leaves.push(hash_leaf(preimage));
        Ok(index)
    }

    pub fn root(&self) -> Hash {
        self.tree.root()
    }

    pub fn len(&self) -> u64 {
        self.tree.next_index()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn depth(&self) -> u8 {
        self.tree.depth
    }

    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    pub fn zero_subtrees(&self) -> &[Hash] {
        &self.zero_subtrees
    }

    /// Stored leaf values in insertion order.
    pub fn leaves(&self) -> &[Hash] {
        &self.leaves
    }

    /// Position of the leaf produced by `preimage`, if it was added.
    pub fn index_of(&self, preimage: &Hash) -> Option<u64> {
        let leaf = hash_leaf(preimage);
        self.leaves
            .iter()
            .position(|l| *l == leaf)
            .map(|i| i as u64)
    }

    /// Root the tree had after its first `until_index` leaves.
    pub fn root_at(&self, until_index: u64) -> Result<Hash> {
        require!(
            until_index <= self.leaves.len() as u64,
            SettlementError::InvalidRange
        );
        Ok(root_of(
            &self.leaves[..until_index as usize],
            &self.zero_subtrees,
        ))
    }

    pub fn proof_at(&self, leaf_index: u64, until_index: u64) -> Result<ProofPath> {
        build_proof(
            leaf_index,
            until_index,
            &self.leaves,
            &self.zero_subtrees,
            self.tree.depth,
        )
    }

    /// Proof for the leaf produced by `preimage` against the given prefix.
    pub fn proof_for(&self, preimage: &Hash, until_index: u64) -> Result<ProofPath> {
        let leaf_index = self
            .index_of(preimage)
            .ok_or(error!(SettlementError::InvalidRange))?;
        self.proof_at(leaf_index, until_index)
    }
}
