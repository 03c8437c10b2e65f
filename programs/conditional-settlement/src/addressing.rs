//! Deterministic account addressing
//!
//! Every account the program touches is a PDA derived from a namespace tag
//! followed by an ordered list of byte strings. Tags are fixed per
//! `Namespace` variant; clients MUST use the same tags and seed order.
//!
//! | Namespace         | Seeds after the tag                                   |
//! |-------------------|-------------------------------------------------------|
//! | `Pool`            | mint, authority, name                                 |
//! | `PoolVault`       | pool                                                  |
//! | `Commitment`      | pool, root, transcript, destination, amount (u64 LE)  |
//! | `CommitmentVault` | pool, commitment                                      |
//! | `Proof`           | pool, claimed root, commitment                        |
//! | `MerkleTree`      | pool (tree domain seed only, never an account)        |
//!
//! The commitment amount is little-endian bytes here while the transcript
//! uses decimal text. Both encodings are part of the protocol.

use anchor_lang::prelude::*;

use crate::crypto::hash::Hash;

/// Domain separation tags for address derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    Pool,
    PoolVault,
    Commitment,
    CommitmentVault,
    Proof,
    MerkleTree,
}

impl Namespace {
    pub const fn tag(self) -> &'static [u8] {
        match self {
            Namespace::Pool => b"pool_state",
            Namespace::PoolVault => b"pool_vault",
            Namespace::Commitment => b"commitment_state",
            Namespace::CommitmentVault => b"commitment_vault",
            Namespace::Proof => b"proof",
            Namespace::MerkleTree => b"merkletree",
        }
    }

    /// Find the PDA for `seeds` under this namespace.
    pub fn derive(self, seeds: &[&[u8]], program_id: &Pubkey) -> (Pubkey, u8) {
        let mut full: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        full.push(self.tag());
        full.extend_from_slice(seeds);
        Pubkey::find_program_address(&full, program_id)
    }
}

pub fn pool_address(
    program_id: &Pubkey,
    mint: &Pubkey,
    authority: &Pubkey,
    name: &str,
) -> (Pubkey, u8) {
    Namespace::Pool.derive(
        &[mint.as_ref(), authority.as_ref(), name.as_bytes()],
        program_id,
    )
}

pub fn pool_vault_address(program_id: &Pubkey, pool: &Pubkey) -> (Pubkey, u8) {
    Namespace::PoolVault.derive(&[pool.as_ref()], program_id)
}

/// Commitment for one payment, bound to the root that was live when it
/// was made. Changing any input yields a different address.
pub fn commitment_address(
    program_id: &Pubkey,
    pool: &Pubkey,
    root: &Hash,
    transcript: &Hash,
    destination: &Pubkey,
    amount: u64,
) -> (Pubkey, u8) {
    Namespace::Commitment.derive(
        &[
            pool.as_ref(),
            root.as_ref(),
            transcript.as_ref(),
            destination.as_ref(),
            amount.to_le_bytes().as_ref(),
        ],
        program_id,
    )
}

pub fn proof_record_address(
    program_id: &Pubkey,
    pool: &Pubkey,
    claimed_root: &Hash,
    commitment: &Pubkey,
) -> (Pubkey, u8) {
    Namespace::Proof.derive(
        &[pool.as_ref(), claimed_root.as_ref(), commitment.as_ref()],
        program_id,
    )
}

pub fn vault_address(program_id: &Pubkey, pool: &Pubkey, commitment: &Pubkey) -> (Pubkey, u8) {
    Namespace::CommitmentVault.derive(&[pool.as_ref(), commitment.as_ref()], program_id)
}
