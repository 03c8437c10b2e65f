//! Events for the conditional settlement pool

use anchor_lang::prelude::*;

#[event]
pub struct PoolInitialized {
    pub pool: Pubkey,
    pub authority: Pubkey,
    pub mint: Pubkey,
    pub name: String,
    pub tree_depth: u8,
    pub history_size: u8,
    pub root: [u8; 32],
    pub timestamp: i64,
}

#[event]
pub struct PaymentRecorded {
    pub pool: Pubkey,
    pub commitment: Pubkey,
    pub destination: Pubkey,
    pub amount: u64,
    pub leaf_index: u64,
    /// Root after the commitment was appended
    pub root: [u8; 32],
    pub timestamp: i64,
}

#[event]
pub struct RootCheckpointed {
    pub pool: Pubkey,
    pub root: [u8; 32],
    pub leaf_count: u64,
    pub timestamp: i64,
}

#[event]
pub struct ProofInitialized {
    pub pool: Pubkey,
    pub proof: Pubkey,
    pub claimed_root: [u8; 32],
    pub commitment: Pubkey,
    pub expected_size: u8,
    pub timestamp: i64,
}

#[event]
pub struct ProofChunkUploaded {
    pub pool: Pubkey,
    pub proof: Pubkey,
    pub offset: u8,
    pub uploaded_size: u8,
    pub expected_size: u8,
    pub timestamp: i64,
}

#[event]
pub struct ProofVerified {
    pub pool: Pubkey,
    pub proof: Pubkey,
    pub claimed_root: [u8; 32],
    pub commitment: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct ProofClosed {
    pub pool: Pubkey,
    pub proof: Pubkey,
    pub commitment: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct VaultOpened {
    pub pool: Pubkey,
    pub vault: Pubkey,
    pub commitment: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct VaultClosed {
    pub pool: Pubkey,
    pub vault: Pubkey,
    pub commitment: Pubkey,
    /// Balance swept back into the pool vault
    pub swept_amount: u64,
    pub timestamp: i64,
}
