//! Conditional settlement pool
//!
//! A treasury pool pays out of its token vault and records every payment as
//! a commitment leaf in an incremental Merkle tree. A conditional vault for
//! a commitment can only be opened once an inclusion proof for that
//! commitment has been uploaded and verified against a checkpointed root.

use anchor_lang::prelude::*;

pub mod addressing;
pub mod crypto;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;


use instructions::*;

declare_id!("FpmPSHtxEr7hMr5JjAyMMPHaTD9W4s1NP9hbaRMVmjJ7");

#[program]
pub mod conditional_settlement {
    use super::*;

    pub fn initialize_pool(
        ctx: Context<InitializePool>,
        name: String,
        tree_depth: u8,
        history_size: u8,
    ) -> Result<()> {
        instructions::initialize_pool::handler(ctx, name, tree_depth, history_size)
    }

    pub fn record_payment(
        ctx: Context<RecordPayment>,
        amount: u64,
        transcript: [u8; 32],
    ) -> Result<()> {
        instructions::record_payment::handler(ctx, amount, transcript)
    }

    pub fn checkpoint_root(ctx: Context<CheckpointRoot>) -> Result<()> {
        instructions::checkpoint_root::handler(ctx)
    }

    pub fn initialize_proof(
        ctx: Context<InitializeProof>,
        claimed_root: [u8; 32],
        commitment: Pubkey,
    ) -> Result<()> {
        instructions::proof::initialize::handler(ctx, claimed_root, commitment)
    }

    pub fn upload_proof(ctx: Context<UploadProof>, offset: u8, chunk: Vec<[u8; 32]>) -> Result<()> {
        instructions::proof::upload::handler(ctx, offset, chunk)
    }

    pub fn verify_proof(ctx: Context<VerifyProof>) -> Result<()> {
        instructions::proof::verify::handler(ctx)
    }

    pub fn close_proof(ctx: Context<CloseProof>) -> Result<()> {
        instructions::proof::close::handler(ctx)
    }

    pub fn open_vault(ctx: Context<OpenVault>, commitment: Pubkey) -> Result<()> {
        instructions::vault::open::handler(ctx, commitment)
    }

    pub fn close_vault(ctx: Context<CloseVault>) -> Result<()> {
        instructions::vault::close::handler(ctx)
    }
}
