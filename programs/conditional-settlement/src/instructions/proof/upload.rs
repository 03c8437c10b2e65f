//! Upload Proof Instruction
//!
//! Appends one chunk of siblings to a proof record. Chunks must be sent in
//! order: `offset` is the number of siblings already uploaded.

use anchor_lang::prelude::*;

use crate::addressing::Namespace;
use crate::error::SettlementError;
use crate::events::ProofChunkUploaded;
use crate::state::{Pool, ProofRecord};

#[derive(Accounts)]
pub struct UploadProof<'info> {
    #[account(
        seeds = [
            Namespace::Pool.tag(),
            pool.mint.as_ref(),
            pool.authority.as_ref(),
            pool.name.as_bytes(),
        ],
        bump = pool.bump,
        has_one = authority @ SettlementError::InvalidAuthority,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        has_one = pool @ SettlementError::InvalidAuthority,
        seeds = [
            Namespace::Proof.tag(),
            proof.pool.as_ref(),
            proof.claimed_root.as_ref(),
            proof.commitment.as_ref(),
        ],
        bump = proof.bump,
    )]
    pub proof: Box<Account<'info, ProofRecord>>,

    pub authority: Signer<'info>,
}

pub fn handler(ctx: Context<UploadProof>, offset: u8, chunk: Vec<[u8; 32]>) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let proof_key = ctx.accounts.proof.key();
    let proof = &mut ctx.accounts.proof;

    proof.upload_chunk(offset, &chunk)?;

    emit!(ProofChunkUploaded {
        pool: pool_key,
        proof: proof_key,
        offset,
        uploaded_size: proof.uploaded_size,
        expected_size: proof.expected_size,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!(
        "Proof chunk uploaded: {}/{}",
        proof.uploaded_size,
        proof.expected_size
    );
    Ok(())
}
