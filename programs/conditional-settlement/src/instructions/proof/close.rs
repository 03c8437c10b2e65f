//! Close Proof Instruction
//!
//! Reclaims a proof record that no conditional vault depends on: a stalled
//! upload, a path that failed verification, or a verified proof whose vault
//! was never opened.

use anchor_lang::prelude::*;

use crate::addressing::Namespace;
use crate::error::SettlementError;
use crate::events::ProofClosed;
use crate::state::{Pool, ProofRecord};

#[derive(Accounts)]
pub struct CloseProof<'info> {
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
        close = authority,
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

    #[account(mut)]
    pub authority: Signer<'info>,
}

pub fn handler(ctx: Context<CloseProof>) -> Result<()> {
    let proof = &ctx.accounts.proof;

    proof.ensure_closable()?;

    emit!(ProofClosed {
        pool: proof.pool,
        proof: proof.key(),
        commitment: proof.commitment,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Proof record closed");
    Ok(())
}
