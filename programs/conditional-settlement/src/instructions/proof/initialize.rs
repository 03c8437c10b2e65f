//! Initialize Proof Instruction
//!
//! Creates an empty proof record for `(pool, claimed_root, commitment)`.
//! The claimed root must still be in the pool's recent-root ring; a second
//! record for the same triple cannot be created while the first exists.

use anchor_lang::prelude::*;

use crate::addressing::Namespace;
use crate::error::SettlementError;
use crate::events::ProofInitialized;
use crate::state::{Pool, ProofRecord};

#[derive(Accounts)]
#[instruction(claimed_root: [u8; 32], commitment: Pubkey)]
pub struct InitializeProof<'info> {
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
        init,
        payer = payer,
        space = ProofRecord::space(pool.merkle_tree.depth),
        seeds = [
            Namespace::Proof.tag(),
            pool.key().as_ref(),
            claimed_root.as_ref(),
            commitment.as_ref(),
        ],
        bump
    )]
    pub proof: Box<Account<'info, ProofRecord>>,

    pub authority: Signer<'info>,

    /// Funds the rent of the new accounts; may be a relayer
    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitializeProof>,
    claimed_root: [u8; 32],
    commitment: Pubkey,
) -> Result<()> {
    let pool = &ctx.accounts.pool;

    pool.require_recent_root(&claimed_root)?;

    let depth = pool.merkle_tree.depth;
    let proof = &mut ctx.accounts.proof;
    proof.initialize(
        pool.key(),
        pool.bump,
        ctx.bumps.proof,
        claimed_root,
        commitment,
        depth,
    );

    emit!(ProofInitialized {
        pool: pool.key(),
        proof: proof.key(),
        claimed_root,
        commitment,
        expected_size: depth,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Proof record created, expecting {} siblings", depth);
    Ok(())
}
