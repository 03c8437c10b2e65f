//! Verify Proof Instruction
//!
//! Folds the uploaded path over the commitment leaf and compares the result
//! with the claimed root. Re-running it on a verified record succeeds
//! without side effects.

use anchor_lang::prelude::*;

use crate::addressing::Namespace;
use crate::error::SettlementError;
use crate::events::ProofVerified;
use crate::state::{Pool, ProofRecord};

#[derive(Accounts)]
pub struct VerifyProof<'info> {
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

pub fn handler(ctx: Context<VerifyProof>) -> Result<()> {
    let proof_key = ctx.accounts.proof.key();
    let proof = &mut ctx.accounts.proof;

    if proof.verified {
        msg!("Proof already verified");
        return Ok(());
    }

    proof.finalize_verification()?;

    emit!(ProofVerified {
        pool: proof.pool,
        proof: proof_key,
        claimed_root: proof.claimed_root,
        commitment: proof.commitment,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Proof verified");
    Ok(())
}
