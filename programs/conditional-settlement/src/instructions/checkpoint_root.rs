//! Checkpoint Root Instruction
//!
//! Saves the current tree root into the pool's recent-root ring. Proof
//! records can only be opened against a root that is still in the ring.

use anchor_lang::prelude::*;

use crate::addressing::Namespace;
use crate::crypto::hash::short;
use crate::error::SettlementError;
use crate::events::RootCheckpointed;
use crate::state::Pool;

#[derive(Accounts)]
pub struct CheckpointRoot<'info> {
    #[account(
        mut,
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

    pub authority: Signer<'info>,
}

pub fn handler(ctx: Context<CheckpointRoot>) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let pool = &mut ctx.accounts.pool;

    let root = pool.checkpoint_root();

    emit!(RootCheckpointed {
        pool: pool_key,
        root,
        leaf_count: pool.merkle_tree.next_index(),
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Root checkpointed: {:?}", short(&root));
    Ok(())
}
