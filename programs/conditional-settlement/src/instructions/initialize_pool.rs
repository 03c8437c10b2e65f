//! Initialize Pool Instruction

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::addressing::Namespace;
use crate::error::SettlementError;
use crate::events::PoolInitialized;
use crate::state::{
    merkle_tree::{MAX_TREE_DEPTH, MIN_TREE_DEPTH},
    pool::{Pool, MAX_HISTORY},
};

#[derive(Accounts)]
#[instruction(name: String, tree_depth: u8, history_size: u8)]
pub struct InitializePool<'info> {
    #[account(
        init,
        payer = payer,
        space = Pool::space(tree_depth, history_size),
        seeds = [
            Namespace::Pool.tag(),
            mint.key().as_ref(),
            authority.key().as_ref(),
            name.as_bytes(),
        ],
        bump
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        init,
        payer = payer,
        token::mint = mint,
        token::authority = pool,
        seeds = [Namespace::PoolVault.tag(), pool.key().as_ref()],
        bump
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    pub mint: Box<Account<'info, Mint>>,

    pub authority: Signer<'info>,

    /// Funds the rent of the new accounts; may be a relayer
    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler(
    ctx: Context<InitializePool>,
    name: String,
    tree_depth: u8,
    history_size: u8,
) -> Result<()> {
    require!(
        (MIN_TREE_DEPTH..=MAX_TREE_DEPTH).contains(&tree_depth),
        SettlementError::InvalidTreeDepth
    );
    require!(
        (1..=MAX_HISTORY).contains(&history_size),
        SettlementError::InvalidHistorySize
    );

    let pool_key = ctx.accounts.pool.key();
    let pool = &mut ctx.accounts.pool;

    pool.initialize(
        &pool_key,
        ctx.accounts.authority.key(),
        ctx.accounts.mint.key(),
        ctx.accounts.vault.key(),
        ctx.bumps.vault,
        ctx.bumps.pool,
        name,
        tree_depth,
        history_size,
    )?;

    emit!(PoolInitialized {
        pool: pool_key,
        authority: pool.authority,
        mint: pool.mint,
        name: pool.name.clone(),
        tree_depth,
        history_size,
        root: pool.merkle_tree.root(),
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Settlement pool initialized");
    msg!("Tree depth: {}, root history: {}", tree_depth, history_size);
    Ok(())
}
