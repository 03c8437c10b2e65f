//! Close Vault Instruction
//!
//! Sweeps the conditional vault balance back into the pool vault, closes
//! the vault token account and then the proof record that unlocked it.
//! Rent from both goes to the authority.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, CloseAccount, Token, TokenAccount, Transfer};

use crate::addressing::Namespace;
use crate::error::SettlementError;
use crate::events::VaultClosed;
use crate::state::{Pool, ProofRecord};

#[derive(Accounts)]
pub struct CloseVault<'info> {
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

    #[account(
        mut,
        seeds = [
            Namespace::CommitmentVault.tag(),
            pool.key().as_ref(),
            proof.commitment.as_ref(),
        ],
        bump,
        constraint = commitment_vault.owner == pool.key() @ SettlementError::InvalidVaultAccount,
    )]
    pub commitment_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [Namespace::PoolVault.tag(), pool.key().as_ref()],
        bump = pool.vault_bump,
        constraint = pool_vault.key() == pool.vault @ SettlementError::InvalidVaultAccount,
    )]
    pub pool_vault: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<CloseVault>) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let vault_key = ctx.accounts.commitment_vault.key();
    let commitment = ctx.accounts.proof.commitment;
    let swept_amount = ctx.accounts.commitment_vault.amount;

    // ========== STATE UPDATE ==========

    {
        let pool = &mut ctx.accounts.pool;
        let proof = &mut ctx.accounts.proof;
        pool.close_vault(proof)?;
    }

    // ========== SWEEP & CLOSE ==========

    let mint = ctx.accounts.pool.mint;
    let authority = ctx.accounts.pool.authority;
    let name = ctx.accounts.pool.name.clone();
    let bump = [ctx.accounts.pool.bump];
    let pool_seeds: &[&[u8]] = &[
        Namespace::Pool.tag(),
        mint.as_ref(),
        authority.as_ref(),
        name.as_bytes(),
        &bump,
    ];
    let signer_seeds = &[pool_seeds];

    if swept_amount > 0 {
        let cpi_accounts = Transfer {
            from: ctx.accounts.commitment_vault.to_account_info(),
            to: ctx.accounts.pool_vault.to_account_info(),
            authority: ctx.accounts.pool.to_account_info(),
        };
        let cpi_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            cpi_accounts,
            signer_seeds,
        );
        token::transfer(cpi_ctx, swept_amount)?;
    }

    let cpi_accounts = CloseAccount {
        account: ctx.accounts.commitment_vault.to_account_info(),
        destination: ctx.accounts.authority.to_account_info(),
        authority: ctx.accounts.pool.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer_seeds,
    );
    token::close_account(cpi_ctx)?;

    // The proof record is closed by Anchor on exit (`close = authority`).

    emit!(VaultClosed {
        pool: pool_key,
        vault: vault_key,
        commitment,
        swept_amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Conditional vault closed, swept {}", swept_amount);
    Ok(())
}
