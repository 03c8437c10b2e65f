//! Open Vault Instruction
//!
//! Creates the conditional vault for a commitment. The vault is an SPL
//! token account owned by the pool PDA and can only be created while a
//! verified proof record for the same commitment exists.

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::addressing::Namespace;
use crate::error::SettlementError;
use crate::events::VaultOpened;
use crate::state::{Pool, ProofRecord};

#[derive(Accounts)]
#[instruction(commitment: Pubkey)]
pub struct OpenVault<'info> {
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
        has_one = mint @ SettlementError::InvalidVaultAccount,
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

    #[account(
        init,
        payer = payer,
        token::mint = mint,
        token::authority = pool,
        seeds = [
            Namespace::CommitmentVault.tag(),
            pool.key().as_ref(),
            commitment.as_ref(),
        ],
        bump
    )]
    pub commitment_vault: Box<Account<'info, TokenAccount>>,

    pub mint: Box<Account<'info, Mint>>,

    pub authority: Signer<'info>,

    /// Funds the rent of the new accounts; may be a relayer
    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<OpenVault>, commitment: Pubkey) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let vault_key = ctx.accounts.commitment_vault.key();
    let pool = &mut ctx.accounts.pool;
    let proof = &mut ctx.accounts.proof;

    pool.open_vault(&commitment, proof)?;

    emit!(VaultOpened {
        pool: pool_key,
        vault: vault_key,
        commitment,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Conditional vault opened");
    msg!("Open vaults: {}", pool.open_vaults);
    Ok(())
}
