//! Record Payment Instruction
//!
//! Pays `amount` out of the pool vault to a destination token account and
//! appends the payment commitment to the pool tree.
//!
//! # Commitment
//! The caller supplies the commitment address it derived off-chain:
//! ```text
//! commitment = PDA("commitment_state", pool, current_root, transcript,
//!                  destination, amount_le)
//! ```
//! The program re-derives it under the current root and rejects any other
//! account, so a commitment cannot be forged or bound to a stale root.
//!
//! # Authority
//! Only the pool authority can append leaves. Off-chain mirrors replaying
//! the `PaymentRecorded` events in order reproduce the same root.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::addressing::Namespace;
use crate::crypto::hash::short;
use crate::error::SettlementError;
use crate::events::PaymentRecorded;
use crate::state::Pool;

/// Accounts for record_payment instruction.
#[derive(Accounts)]
#[instruction(amount: u64, transcript: [u8; 32])]
pub struct RecordPayment<'info> {
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
        has_one = vault @ SettlementError::InvalidVaultAccount,
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// Pool token vault (source of the payment).
    #[account(
        mut,
        seeds = [Namespace::PoolVault.tag(), pool.key().as_ref()],
        bump = pool.vault_bump,
        constraint = vault.mint == pool.mint @ SettlementError::InvalidVaultAccount,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    /// Receiver of the payment.
    #[account(
        mut,
        constraint = destination.mint == pool.mint @ SettlementError::InvalidVaultAccount,
    )]
    pub destination: Box<Account<'info, TokenAccount>>,

    /// CHECK: Address only. Re-derived from the payment details in the
    /// handler; its bytes become the new leaf.
    pub commitment: UncheckedAccount<'info>,

    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// Handler for record_payment instruction.
///
/// # Arguments
/// * `amount` - Token amount to pay out (must be > 0)
/// * `transcript` - Digest of the private payment intent
pub fn handler(ctx: Context<RecordPayment>, amount: u64, transcript: [u8; 32]) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let destination = ctx.accounts.destination.key();
    let commitment = ctx.accounts.commitment.key();

    // ========== VALIDATION + MERKLE TREE UPDATE ==========

    let vault_balance = ctx.accounts.vault.amount;
    let pool = &mut ctx.accounts.pool;
    let leaf_index = pool.record_payment(
        ctx.program_id,
        &pool_key,
        &commitment,
        &transcript,
        &destination,
        amount,
        vault_balance,
    )?;
    let root = pool.merkle_tree.root();

    // ========== TOKEN TRANSFER ==========

    let mint = pool.mint;
    let authority = pool.authority;
    let name = pool.name.clone();
    let bump = [pool.bump];
    let pool_seeds: &[&[u8]] = &[
        Namespace::Pool.tag(),
        mint.as_ref(),
        authority.as_ref(),
        name.as_bytes(),
        &bump,
    ];
    let signer_seeds = &[pool_seeds];

    let cpi_accounts = Transfer {
        from: ctx.accounts.vault.to_account_info(),
        to: ctx.accounts.destination.to_account_info(),
        authority: ctx.accounts.pool.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer_seeds,
    );
    token::transfer(cpi_ctx, amount)?;

    // ========== EVENT EMISSION ==========

    emit!(PaymentRecorded {
        pool: pool_key,
        commitment,
        destination,
        amount,
        leaf_index,
        root,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Payment recorded");
    msg!("Amount: {}", amount);
    msg!("Leaf index: {}", leaf_index);
    msg!("New root: {:?}", short(&root));

    Ok(())
}
