//! Unified error types for the conditional settlement pool
//!
//! Error codes are stable across versions for client compatibility.

use anchor_lang::prelude::*;

#[error_code]
pub enum SettlementError {
    // ========== Merkle Tree Errors (6000-6003) ==========

    /// Insertion beyond 2^depth leaves
    #[msg("Merkle tree is full")]
    TreeFull, // 6000

    /// Invalid tree depth parameter
    #[msg("Tree depth must be between 1 and 64")]
    InvalidTreeDepth, // 6001

    /// Proof requested for a leaf outside the given prefix
    #[msg("Leaf index is outside the requested range")]
    InvalidRange, // 6002

    /// Proof path length does not match the tree depth
    #[msg("Invalid proof size: path length must equal tree depth")]
    InvalidProofSize, // 6003

    // ========== Proof Upload Errors (6004-6010) ==========

    /// Chunk would run past the expected path length
    #[msg("Proof chunk overflows the expected path length")]
    Overflow, // 6004

    /// Chunk offset does not continue the uploaded prefix
    #[msg("Proof chunk offset does not match uploaded size")]
    OutOfOrderChunk, // 6005

    /// Upload called with no siblings
    #[msg("Proof chunk is empty")]
    EmptyChunk, // 6006

    /// Verification attempted before the whole path is uploaded
    #[msg("Proof upload is incomplete")]
    IncompleteUpload, // 6007

    /// Recomputed root differs from the claimed root
    #[msg("Recomputed root does not match the claimed root")]
    RootMismatch, // 6008

    /// Claimed root was never checkpointed or has been evicted
    #[msg("Claimed root is not a recent checkpoint")]
    InvalidRecentRoot, // 6009

    /// Root history size outside 1..=MAX_HISTORY
    #[msg("Root history size must be between 1 and 32")]
    InvalidHistorySize, // 6010

    // ========== Vault Errors (6011-6014) ==========

    /// Vault open attempted without a verified proof for its commitment
    #[msg("Proof not verified")]
    ProofNotVerified, // 6011

    /// Conditional vault already opened for this commitment
    #[msg("Conditional vault already open")]
    VaultAlreadyOpen, // 6012

    /// Conditional vault was never opened
    #[msg("Conditional vault is not open")]
    VaultNotOpen, // 6013

    /// Proof record still backs an open vault
    #[msg("Conditional vault still open")]
    VaultStillOpen, // 6014

    // ========== Pool Errors (6015-6021) ==========

    /// Signer is not the pool authority
    #[msg("Invalid authority")]
    InvalidAuthority, // 6015

    /// Token account is not the pool vault
    #[msg("Invalid vault account")]
    InvalidVaultAccount, // 6016

    /// Pool vault cannot cover the payment
    #[msg("Insufficient vault funds")]
    InsufficientVaultBalance, // 6017

    /// Amount must be greater than zero
    #[msg("Invalid amount: must be greater than zero")]
    InvalidAmount, // 6018

    /// Supplied commitment account differs from the derived address
    #[msg("Commitment address does not match payment details")]
    InvalidCommitment, // 6019

    /// Pool name longer than NAME_MAX_LEN bytes
    #[msg("Pool name is too long")]
    NameTooLong, // 6020

    /// Arithmetic overflow occurred
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow, // 6021

    // ========== Proof Upload Errors, continued (6022) ==========

    /// Upload called with more than MAX_CHUNK_SIZE siblings
    #[msg("Proof chunk exceeds the per-call sibling limit")]
    ChunkTooLarge, // 6022
}
