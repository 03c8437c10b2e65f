//! Proof record: chunked proof upload and verification
//!
//! A path of up to 64 siblings does not fit in one transaction, so the
//! authority uploads it in ordered chunks and then asks the program to
//! verify it against the claimed root.
//!
//! # Lifecycle
//! ```text
//! initialize ──► Uploading ──(last chunk)──► Complete ──verify──► Verified
//!                    ▲   │                       │
//!                    └───┘ upload_chunk          └─ RootMismatch (stays Complete)
//! ```
//! A path that fails verification is final: the record is full, so no chunk
//! can be re-sent. The authority closes the record and starts over.
//!
//! # Storage Pattern
//! One PDA per (pool, claimed root, commitment). Existence of a verified
//! record is what unlocks the conditional vault for that commitment.

use anchor_lang::prelude::*;

use super::pool::DataVersion;
use crate::crypto::hash::Hash;
use crate::crypto::merkle_proof;
use crate::error::SettlementError;

/// Max siblings accepted by one `upload_proof` call
pub const MAX_CHUNK_SIZE: usize = 32;

/// Derived upload/verification status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofStatus {
    /// Fewer siblings than the tree depth have been uploaded
    Uploading,
    /// Path complete, not verified yet (or verification failed)
    Complete,
    /// Path hashes to the claimed root
    Verified,
}

/// Proof of inclusion of `commitment` under `claimed_root`.
///
/// PDA Seeds: `[b"proof", pool, claimed_root, commitment]`
#[account]
pub struct ProofRecord {
    pub data_version: DataVersion,

    /// Parent pool
    pub pool: Pubkey,

    /// Pool PDA bump, kept for vault signer seeds
    pub pool_bump: u8,

    /// PDA bump seed
    pub bump: u8,

    /// Root the path is checked against
    pub claimed_root: Hash,

    /// Commitment address whose bytes are the leaf preimage
    pub commitment: Pubkey,

    /// Set once the uploaded path hashes to `claimed_root`
    pub verified: bool,

    /// A conditional vault is currently backed by this record
    pub vault_open: bool,

    /// Siblings uploaded so far
    pub uploaded_size: u8,

    /// Tree depth at initialization
    pub expected_size: u8,

    /// Siblings, leaf level first
    pub path: Vec<Hash>,
}

impl ProofRecord {
    /// Account space for a path of `depth` siblings
    pub fn space(depth: u8) -> usize {
        8                                   // discriminator
            + 1                             // data_version
            + 32                            // pool
            + 1                             // pool_bump
            + 1                             // bump
            + 32                            // claimed_root
            + 32                            // commitment
            + 1                             // verified
            + 1                             // vault_open
            + 1                             // uploaded_size
            + 1                             // expected_size
            + 4 + (32 * depth as usize)     // path (vec)
    }

    pub fn initialize(
        &mut self,
        pool: Pubkey,
        pool_bump: u8,
        bump: u8,
        claimed_root: Hash,
        commitment: Pubkey,
        depth: u8,
    ) {
        self.data_version = DataVersion::Version1;
        self.pool = pool;
        self.pool_bump = pool_bump;
        self.bump = bump;
        self.claimed_root = claimed_root;
        self.commitment = commitment;
        self.verified = false;
        self.vault_open = false;
        self.uploaded_size = 0;
        self.expected_size = depth;
        self.path = Vec::with_capacity(depth as usize);
    }

    pub fn status(&self) -> ProofStatus {
        if self.verified {
            ProofStatus::Verified
        } else if self.uploaded_size < self.expected_size {
            ProofStatus::Uploading
        } else {
            ProofStatus::Complete
        }
    }

    /// Append `siblings` at `offset`.
    ///
    /// Chunks must arrive in order with no gaps. A rejected chunk leaves the
    /// record untouched.
    ///
    /// # Errors
    /// * `EmptyChunk` if the chunk is empty
    /// * `ChunkTooLarge` if the chunk holds more than `MAX_CHUNK_SIZE` siblings
    /// * `OutOfOrderChunk` if `offset != uploaded_size`
    /// * `Overflow` if the chunk runs past `expected_size`
    pub fn upload_chunk(&mut self, offset: u8, siblings: &[Hash]) -> Result<()> {
        require!(!siblings.is_empty(), SettlementError::EmptyChunk);
        require!(
            siblings.len() <= MAX_CHUNK_SIZE,
            SettlementError::ChunkTooLarge
        );
        require!(
            offset == self.uploaded_size,
            SettlementError::OutOfOrderChunk
        );

        let end = self.uploaded_size as usize + siblings.len();
        require!(
            end <= self.expected_size as usize,
            SettlementError::Overflow
        );

        self.path.extend_from_slice(siblings);
        self.uploaded_size = end as u8;

        Ok(())
    }

    /// Fold the uploaded path and compare with the claimed root.
    ///
    /// Calling this on an already verified record is a no-op.
    ///
    /// # Errors
    /// * `IncompleteUpload` while chunks are missing
    /// * `RootMismatch` if the path does not lead to `claimed_root`
    pub fn finalize_verification(&mut self) -> Result<()> {
        if self.verified {
            return Ok(());
        }
        require!(
            self.uploaded_size == self.expected_size,
            SettlementError::IncompleteUpload
        );
        require!(
            merkle_proof::verify(&self.path, &self.claimed_root, &self.commitment.to_bytes()),
            SettlementError::RootMismatch
        );

        self.verified = true;
        Ok(())
    }

    /// Mark the conditional vault for `commitment` as open.
    pub fn open_vault(&mut self, commitment: &Pubkey) -> Result<()> {
        require!(
            self.verified && self.commitment == *commitment,
            SettlementError::ProofNotVerified
        );
        require!(!self.vault_open, SettlementError::VaultAlreadyOpen);

        self.vault_open = true;
        Ok(())
    }

    pub fn close_vault(&mut self) -> Result<()> {
        require!(self.vault_open, SettlementError::VaultNotOpen);
        self.vault_open = false;
        Ok(())
    }

    /// A record may only be closed once no vault depends on it.
    pub fn ensure_closable(&self) -> Result<()> {
        require!(!self.vault_open, SettlementError::VaultStillOpen);
        Ok(())
    }
}
