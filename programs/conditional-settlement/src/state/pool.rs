//! Pool state account
//!
//! The pool custodies the treasury funds and owns the payment tree. Every
//! tree mutation (recording a payment, checkpointing a root) goes through
//! the single pool authority, so an off-chain mirror that replays the same
//! authorized operations always computes the same root.

use anchor_lang::prelude::*;

use super::merkle_tree::MerkleTree;
use super::proof_record::ProofRecord;
use crate::addressing::{self, Namespace};
use crate::crypto::hash::{is_zero_hash, Hash};
use crate::error::SettlementError;

/// Max len of the pool name in bytes
pub const NAME_MAX_LEN: usize = 32;

/// Maximum number of checkpointed roots kept by a pool
pub const MAX_HISTORY: u8 = 32;

/// Account layout version, for data migrations.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataVersion {
    #[default]
    Unknown,
    Version1,
}

/// Ring buffer of checkpointed roots.
///
/// Proof records may only be opened against a root that is still in the
/// ring. The oldest checkpoint is overwritten once the ring is full; a
/// capacity of 1 keeps just the latest checkpoint.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RecentRoots {
    pub roots: Vec<Hash>,
    /// Slot the next checkpoint is written to
    pub next: u8,
    pub capacity: u8,
}

impl RecentRoots {
    pub fn space(capacity: u8) -> usize {
        4 + (32 * capacity as usize) // roots (vec)
            + 1                      // next
            + 1 // capacity
    }

    pub fn new(capacity: u8) -> Result<Self> {
        require!(
            (1..=MAX_HISTORY).contains(&capacity),
            SettlementError::InvalidHistorySize
        );
        Ok(Self {
            roots: Vec::with_capacity(capacity as usize),
            next: 0,
            capacity,
        })
    }

    pub fn push(&mut self, root: Hash) {
        if self.roots.len() < self.capacity as usize {
            self.roots.push(root);
        } else {
            self.roots[self.next as usize] = root;
        }
        self.next = (self.next + 1) % self.capacity;
    }

    pub fn contains(&self, root: &Hash) -> bool {
        self.roots.iter().any(|r| r == root)
    }

    /// Most recent checkpoint.
    pub fn latest(&self) -> Option<Hash> {
        let len = self.roots.len();
        if len == 0 {
            return None;
        }
        Some(self.roots[(self.next as usize + len - 1) % len])
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Treasury pool account.
///
/// PDA Seeds: `[b"pool_state", mint, authority, name]`
#[account]
pub struct Pool {
    pub data_version: DataVersion,

    /// Only signer allowed to pay out, checkpoint and manage proofs
    pub authority: Pubkey,

    /// SPL token mint held by the pool
    pub mint: Pubkey,

    /// Pool token vault (authority = this pool PDA)
    pub vault: Pubkey,
    pub vault_bump: u8,

    /// PDA bump seed
    pub bump: u8,

    /// Allows several pools per (mint, authority)
    pub name: String,

    pub recent_roots: RecentRoots,

    /// Tree of every payment made out of the pool
    pub merkle_tree: MerkleTree,

    /// Total number of payments recorded
    pub total_payments: u64,

    /// Conditional vaults currently open
    pub open_vaults: u64,
}

impl Pool {
    /// Account space calculation
    pub fn space(depth: u8, history_size: u8) -> usize {
        8                                   // discriminator
            + 1                             // data_version
            + 32                            // authority
            + 32                            // mint
            + 32                            // vault
            + 1                             // vault_bump
            + 1                             // bump
            + 4 + NAME_MAX_LEN              // name
            + RecentRoots::space(history_size)
            + MerkleTree::space(depth)
            + 8                             // total_payments
            + 8                             // open_vaults
    }

    /// Initialize pool state with an empty tree and no checkpoints.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        &mut self,
        pool_key: &Pubkey,
        authority: Pubkey,
        mint: Pubkey,
        vault: Pubkey,
        vault_bump: u8,
        bump: u8,
        name: String,
        depth: u8,
        history_size: u8,
    ) -> Result<()> {
        require!(name.len() <= NAME_MAX_LEN, SettlementError::NameTooLong);

        self.data_version = DataVersion::Version1;
        self.authority = authority;
        self.mint = mint;
        self.vault = vault;
        self.vault_bump = vault_bump;
        self.bump = bump;
        self.name = name;
        self.recent_roots = RecentRoots::new(history_size)?;
        self.merkle_tree = MerkleTree::new(&[Namespace::MerkleTree.tag(), pool_key.as_ref()], depth)?;
        self.total_payments = 0;
        self.open_vaults = 0;

        Ok(())
    }

    /// Commitment address for a payment made now, i.e. under the current root.
    pub fn commitment_for(
        &self,
        program_id: &Pubkey,
        pool_key: &Pubkey,
        transcript: &Hash,
        destination: &Pubkey,
        amount: u64,
    ) -> (Pubkey, u8) {
        addressing::commitment_address(
            program_id,
            pool_key,
            &self.merkle_tree.root,
            transcript,
            destination,
            amount,
        )
    }

    /// Validate a payout and append its commitment to the tree.
    ///
    /// `commitment` must be the address derived from the payment details
    /// under the current root. Nothing is written unless every check passes.
    ///
    /// # Returns
    /// Leaf index of the commitment
    ///
    /// # Errors
    /// * `InvalidAmount` if `amount == 0`
    /// * `InvalidCommitment` for a zero transcript or a commitment that was
    ///   not derived from these details under the current root
    /// * `InsufficientVaultBalance` if the vault cannot cover `amount`
    /// * `TreeFull` once the tree has no room left
    #[allow(clippy::too_many_arguments)]
    pub fn record_payment(
        &mut self,
        program_id: &Pubkey,
        pool_key: &Pubkey,
        commitment: &Pubkey,
        transcript: &Hash,
        destination: &Pubkey,
        amount: u64,
        vault_balance: u64,
    ) -> Result<u64> {
        require!(amount > 0, SettlementError::InvalidAmount);
        require!(
            !is_zero_hash(transcript),
            SettlementError::InvalidCommitment
        );
        require!(
            vault_balance >= amount,
            SettlementError::InsufficientVaultBalance
        );

        let (expected, _) =
            self.commitment_for(program_id, pool_key, transcript, destination, amount);
        require_keys_eq!(expected, *commitment, SettlementError::InvalidCommitment);

        self.append_commitment(commitment)
    }

    /// Append a commitment leaf without any payment checks.
    ///
    /// # Returns
    /// Leaf index of the commitment
    pub fn append_commitment(&mut self, commitment: &Pubkey) -> Result<u64> {
        require!(
            self.total_payments < u64::MAX,
            SettlementError::ArithmeticOverflow
        );
        let leaf_index = self.merkle_tree.append(&commitment.to_bytes())?;

        self.total_payments = self
            .total_payments
            .checked_add(1)
            .ok_or(error!(SettlementError::ArithmeticOverflow))?;

        Ok(leaf_index)
    }

    /// Save the current root so proofs can be verified against it.
    pub fn checkpoint_root(&mut self) -> Hash {
        let root = self.merkle_tree.root;
        self.recent_roots.push(root);
        root
    }

    pub fn require_recent_root(&self, root: &Hash) -> Result<()> {
        require!(
            self.recent_roots.contains(root),
            SettlementError::InvalidRecentRoot
        );
        Ok(())
    }

    /// Gate a conditional vault on a verified proof for `commitment`.
    pub fn open_vault(&mut self, commitment: &Pubkey, proof: &mut ProofRecord) -> Result<()> {
        proof.open_vault(commitment)?;

        self.open_vaults = self
            .open_vaults
            .checked_add(1)
            .ok_or(error!(SettlementError::ArithmeticOverflow))?;
        Ok(())
    }

    /// Release the vault bookkeeping; the proof record is closed afterwards.
    pub fn close_vault(&mut self, proof: &mut ProofRecord) -> Result<()> {
        proof.close_vault()?;

        self.open_vaults = self
            .open_vaults
            .checked_sub(1)
            .ok_or(error!(SettlementError::ArithmeticOverflow))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{code, code_of, new_pool};

    #[test]
    fn test_ring_keeps_latest_roots() {
        let mut ring = RecentRoots::new(3).unwrap();
        assert!(ring.latest().is_none());

        for i in 1..=5u8 {
            ring.push([i; 32]);
            assert_eq!(ring.latest(), Some([i; 32]));
        }

        assert_eq!(ring.len(), 3);
        assert!(!ring.contains(&[1u8; 32]));
        assert!(!ring.contains(&[2u8; 32]));
        assert!(ring.contains(&[3u8; 32]));
        assert!(ring.contains(&[5u8; 32]));
    }

    #[test]
    fn test_single_slot_ring_overwrites() {
        let mut ring = RecentRoots::new(1).unwrap();
        ring.push([1u8; 32]);
        ring.push([2u8; 32]);
        assert!(!ring.contains(&[1u8; 32]));
        assert_eq!(ring.latest(), Some([2u8; 32]));
    }

    #[test]
    fn test_history_size_bounds() {
        assert!(RecentRoots::new(0).is_err());
        assert!(RecentRoots::new(MAX_HISTORY + 1).is_err());
        assert!(RecentRoots::new(MAX_HISTORY).is_ok());
    }

    #[test]
    fn test_initialize_starts_empty() {
        let (pool, key) = new_pool(10, 4);
        let tree = MerkleTree::new(&[b"merkletree", key.as_ref()], 10).unwrap();

        assert_eq!(pool.data_version, DataVersion::Version1);
        assert_eq!(pool.merkle_tree, tree);
        assert!(pool.recent_roots.is_empty());
        assert_eq!(pool.total_payments, 0);
    }

    #[test]
    fn test_name_length_limit() {
        let (mut pool, key) = new_pool(4, 4);
        let result = pool.initialize(
            &key,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            0,
            0,
            "x".repeat(NAME_MAX_LEN + 1),
            4,
            4,
        );
        assert_eq!(code_of(result.unwrap_err()), code(SettlementError::NameTooLong));
    }

    #[test]
    fn test_record_payment_appends() {
        let (mut pool, _) = new_pool(4, 4);
        let root_before = pool.merkle_tree.root;

        assert_eq!(pool.append_commitment(&Pubkey::new_unique()).unwrap(), 0);
        assert_eq!(pool.append_commitment(&Pubkey::new_unique()).unwrap(), 1);

        assert_ne!(pool.merkle_tree.root, root_before);
        assert_eq!(pool.total_payments, 2);
    }

    #[test]
    fn test_commitment_tracks_current_root() {
        let (mut pool, key) = new_pool(4, 4);
        let dest = Pubkey::new_unique();
        let transcript = [7u8; 32];

        let before = pool.commitment_for(&crate::ID, &key, &transcript, &dest, 10).0;
        pool.append_commitment(&before).unwrap();
        let after = pool.commitment_for(&crate::ID, &key, &transcript, &dest, 10).0;

        assert_ne!(before, after, "same payment after a new root is a new commitment");
    }

    /// Pool with one prior payment plus the details of a second, valid one.
    fn pending_payment() -> (Pool, Pubkey, Pubkey, Hash, Pubkey) {
        let (mut pool, key) = new_pool(6, 4);
        pool.append_commitment(&Pubkey::new_unique()).unwrap();

        let dest = Pubkey::new_unique();
        let transcript = [9u8; 32];
        let (commitment, _) = pool.commitment_for(&crate::ID, &key, &transcript, &dest, 500);
        (pool, key, commitment, transcript, dest)
    }

    /// Run `op` and check it fails with `expected` without touching the tree.
    fn assert_rejected(
        pool: &mut Pool,
        expected: SettlementError,
        op: impl FnOnce(&mut Pool) -> Result<u64>,
    ) {
        let tree = pool.merkle_tree.clone();
        let payments = pool.total_payments;
        assert_eq!(code_of(op(pool).unwrap_err()), code(expected));
        assert_eq!(pool.merkle_tree, tree);
        assert_eq!(pool.total_payments, payments);
    }

    #[test]
    fn test_record_payment_accepts_derived_commitment() {
        let (mut pool, key, commitment, transcript, dest) = pending_payment();
        let index = pool
            .record_payment(&crate::ID, &key, &commitment, &transcript, &dest, 500, 500)
            .unwrap();
        assert_eq!(index, 1);
        assert_eq!(pool.total_payments, 2);
    }

    #[test]
    fn test_record_payment_rejects_stale_root_commitment() {
        let (mut pool, key) = new_pool(6, 4);
        let dest = Pubkey::new_unique();
        let transcript = [9u8; 32];
        let (stale, _) = pool.commitment_for(&crate::ID, &key, &transcript, &dest, 500);
        pool.append_commitment(&Pubkey::new_unique()).unwrap();

        assert_rejected(&mut pool, SettlementError::InvalidCommitment, |p| {
            p.record_payment(&crate::ID, &key, &stale, &transcript, &dest, 500, 500)
        });
    }

    #[test]
    fn test_record_payment_rejects_mismatched_details() {
        let (mut pool, key, commitment, transcript, dest) = pending_payment();

        assert_rejected(&mut pool, SettlementError::InvalidCommitment, |p| {
            p.record_payment(&crate::ID, &key, &commitment, &transcript, &dest, 501, 1_000)
        });

        let other = Pubkey::new_unique();
        assert_rejected(&mut pool, SettlementError::InvalidCommitment, |p| {
            p.record_payment(&crate::ID, &key, &commitment, &transcript, &other, 500, 1_000)
        });

        assert_rejected(&mut pool, SettlementError::InvalidCommitment, |p| {
            p.record_payment(&crate::ID, &key, &commitment, &[8u8; 32], &dest, 500, 1_000)
        });
    }

    #[test]
    fn test_record_payment_rejects_zero_amount() {
        let (mut pool, key) = new_pool(6, 4);
        let dest = Pubkey::new_unique();
        let transcript = [9u8; 32];
        let (commitment, _) = pool.commitment_for(&crate::ID, &key, &transcript, &dest, 0);

        assert_rejected(&mut pool, SettlementError::InvalidAmount, |p| {
            p.record_payment(&crate::ID, &key, &commitment, &transcript, &dest, 0, 1_000)
        });
    }

    #[test]
    fn test_record_payment_rejects_zero_transcript() {
        let (mut pool, key) = new_pool(6, 4);
        let dest = Pubkey::new_unique();
        let transcript = [0u8; 32];
        let (commitment, _) = pool.commitment_for(&crate::ID, &key, &transcript, &dest, 500);

        assert_rejected(&mut pool, SettlementError::InvalidCommitment, |p| {
            p.record_payment(&crate::ID, &key, &commitment, &transcript, &dest, 500, 1_000)
        });
    }

    #[test]
    fn test_record_payment_rejects_short_vault() {
        let (mut pool, key, commitment, transcript, dest) = pending_payment();

        assert_rejected(&mut pool, SettlementError::InsufficientVaultBalance, |p| {
            p.record_payment(&crate::ID, &key, &commitment, &transcript, &dest, 500, 499)
        });
    }

    #[test]
    fn test_checkpoint_gates_recent_roots() {
        let (mut pool, _) = new_pool(4, 2);
        pool.append_commitment(&Pubkey::new_unique()).unwrap();
        let root = pool.merkle_tree.root;

        assert!(pool.require_recent_root(&root).is_err());
        assert_eq!(pool.checkpoint_root(), root);
        assert!(pool.require_recent_root(&root).is_ok());
    }

    #[test]
    fn test_space_fits_serialized_pool() {
        let (mut pool, _) = new_pool(16, MAX_HISTORY);
        pool.name = "x".repeat(NAME_MAX_LEN);
        for _ in 0..MAX_HISTORY {
            pool.checkpoint_root();
        }

        let mut bytes = Vec::new();
        pool.serialize(&mut bytes).unwrap();
        assert_eq!(bytes.len() + 8, Pool::space(16, MAX_HISTORY));
    }
}
