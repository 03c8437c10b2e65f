//! Payment transcript
//!
//! A transcript is the digest of the private payment intent. The pool only
//! ever sees the 32-byte digest; the parties keep the metadata.
//!
//! ```text
//! transcript = SHA256(mint || source || destination
//!                     || decimal(amount) || decimal(timestamp) || nonce)
//! ```
//!
//! `amount` and `timestamp` are written as their decimal text, NOT as raw
//! integers. Clients that encode them differently derive a different
//! commitment and their proofs will never verify.

use anchor_lang::prelude::*;

use super::hash::{hash_seeds, Hash};

/// Metadata of one payment out of the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentIntent {
    pub mint: Pubkey,
    pub source: Pubkey,
    pub destination: Pubkey,
    pub amount: u64,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Random bytes making otherwise identical payments distinct
    pub nonce: [u8; 32],
}

impl PaymentIntent {
    pub fn transcript(&self) -> Hash {
        payment_transcript(
            &self.mint,
            &self.source,
            &self.destination,
            self.amount,
            self.timestamp,
            &self.nonce,
        )
    }
}

/// Hash payment metadata into a transcript.
pub fn payment_transcript(
    mint: &Pubkey,
    source: &Pubkey,
    destination: &Pubkey,
    amount: u64,
    timestamp: i64,
    nonce: &[u8; 32],
) -> Hash {
    let amount_text = amount.to_string();
    let timestamp_text = timestamp.to_string();

    hash_seeds(&[
        mint.as_ref(),
        source.as_ref(),
        destination.as_ref(),
        amount_text.as_bytes(),
        timestamp_text.as_bytes(),
        nonce.as_ref(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_program::hash::hash;

    fn intent() -> PaymentIntent {
        PaymentIntent {
            mint: Pubkey::new_unique(),
            source: Pubkey::new_unique(),
            destination: Pubkey::new_unique(),
            amount: 10,
            timestamp: 1_700_000_000_000,
            nonce: [0x42u8; 32],
        }
    }

    #[test]
    fn test_transcript_uses_decimal_text() {
        let p = intent();

        let mut bytes = Vec::new();
        bytes.extend_from_slice(p.mint.as_ref());
        bytes.extend_from_slice(p.source.as_ref());
        bytes.extend_from_slice(p.destination.as_ref());
        bytes.extend_from_slice(b"10");
        bytes.extend_from_slice(b"1700000000000");
        bytes.extend_from_slice(&p.nonce);

        assert_eq!(p.transcript(), hash(&bytes).to_bytes());
    }

    #[test]
    fn test_negative_timestamp_keeps_sign() {
        let mut p = intent();
        p.timestamp = -5;
        let mut q = p.clone();
        q.timestamp = 5;
        assert_ne!(p.transcript(), q.transcript());
    }

    #[test]
    fn test_nonce_separates_identical_payments() {
        let p = intent();
        let mut q = p.clone();
        q.nonce = [0x43u8; 32];
        assert_ne!(p.transcript(), q.transcript());
    }

    #[test]
    fn test_transcript_deterministic() {
        let p = intent();
        assert_eq!(p.transcript(), p.clone().transcript());
    }
}
