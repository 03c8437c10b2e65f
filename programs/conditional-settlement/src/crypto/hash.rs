//! Hash primitives for the settlement pool
//!
//! # Hash Function Architecture
//!
//! Every digest in the program is SHA-256 (`solana_program::hash`), which is
//! available as a syscall on-chain and reproducible off-chain with any
//! SHA-256 library.
//!
//! ## Leaves
//! A commitment is never stored in the tree as-is. It is hashed once more:
//! ```text
//! leaf = SHA256(commitment)
//! ```
//! so that a leaf can never be confused with an internal node
//! (second-preimage hardening).
//!
//! ## Internal nodes
//! ```text
//! node = SHA256(min(a, b) || max(a, b))
//! ```
//! The pair is sorted by unsigned byte-wise comparison. A proof is therefore
//! just a list of siblings; the side each sibling sits on is not needed.
//!
//! Off-chain mirrors MUST apply exactly these rules or roots will diverge.

use solana_program::hash::{hash, hashv};

/// 32-byte digest used for leaves, nodes, roots and transcripts.
pub type Hash = [u8; 32];

// ============================================================================
// MERKLE TREE HASH
// ============================================================================

/// Hash two 32-byte values into their parent node.
///
/// The inputs are sorted before concatenation, so
/// `hash_left_right(a, b) == hash_left_right(b, a)`.
pub fn hash_left_right(left: &Hash, right: &Hash) -> Hash {
    let (low, high) = if left <= right {
        (left, right)
    } else {
        (right, left)
    };
    hashv(&[low.as_ref(), high.as_ref()]).to_bytes()
}

/// Hash a leaf preimage into the value stored at the bottom of the tree.
#[inline]
pub fn hash_leaf(preimage: &Hash) -> Hash {
    hash(preimage.as_ref()).to_bytes()
}

/// Hash an ordered list of byte strings (concatenated, no separators).
#[inline]
pub fn hash_seeds(seeds: &[&[u8]]) -> Hash {
    hashv(seeds).to_bytes()
}

// ============================================================================
// UTILITY FUNCTIONS
// ============================================================================

/// Check if a 32-byte value is all zeros.
#[inline]
pub fn is_zero_hash(hash: &Hash) -> bool {
    hash.iter().all(|&b| b == 0)
}

/// First 8 bytes of a digest, for log lines.
#[inline]
pub fn short(hash: &Hash) -> &[u8] {
    &hash[..8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_left_right_deterministic() {
        let left = [1u8; 32];
        let right = [2u8; 32];
        let h1 = hash_left_right(&left, &right);
        let h2 = hash_left_right(&left, &right);
        assert_eq!(h1, h2, "Hash should be deterministic");
    }

    #[test]
    fn test_hash_left_right_is_order_independent() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_eq!(hash_left_right(&a, &b), hash_left_right(&b, &a));
    }

    #[test]
    fn test_hash_left_right_sorts_low_first() {
        let low = [0x01u8; 32];
        let high = [0xF0u8; 32];
        let expected = hashv(&[low.as_ref(), high.as_ref()]).to_bytes();
        assert_eq!(hash_left_right(&high, &low), expected);
    }

    #[test]
    fn test_sorting_is_unsigned_bytewise() {
        // 0x80 must sort above 0x7F (unsigned comparison)
        let mut a = [0u8; 32];
        a[0] = 0x80;
        let mut b = [0u8; 32];
        b[0] = 0x7F;
        let expected = hashv(&[b.as_ref(), a.as_ref()]).to_bytes();
        assert_eq!(hash_left_right(&a, &b), expected);
    }

    #[test]
    fn test_hash_left_right_different_inputs() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        let c = [3u8; 32];
        assert_ne!(hash_left_right(&a, &b), hash_left_right(&a, &c));
    }

    #[test]
    fn test_leaf_hash_differs_from_preimage() {
        let preimage = [7u8; 32];
        assert_ne!(hash_leaf(&preimage), preimage);
    }

    #[test]
    fn test_hash_seeds_is_concatenation() {
        let joined = hash_seeds(&[b"ab", b"cd"]);
        assert_eq!(joined, hash(b"abcd").to_bytes());
    }

    #[test]
    fn test_is_zero_hash() {
        assert!(is_zero_hash(&[0u8; 32]));
        assert!(!is_zero_hash(&[1u8; 32]));

        let mut partial = [0u8; 32];
        partial[31] = 1;
        assert!(!is_zero_hash(&partial));
    }
}
