//! Hashing and Merkle proof primitives
//!
//! Everything here is plain SHA-256 from `solana_program::hash`, so the
//! program and off-chain clients compute byte-identical values.

pub mod hash;
pub mod merkle_proof;
pub mod proof_builder;
pub mod transcript;

pub use hash::{hash_leaf, hash_left_right, Hash};
pub use merkle_proof::{compute_root, verify, ProofPath};
pub use proof_builder::{build_proof, upload_plan, MerkleMirror, ProofChunk};
pub use transcript::{payment_transcript, PaymentIntent};
