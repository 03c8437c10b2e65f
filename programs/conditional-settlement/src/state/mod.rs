//! State account definitions for the conditional settlement pool

pub mod merkle_tree;
pub mod pool;
pub mod proof_record;

pub use merkle_tree::MerkleTree;
pub use pool::{DataVersion, Pool, RecentRoots};
pub use proof_record::{ProofRecord, ProofStatus};
