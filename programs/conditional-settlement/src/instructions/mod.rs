//! Instruction handlers for the conditional settlement pool

pub mod checkpoint_root;
pub mod initialize_pool;
pub mod proof;
pub mod record_payment;
pub mod vault;

pub use checkpoint_root::*;
pub use initialize_pool::*;
pub use proof::*;
pub use record_payment::*;
pub use vault::*;
