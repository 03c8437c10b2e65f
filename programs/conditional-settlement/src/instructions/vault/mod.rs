//! Conditional vault instructions

pub mod close;
pub mod open;

pub use close::*;
pub use open::*;
