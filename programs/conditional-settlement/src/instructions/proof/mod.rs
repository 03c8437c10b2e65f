//! Proof record instructions
//!
//! initialize -> upload (repeated) -> verify -> close

pub mod close;
pub mod initialize;
pub mod upload;
pub mod verify;

pub use close::*;
pub use initialize::*;
pub use upload::*;
pub use verify::*;
