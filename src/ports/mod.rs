//! Port traits (interfaces)
//!
//! These traits are the seams between the transmit blocks and whatever host
//! runtime drives them. Adapters implement them for tests and the CLI.

pub mod block;
pub mod clock;
pub mod tags;

pub use block::*;
pub use clock::*;
pub use tags::*;
