//! Core domain types
//!
//! Pure types with no I/O dependencies: block parameters, errors, samples,
//! PDUs and stream tags.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
