//! Digital Signal Processing
//!
//! Pure functions for signal processing. No I/O dependencies.

pub mod rrc;

pub use rrc::{root_raised_cosine, RrcTaps};
