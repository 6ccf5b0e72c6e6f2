//! Gray-coded OQPSK symbol mapping
//!
//! Two bits pick one of four constellation points on the unit circle:
//!
//! | bits | I     | Q     |
//! |------|-------|-------|
//! | 00   | +1/√2 | +1/√2 |
//! | 01   | −1/√2 | +1/√2 |
//! | 10   | −1/√2 | −1/√2 |
//! | 11   | +1/√2 | −1/√2 |

use std::f32::consts::FRAC_1_SQRT_2;

/// One constellation point, split into its two rails
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Symbol {
    pub i: f32,
    pub q: f32,
}

impl Symbol {
    /// Map a 2-bit value to its constellation point. Only the low two bits
    /// of `bits` are used.
    pub fn from_bits(bits: u8) -> Self {
        let (i, q) = match bits & 0x03 {
            0 => (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            1 => (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            2 => (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            _ => (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        };
        Self { i, q }
    }
}
