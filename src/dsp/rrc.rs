//! Root raised cosine pulse-shaping taps for TX
//!
//! The kernel spans 8 symbol periods (`8 * sps + 1` taps, always odd) and is
//! normalized to unity DC gain: the taps sum to 1.

use std::f64::consts::{PI, SQRT_2};

use crate::domain::{OqpskError, OqpskResult};

/// Symbol periods covered by the modulator's kernel
pub const SPAN_SYMBOLS: usize = 8;

/// Generate root raised cosine taps.
///
/// - `gain`: scale applied to every raw tap before normalization
/// - `sampling_freq` / `symbol_rate`: their ratio is the samples per symbol
/// - `alpha`: roll-off factor in (0, 1]
/// - `ntaps`: number of taps, must be odd
pub fn root_raised_cosine(
    gain: f64,
    sampling_freq: f64,
    symbol_rate: f64,
    alpha: f64,
    ntaps: usize,
) -> OqpskResult<Vec<f32>> {
    if ntaps % 2 == 0 {
        return Err(OqpskError::InvalidParameter(format!(
            "Number of taps must be odd, got {ntaps}"
        )));
    }

    let sps = sampling_freq / symbol_rate;
    let center = (ntaps - 1) as f64 / 2.0;
    let singular_t = 1.0 / (4.0 * alpha);

    let raw: Vec<f64> = (0..ntaps)
        .map(|i| {
            let t = (i as f64 - center) / sps;
            gain * rrc_impulse(t, alpha, singular_t)
        })
        .collect();

    let scale: f64 = raw.iter().sum();
    Ok(raw.iter().map(|&v| (v / scale) as f32).collect())
}

fn rrc_impulse(t: f64, alpha: f64, singular_t: f64) -> f64 {
    if t.abs() < 1e-12 {
        1.0 - alpha + 4.0 * alpha / PI
    } else if (t.abs() - singular_t).abs() < 1e-12 {
        let arg = PI / (4.0 * alpha);
        (alpha / SQRT_2) * ((1.0 + 2.0 / PI) * arg.sin() + (1.0 - 2.0 / PI) * arg.cos())
    } else {
        let pi_t = PI * t;
        let four_alpha_t = 4.0 * alpha * t;
        ((pi_t * (1.0 - alpha)).sin() + four_alpha_t * (pi_t * (1.0 + alpha)).cos())
            / (pi_t * (1.0 - four_alpha_t * four_alpha_t))
    }
}

/// The modulator's immutable tap set
#[derive(Debug, Clone)]
pub struct RrcTaps {
    taps: Vec<f32>,
    samples_per_symbol: usize,
    alpha: f32,
}

impl RrcTaps {
    /// Build the unity-gain kernel for `samples_per_symbol` and roll-off `alpha`
    pub fn new(samples_per_symbol: usize, alpha: f32) -> OqpskResult<Self> {
        if samples_per_symbol == 0 {
            return Err(OqpskError::InvalidParameter(
                "samples_per_symbol must be greater than zero".into(),
            ));
        }
        let ntaps = SPAN_SYMBOLS * samples_per_symbol + 1;
        let taps = root_raised_cosine(
            1.0,
            samples_per_symbol as f64,
            1.0,
            f64::from(alpha),
            ntaps,
        )?;
        Ok(Self {
            taps,
            samples_per_symbol,
            alpha,
        })
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.taps
    }

    /// Tap `index`, or `None` past the end of the kernel
    pub fn get(&self, index: usize) -> Option<f32> {
        self.taps.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn samples_per_symbol(&self) -> usize {
        self.samples_per_symbol
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_count_is_eight_symbols_plus_one() {
        for sps in [1, 2, 4, 8, 16] {
            let taps = RrcTaps::new(sps, 0.35).unwrap();
            assert_eq!(taps.len(), 8 * sps + 1);
            assert_eq!(taps.len() % 2, 1);
        }
    }

    #[test]
    fn test_taps_sum_to_unity() {
        for &(sps, alpha) in &[(2, 0.2f32), (4, 0.35), (4, 0.5), (8, 1.0), (5, 0.7)] {
            let taps = RrcTaps::new(sps, alpha).unwrap();
            let sum: f32 = taps.as_slice().iter().sum();
            assert!(
                (sum - 1.0).abs() < 1e-4,
                "sps={sps} alpha={alpha}: taps sum to {sum}"
            );
        }
    }

    #[test]
    fn test_even_tap_count_rejected() {
        let result = root_raised_cosine(1.0, 4.0, 1.0, 0.35, 32);
        assert!(matches!(result, Err(OqpskError::InvalidParameter(_))));
    }

    #[test]
    fn test_zero_sps_rejected() {
        assert!(RrcTaps::new(0, 0.35).is_err());
    }

    #[test]
    fn test_symmetric_with_peak_at_center() {
        let taps = RrcTaps::new(4, 0.35).unwrap();
        let coeffs = taps.as_slice();
        let len = coeffs.len();
        for i in 0..len / 2 {
            assert!((coeffs[i] - coeffs[len - 1 - i]).abs() < 1e-6);
        }
        let center = coeffs[len / 2];
        assert!(coeffs.iter().all(|&c| c <= center));
    }

    #[test]
    fn test_center_tap_matches_closed_form() {
        // Unnormalized center value is 1 - a + 4a/pi; check the ratio to a
        // neighbour against the general-case formula.
        let alpha = 0.35f64;
        let taps = root_raised_cosine(1.0, 4.0, 1.0, alpha, 33).unwrap();
        let center_raw = 1.0 - alpha + 4.0 * alpha / PI;
        let t = 0.25f64;
        let neighbour_raw = ((PI * t * (1.0 - alpha)).sin()
            + 4.0 * alpha * t * (PI * t * (1.0 + alpha)).cos())
            / (PI * t * (1.0 - (4.0 * alpha * t).powi(2)));
        let ratio = f64::from(taps[16]) / f64::from(taps[17]);
        assert!((ratio - center_raw / neighbour_raw).abs() < 1e-4);
    }

    #[test]
    fn test_singular_point_is_finite() {
        // alpha = 0.5, sps = 4: t = +-0.5 lands exactly on 1/(4 alpha)
        let taps = RrcTaps::new(4, 0.5).unwrap();
        assert!(taps.as_slice().iter().all(|c| c.is_finite()));

        let alpha = 0.5f64;
        let arg = PI / (4.0 * alpha);
        let expected_raw =
            (alpha / SQRT_2) * ((1.0 + 2.0 / PI) * arg.sin() + (1.0 - 2.0 / PI) * arg.cos());
        let center_raw = 1.0 - alpha + 4.0 * alpha / PI;
        let center = taps.get(16).unwrap();
        let singular = taps.get(18).unwrap();
        let ratio = f64::from(singular) / f64::from(center);
        assert!((ratio - expected_raw / center_raw).abs() < 1e-4);
    }

    #[test]
    fn test_gain_cancels_in_normalization() {
        let a = root_raised_cosine(1.0, 4.0, 1.0, 0.35, 33).unwrap();
        let b = root_raised_cosine(3.5, 4.0, 1.0, 0.35, 33).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_get_past_end_is_none() {
        let taps = RrcTaps::new(2, 0.35).unwrap();
        assert!(taps.get(taps.len()).is_none());
        assert_eq!(taps.samples_per_symbol(), 2);
    }
}
