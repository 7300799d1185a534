//! Low-to-high band ratio
//!
//! The high band is indexed with nearest-lower-neighbour alignment onto the
//! low band's index space before the elementwise division:
//!
//! ```text
//! scale = 2^(lof - hif)
//! ratio[i] = low[i] / (high[i / scale] + 1e-6)
//! ```

use crate::bands::BandLevels;
use crate::types::{LhipaError, LhipaResult};

/// Added to every denominator to keep the division finite.
pub const RATIO_EPSILON: f64 = 1e-6;

/// Divide the normalized low band by the aligned normalized high band.
///
/// The output length is `min(low.len(), high.len() * 2^(lof - hif))`.
/// Fails when `lof < hif`, which the minimum signal length rules out.
pub fn band_ratio(low: &[f64], high: &[f64], levels: BandLevels) -> LhipaResult<Vec<f64>> {
    if levels.lof < levels.hif {
        return Err(LhipaError::InvalidInput(format!(
            "low-frequency level {} is finer than high-frequency level {}",
            levels.lof, levels.hif
        )));
    }
    let scale = 1usize << (levels.lof - levels.hif);
    let length = low.len().min(high.len().saturating_mul(scale));

    let ratio = low[..length]
        .iter()
        .enumerate()
        .map(|(i, &l)| match high.get(i / scale) {
            Some(&h) => l / (h + RATIO_EPSILON),
            None => 0.0,
        })
        .collect();

    Ok(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equal_levels_divides_elementwise() {
        let low = [2.0, 4.0, 6.0];
        let high = [1.0, 2.0, 3.0, 4.0];
        let ratio = band_ratio(&low, &high, BandLevels { hif: 1, lof: 1 }).unwrap();
        assert_eq!(ratio.len(), 3);
        for r in &ratio {
            assert_relative_eq!(*r, 2.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_scaled_alignment() {
        // scale = 4: each high coefficient serves four low coefficients
        let low: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let high = [1.0, 2.0, 4.0];
        let ratio = band_ratio(&low, &high, BandLevels { hif: 1, lof: 3 }).unwrap();
        assert_eq!(ratio.len(), 8);
        for i in 0..4 {
            assert_relative_eq!(ratio[i], low[i] / (1.0 + RATIO_EPSILON), epsilon = 1e-12);
        }
        for i in 4..8 {
            assert_relative_eq!(ratio[i], low[i] / (2.0 + RATIO_EPSILON), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_length_limited_by_high_band() {
        let low = vec![1.0; 64];
        let high = vec![1.0; 4];
        let ratio = band_ratio(&low, &high, BandLevels { hif: 1, lof: 2 }).unwrap();
        assert_eq!(ratio.len(), 8);
    }

    #[test]
    fn test_zero_high_band_stays_finite() {
        let ratio = band_ratio(&[1.0, -1.0], &[0.0, 0.0], BandLevels { hif: 1, lof: 1 }).unwrap();
        assert_relative_eq!(ratio[0], 1e6, max_relative = 1e-12);
        assert_relative_eq!(ratio[1], -1e6, max_relative = 1e-12);
    }

    #[test]
    fn test_inverted_levels_rejected() {
        let err = band_ratio(&[1.0], &[1.0], BandLevels { hif: 2, lof: 1 }).unwrap_err();
        assert!(matches!(err, LhipaError::InvalidInput(_)));
    }
}
