//! Universal threshold over modulus maxima
//!
//! Computes the Donoho-Johnstone universal threshold from the spread of the
//! maxima sequence:
//!
//! ```text
//! lambda = sqrt(2 * ln(N) / ln(2)) * sigma
//! ```
//!
//! where `sigma` is the population standard deviation of all `N` entries,
//! zeros included.
//!
//! Unlike denoising, where coefficients below the threshold are discarded,
//! LHIPA keeps maxima at or below `lambda` and drops the ones above it
//! ("less" mode). LHIPA values are calibrated against this policy.

use std::f64::consts::LN_2;

/// Population standard deviation. Zero for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / n;
    variance.sqrt()
}

/// Universal threshold of a maxima sequence.
///
/// Sequences with fewer than two entries have no spread and yield zero.
pub fn universal_threshold(maxima: &[f64]) -> f64 {
    if maxima.len() < 2 {
        return 0.0;
    }
    let n = maxima.len() as f64;
    (2.0 * n.ln() / LN_2).sqrt() * std_dev(maxima)
}

/// Zero every value whose magnitude exceeds `lambda`; keep the rest.
pub fn apply_less_threshold(values: &[f64], lambda: f64) -> Vec<f64> {
    values
        .iter()
        .map(|&x| if x.abs() > lambda { 0.0 } else { x })
        .collect()
}
