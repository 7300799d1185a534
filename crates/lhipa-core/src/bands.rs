//! Sub-band selection and scale normalization
//!
//! LHIPA contrasts one fine scale against one coarse scale of the packet
//! decomposition:
//!
//! - high-frequency band: level `hif = 1`
//! - low-frequency band: level `lof = max_level / 2`
//!
//! Each packet row is split in halves; the first half is the high-pass
//! (detail) band and the second half the low-pass (approximation) band,
//! matching how [`WaveletPacketEngine`](crate::packet::WaveletPacketEngine)
//! packs a row.

use serde::{Deserialize, Serialize};

/// Packet level feeding the high-frequency band.
pub const HIGH_FREQUENCY_LEVEL: usize = 1;

/// Decomposition levels of the two bands being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandLevels {
    /// Level of the high-frequency band
    pub hif: usize,
    /// Level of the low-frequency band
    pub lof: usize,
}

impl BandLevels {
    /// Band levels for an analysis depth of `max_level`.
    pub fn for_depth(max_level: usize) -> Self {
        Self {
            hif: HIGH_FREQUENCY_LEVEL,
            lof: max_level / 2,
        }
    }
}

/// First half of a packet row (high-pass coefficients).
pub fn high_band(row: &[f64]) -> &[f64] {
    &row[..row.len() / 2]
}

/// Second half of a packet row (low-pass coefficients).
pub fn low_band(row: &[f64]) -> &[f64] {
    &row[row.len() / 2..]
}

/// Scale coefficients of `level` by `1 / sqrt(2^level)` so magnitudes of
/// different depths are comparable.
pub fn normalize_by_scale(coeffs: &[f64], level: usize) -> Vec<f64> {
    let factor = 1.0 / 2.0_f64.powi(level as i32).sqrt();
    coeffs.iter().map(|&c| c * factor).collect()
}
