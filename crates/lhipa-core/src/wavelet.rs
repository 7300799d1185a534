//! Wavelet analysis filters
//!
//! The packet engine only needs the decomposition side of an orthogonal
//! filter bank: a low-pass (scaling) filter `h` and its quadrature mirror
//! high-pass (wavelet) filter `g`. Filters are described by the
//! [`WaveletFilter`] trait so the engine is written once against it.
//!
//! ## Supported Wavelets
//!
//! - Symlet16: 16-tap near-symmetric Symlet (eight vanishing moments)
//!
//! ## Example
//!
//! ```rust
//! use lhipa_core::wavelet::{Symlet16, WaveletFilter};
//!
//! let sym = Symlet16::new();
//! assert_eq!(sym.mother_wavelet_length(), 16);
//! assert_eq!(sym.min_signal_length(), 128);
//! ```

/// Smallest input, in multiples of the mother wavelet length, that leaves
/// enough decomposition levels for a low/high band split.
pub const MIN_LENGTH_FACTOR: usize = 8;

/// Analysis filter pair of an orthogonal wavelet.
pub trait WaveletFilter: Send + Sync {
    /// Human-readable wavelet name.
    fn name(&self) -> &str;

    /// Low-pass decomposition taps (scaling filter).
    fn low_pass(&self) -> &[f64];

    /// High-pass decomposition taps (wavelet filter).
    fn high_pass(&self) -> &[f64];

    /// Number of taps of the mother wavelet.
    fn mother_wavelet_length(&self) -> usize {
        self.low_pass().len()
    }

    /// Minimum number of samples accepted for an LHIPA computation.
    fn min_signal_length(&self) -> usize {
        self.mother_wavelet_length() * MIN_LENGTH_FACTOR
    }
}

/// Symlet scaling filter with 16 taps.
const SYM16_SCALING: [f64; 16] = [
    0.0018899503327594609,
    -0.0003029205147213668,
    -0.014952258337048231,
    0.0038087520138906151,
    0.049137179673607506,
    -0.027219029917056003,
    -0.051945838107709037,
    0.3644418948353314,
    0.77718575170052351,
    0.48135965125837221,
    -0.061273359067658524,
    -0.14329423835080971,
    0.0076074873249176054,
    0.031695087811492981,
    -0.00054213233179114812,
    -0.0033824159510061256,
];

/// 16-tap Symlet analysis filter.
#[derive(Debug, Clone)]
pub struct Symlet16 {
    hi_d: [f64; 16],
}

impl Symlet16 {
    pub fn new() -> Self {
        Self {
            hi_d: quadrature_mirror(&SYM16_SCALING),
        }
    }
}

impl Default for Symlet16 {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveletFilter for Symlet16 {
    fn name(&self) -> &str {
        "Symlet 16"
    }

    fn low_pass(&self) -> &[f64] {
        &SYM16_SCALING
    }

    fn high_pass(&self) -> &[f64] {
        &self.hi_d
    }
}

/// Derive the high-pass filter from a scaling filter.
///
/// QMF relation: `g[m] = (-1)^m * h[N-1-m]`
fn quadrature_mirror<const N: usize>(h: &[f64; N]) -> [f64; N] {
    let mut g = [0.0; N];
    for (m, tap) in g.iter_mut().enumerate() {
        let sign = if m % 2 == 0 { 1.0 } else { -1.0 };
        *tap = sign * h[N - 1 - m];
    }
    g
}
