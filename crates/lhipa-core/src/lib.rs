//! # LHIPA Core Library
//!
//! Computes the Low-to-High Index of Pupil Amplitude (LHIPA), a scalar
//! cognitive-load index, from a pupil-diameter time series recorded over a
//! known duration.
//!
//! ## Overview
//!
//! The signal is periodically extended to a power of two and decomposed with
//! a Symlet16 wavelet packet transform. A fine-scale (high-frequency) band and
//! a coarse-scale (low-frequency) band are normalized and divided into a
//! low/high ratio. Modulus maxima of the ratio are detected, thresholded with
//! the universal threshold, and counted per second relative to the sampling
//! rate.
//!
//! - **Extension**: periodic padding to the next power of two
//! - **Decomposition**: full wavelet packet matrix, one row per level
//! - **Bands**: detail band at level 1, coarse band at `max_level / 2`
//! - **Ratio**: nearest-lower alignment of the bands, guarded division
//! - **Maxima**: plateau-aware modulus maxima with a noise cutoff
//! - **Threshold**: universal threshold in keep-small mode
//!
//! ## Signal Flow
//!
//! ```text
//! samples → extend → packet decomposition → bands → normalize → ratio
//!         → modulus maxima → universal threshold → count / duration / rate → LHIPA
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lhipa_core::prelude::*;
//!
//! let samples = lhipa_core::signals::pupil_test_set(1, 512, 42).remove(0);
//! let lhipa = compute_lhipa(&samples, 10.0, &LhipaOptions::default()).unwrap();
//! assert!(lhipa >= 0.0);
//! ```

pub mod bands;
pub mod config;
pub mod extend;
pub mod lhipa;
pub mod modmax;
pub mod observe;
pub mod packet;
pub mod ratio;
pub mod signals;
pub mod threshold;
pub mod types;
pub mod wavelet;

// Re-export main types
pub use bands::BandLevels;
pub use config::{ConfigError, LhipaConfig};
pub use lhipa::{
    compute_lhipa, compute_lhipa_traced, Corrections, LhipaAnalyzer, LhipaOptions, LhipaTrace,
};
pub use packet::{DecompositionMatrix, WaveletPacketEngine};
pub use types::{LhipaError, LhipaRecording, LhipaResult, PupilSignal, Sample};
pub use wavelet::{Symlet16, WaveletFilter};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::lhipa::{
        compute_lhipa, compute_lhipa_traced, Corrections, LhipaAnalyzer, LhipaOptions, LhipaTrace,
    };
    pub use crate::types::{LhipaError, LhipaResult, Sample};
    pub use crate::wavelet::{Symlet16, WaveletFilter};
}
