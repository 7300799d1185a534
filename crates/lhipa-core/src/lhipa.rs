//! LHIPA computation
//!
//! Wires the analysis stages together:
//!
//! ```text
//! samples ─► extend ─► packet decomposition ─┬─► high band (hif) ─► normalize ─┐
//!                                            └─► low band (lof)  ─► normalize ─┴─► ratio
//!     ratio ─► modulus maxima ─► universal threshold ("less") ─► count / duration / rate
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lhipa_core::lhipa::{compute_lhipa, LhipaOptions};
//!
//! let samples: Vec<f64> = (0..256)
//!     .map(|i| 3.5 + 0.3 * (2.0 * std::f64::consts::PI * i as f64 / 256.0).sin())
//!     .collect();
//! let value = compute_lhipa(&samples, 1.0, &LhipaOptions::default()).unwrap();
//! assert!(value.is_finite() && value >= 0.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bands::{high_band, low_band, normalize_by_scale, BandLevels};
use crate::extend::extend_periodic;
use crate::modmax::modulus_maxima;
use crate::packet::WaveletPacketEngine;
use crate::ratio::band_ratio;
use crate::threshold::{apply_less_threshold, universal_threshold};
use crate::types::{ensure_finite, LhipaError, LhipaRecording, LhipaResult, PupilSignal, Sample};
use crate::wavelet::{Symlet16, WaveletFilter};

/// Linear correction applied to the raw LHIPA value.
///
/// Both parameters default to zero, which leaves the value unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Corrections {
    /// Divisor applied first; ignored when zero
    pub multiplicative: f64,
    /// Subtracted afterwards, only while the value exceeds it
    pub additive: f64,
}

impl Corrections {
    /// No correction.
    pub const NONE: Self = Self {
        multiplicative: 0.0,
        additive: 0.0,
    };

    /// Divide by `multiplicative`, then subtract `additive` if the divided
    /// value exceeds it. The comparison uses the divided value, not `raw`.
    pub fn apply(&self, raw: f64) -> f64 {
        let scaled = if self.multiplicative != 0.0 {
            raw / self.multiplicative
        } else {
            raw
        };
        if scaled > self.additive {
            scaled - self.additive
        } else {
            scaled
        }
    }
}

/// Per-call analysis options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LhipaOptions {
    /// Modulus maxima smaller than this are discarded as rounding noise
    pub mod_max_threshold: f64,
    /// Emit every intermediate artifact as a `tracing` debug event
    pub debug_log: bool,
    /// Correction of the final value
    pub corrections: Corrections,
}

impl Default for LhipaOptions {
    fn default() -> Self {
        Self {
            mod_max_threshold: 0.0,
            debug_log: false,
            corrections: Corrections::NONE,
        }
    }
}

impl LhipaOptions {
    pub fn with_mod_max_threshold(mut self, threshold: f64) -> Self {
        self.mod_max_threshold = threshold;
        self
    }

    pub fn with_debug_log(mut self, enabled: bool) -> Self {
        self.debug_log = enabled;
        self
    }

    pub fn with_corrections(mut self, corrections: Corrections) -> Self {
        self.corrections = corrections;
        self
    }

    fn validate(&self) -> LhipaResult<()> {
        if !self.mod_max_threshold.is_finite() || self.mod_max_threshold < 0.0 {
            return Err(LhipaError::InvalidInput(format!(
                "modulus maxima threshold must be a non-negative number, got {}",
                self.mod_max_threshold
            )));
        }
        if !self.corrections.multiplicative.is_finite() || !self.corrections.additive.is_finite() {
            return Err(LhipaError::InvalidInput(
                "correction parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Maxima count and the rates derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaximaRate {
    /// Non-zero entries that survived thresholding
    pub maxima_count: usize,
    /// Samples per second
    pub sampling_rate: f64,
    /// `(maxima_count / duration) / sampling_rate`
    pub raw_lhipa: f64,
}

/// Count surviving maxima per second, relative to the sampling rate.
pub fn maxima_rate(thresholded: &[f64], signal_len: usize, duration_secs: f64) -> MaximaRate {
    let sampling_rate = signal_len as f64 / duration_secs;
    let maxima_count = thresholded.iter().filter(|v| v.abs() > 0.0).count();
    let raw_lhipa = (maxima_count as f64 / duration_secs) / sampling_rate;
    MaximaRate {
        maxima_count,
        sampling_rate,
        raw_lhipa,
    }
}

/// Every intermediate artifact of one LHIPA computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LhipaTrace {
    pub sample_count: usize,
    pub duration_secs: f64,
    /// Analysis depth `floor(log2(len / mother_wavelet_length))`
    pub max_level: usize,
    pub levels: BandLevels,
    pub extended_signal: Vec<f64>,
    pub high_band: Vec<f64>,
    pub low_band: Vec<f64>,
    pub normalized_high: Vec<f64>,
    pub normalized_low: Vec<f64>,
    pub ratio: Vec<f64>,
    pub maxima: Vec<f64>,
    /// Universal threshold
    pub lambda: f64,
    pub thresholded: Vec<f64>,
    pub maxima_count: usize,
    pub sampling_rate: f64,
    pub raw_lhipa: f64,
    /// Value after corrections
    pub lhipa: f64,
}

/// Compute LHIPA with the Symlet16 filter.
///
/// Fails with [`LhipaError::InvalidInput`] for an empty signal or a
/// non-positive duration, and with [`LhipaError::InsufficientLength`] when
/// fewer than 128 samples are given.
pub fn compute_lhipa(
    samples: &[Sample],
    duration_secs: f64,
    options: &LhipaOptions,
) -> LhipaResult<f64> {
    LhipaAnalyzer::new(*options).compute(samples, duration_secs)
}

/// Compute LHIPA and return every intermediate artifact.
pub fn compute_lhipa_traced(
    samples: &[Sample],
    duration_secs: f64,
    options: &LhipaOptions,
) -> LhipaResult<LhipaTrace> {
    LhipaAnalyzer::new(*options).compute_traced(samples, duration_secs)
}

/// LHIPA analyzer bound to a filter and a set of options.
#[derive(Debug, Clone)]
pub struct LhipaAnalyzer<F: WaveletFilter = Symlet16> {
    engine: WaveletPacketEngine<F>,
    options: LhipaOptions,
}

impl LhipaAnalyzer<Symlet16> {
    pub fn new(options: LhipaOptions) -> Self {
        Self::with_filter(Symlet16::new(), options)
    }
}

impl Default for LhipaAnalyzer<Symlet16> {
    fn default() -> Self {
        Self::new(LhipaOptions::default())
    }
}

impl<F: WaveletFilter> LhipaAnalyzer<F> {
    pub fn with_filter(filter: F, options: LhipaOptions) -> Self {
        Self {
            engine: WaveletPacketEngine::new(filter),
            options,
        }
    }

    pub fn options(&self) -> &LhipaOptions {
        &self.options
    }

    pub fn engine(&self) -> &WaveletPacketEngine<F> {
        &self.engine
    }

    /// Minimum number of samples accepted.
    pub fn min_signal_length(&self) -> usize {
        self.engine.filter().min_signal_length()
    }

    /// LHIPA of one recording.
    pub fn compute(&self, samples: &[Sample], duration_secs: f64) -> LhipaResult<f64> {
        self.compute_traced(samples, duration_secs).map(|t| t.lhipa)
    }

    /// LHIPA of one recording together with its sampling parameters.
    pub fn summarize(&self, samples: &[Sample], duration_secs: f64) -> LhipaResult<LhipaRecording> {
        let trace = self.compute_traced(samples, duration_secs)?;
        Ok(LhipaRecording {
            lhipa: trace.lhipa,
            duration_secs: trace.duration_secs,
            sampling_rate: trace.sampling_rate,
        })
    }

    /// LHIPA of many recordings sharing one duration.
    pub fn compute_batch<S: AsRef<[Sample]>>(
        &self,
        recordings: &[S],
        duration_secs: f64,
    ) -> Vec<LhipaResult<f64>> {
        recordings
            .iter()
            .map(|r| self.compute(r.as_ref(), duration_secs))
            .collect()
    }

    /// [`compute_batch`](Self::compute_batch) on the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn compute_batch_parallel<S: AsRef<[Sample]> + Sync>(
        &self,
        recordings: &[S],
        duration_secs: f64,
    ) -> Vec<LhipaResult<f64>> {
        use rayon::prelude::*;

        recordings
            .par_iter()
            .map(|r| self.compute(r.as_ref(), duration_secs))
            .collect()
    }

    /// Run the full pipeline, keeping every intermediate artifact.
    #[tracing::instrument(level = "debug", skip_all, fields(samples = samples.len(), duration_secs = duration_secs))]
    pub fn compute_traced(&self, samples: &[Sample], duration_secs: f64) -> LhipaResult<LhipaTrace> {
        let signal = PupilSignal::new(samples, duration_secs)?;

        let required = self.min_signal_length();
        if signal.len() < required {
            return Err(LhipaError::InsufficientLength {
                required,
                actual: signal.len(),
            });
        }
        signal.ensure_finite()?;
        self.options.validate()?;

        let log = self.options.debug_log;
        if log {
            debug!(input = ?signal.samples(), "input signal");
        }

        // 1. Extension and packet decomposition
        let extended = extend_periodic(signal.samples())?;
        if log {
            debug!(len = extended.len(), values = ?extended, "extended signal");
        }

        let max_level = self.engine.analysis_depth(signal.len());
        let levels = BandLevels::for_depth(max_level);
        if log {
            debug!(max_level, hif = levels.hif, lof = levels.lof, "decomposition levels");
        }

        let matrix = self.engine.decompose(&extended)?;
        let band_row = |level: usize| {
            matrix.row(level).ok_or_else(|| {
                LhipaError::InvalidInput(format!(
                    "decomposition level {} exceeds depth {}",
                    level,
                    matrix.levels()
                ))
            })
        };
        let high = high_band(band_row(levels.hif)?).to_vec();
        let low = low_band(band_row(levels.lof)?).to_vec();
        if log {
            debug!(high = ?high, low = ?low, "band coefficients");
        }

        // 2. Scale normalization
        let normalized_high = normalize_by_scale(&high, levels.hif);
        let normalized_low = normalize_by_scale(&low, levels.lof);
        if log {
            debug!(high = ?normalized_high, low = ?normalized_low, "normalized bands");
        }

        // 3. Low/high ratio
        let ratio = band_ratio(&normalized_low, &normalized_high, levels)?;
        ensure_finite(&ratio, "ratio")?;
        if log {
            debug!(len = ratio.len(), values = ?ratio, "band ratio");
        }

        // 4. Modulus maxima
        let maxima = modulus_maxima(&ratio, self.options.mod_max_threshold);
        ensure_finite(&maxima, "modulus maxima")?;
        if log {
            debug!(len = maxima.len(), values = ?maxima, "modulus maxima");
        }

        // 5-6. Universal threshold, "less" mode
        let lambda = universal_threshold(&maxima);
        if !lambda.is_finite() {
            return Err(LhipaError::NumericInstability {
                stage: "universal threshold",
            });
        }
        let thresholded = apply_less_threshold(&maxima, lambda);
        if log {
            debug!(lambda, values = ?thresholded, "thresholded maxima");
        }

        // 7. Maxima per second relative to the sampling rate
        let rate = maxima_rate(&thresholded, signal.len(), signal.duration_secs());
        if log {
            debug!(
                maxima_count = rate.maxima_count,
                duration_secs = signal.duration_secs(),
                sampling_rate = rate.sampling_rate,
                raw_lhipa = rate.raw_lhipa,
                "maxima rate"
            );
        }

        // 8. Correction
        let lhipa = self.options.corrections.apply(rate.raw_lhipa);
        if !lhipa.is_finite() {
            return Err(LhipaError::NumericInstability { stage: "lhipa" });
        }
        if log {
            debug!(lhipa, "corrected LHIPA");
        }

        Ok(LhipaTrace {
            sample_count: signal.len(),
            duration_secs: signal.duration_secs(),
            max_level,
            levels,
            extended_signal: extended,
            high_band: high,
            low_band: low,
            normalized_high,
            normalized_low,
            ratio,
            maxima,
            lambda,
            thresholded,
            maxima_count: rate.maxima_count,
            sampling_rate: rate.sampling_rate,
            raw_lhipa: rate.raw_lhipa,
            lhipa,
        })
    }
}
