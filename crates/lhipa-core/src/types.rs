//! Core types for pupil-signal analysis
//!
//! A pupil recording is a plain time series of diameters, sampled at a rate
//! that is only known implicitly: the caller supplies the number of samples
//! and the wall-clock span they cover.
//!
//! ```text
//!   diameter
//!     ^      .-.        .-.
//!     |  .--'   '-.  .-'   '--.
//!     |-'          ''          '--
//!     +-------------------------------> t
//!     |<-------- duration_secs ------>|
//!
//!   sampling_rate = samples.len() / duration_secs
//! ```

use serde::{Deserialize, Serialize};

/// A single pupil-diameter sample
pub type Sample = f64;

/// Result type for LHIPA operations
pub type LhipaResult<T> = Result<T, LhipaError>;

/// Errors that can occur while computing LHIPA
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LhipaError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Pupil signal too short for wavelet analysis: got {actual} samples, \
         at least {required} are required"
    )]
    InsufficientLength { required: usize, actual: usize },

    #[error("Signal length {0} is not a power of two")]
    InvalidSignalLength(usize),

    #[error("Numeric instability in {stage}: non-finite value encountered")]
    NumericInstability { stage: &'static str },
}

/// A borrowed pupil-diameter time series with its recording span
#[derive(Debug, Clone, Copy)]
pub struct PupilSignal<'a> {
    samples: &'a [Sample],
    duration_secs: f64,
}

impl<'a> PupilSignal<'a> {
    /// Wrap samples, checking the recording span.
    ///
    /// Fails with [`LhipaError::InvalidInput`] when the slice is empty or the
    /// duration is not a positive finite number. Sample values are checked
    /// separately by [`PupilSignal::ensure_finite`].
    pub fn new(samples: &'a [Sample], duration_secs: f64) -> LhipaResult<Self> {
        if samples.is_empty() {
            return Err(LhipaError::InvalidInput(
                "pupil signal contains no samples".to_string(),
            ));
        }
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(LhipaError::InvalidInput(format!(
                "duration must be a positive number of seconds, got {}",
                duration_secs
            )));
        }
        Ok(Self {
            samples,
            duration_secs,
        })
    }

    pub fn samples(&self) -> &'a [Sample] {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Reject NaN or infinite diameters (e.g. blinks passed through raw).
    pub fn ensure_finite(&self) -> LhipaResult<()> {
        ensure_finite(self.samples, "input")
    }

    /// Samples per second implied by length and duration.
    pub fn sampling_rate(&self) -> f64 {
        self.samples.len() as f64 / self.duration_secs
    }
}

/// LHIPA value together with the recording parameters it was computed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LhipaRecording {
    /// Corrected LHIPA value
    pub lhipa: f64,
    /// Span of the recording in seconds
    pub duration_secs: f64,
    /// Implied sampling rate in Hz
    pub sampling_rate: f64,
}

/// Check that every value produced by a pipeline stage is finite.
pub(crate) fn ensure_finite(values: &[f64], stage: &'static str) -> LhipaResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        tracing::warn!(stage, "non-finite value in pipeline stage");
        Err(LhipaError::NumericInstability { stage })
    }
}
