//! Wavelet Packet Decomposition
//!
//! Forward wavelet packet transform over a dyadic-length signal. Unlike the
//! plain DWT pyramid, which only re-splits the approximation band, a packet
//! step re-splits every band of the previous level:
//!
//! ```text
//! level 0:  [ x x x x x x x x x x x x x x x x ]
//! level 1:  [ D D D D D D D D | A A A A A A A A ]
//! level 2:  [ DD DD DD DD | DA DA DA DA | AD AD AD AD | AA AA AA AA ]
//! ```
//!
//! Every level is stored at the full signal length so rows can be indexed
//! uniformly. Within each block the detail (high-pass) half comes first and
//! the approximation (low-pass) half second.
//!
//! ## Example
//!
//! ```rust
//! use lhipa_core::packet::WaveletPacketEngine;
//! use lhipa_core::wavelet::Symlet16;
//!
//! let engine = WaveletPacketEngine::new(Symlet16::new());
//! let signal: Vec<f64> = (0..256).map(|i| (i as f64 * 0.1).sin()).collect();
//! let matrix = engine.decompose(&signal).unwrap();
//! assert_eq!(matrix.levels(), 8);
//! assert_eq!(matrix.row(3).unwrap().len(), 256);
//! ```

use crate::types::{LhipaError, LhipaResult, Sample};
use crate::wavelet::{Symlet16, WaveletFilter};

/// Coefficients of every packet level, each stored at full signal length.
///
/// Row 0 is the input signal itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DecompositionMatrix {
    rows: Vec<Vec<f64>>,
}

impl DecompositionMatrix {
    /// Deepest level stored (`log2` of the signal length).
    pub fn levels(&self) -> usize {
        self.rows.len() - 1
    }

    /// Length of every row.
    pub fn signal_len(&self) -> usize {
        self.rows[0].len()
    }

    /// Coefficients of one level.
    pub fn row(&self, level: usize) -> Option<&[f64]> {
        self.rows.get(level).map(|r| r.as_slice())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(|r| r.as_slice())
    }
}

/// Forward wavelet packet engine, generic over the analysis filter.
#[derive(Debug, Clone)]
pub struct WaveletPacketEngine<F: WaveletFilter = Symlet16> {
    filter: F,
}

impl Default for WaveletPacketEngine<Symlet16> {
    fn default() -> Self {
        Self::new(Symlet16::new())
    }
}

impl<F: WaveletFilter> WaveletPacketEngine<F> {
    pub fn new(filter: F) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Analysis depth available for a recording of `sample_len` samples:
    /// `floor(log2(sample_len / mother_wavelet_length))`.
    ///
    /// Returns 0 when the recording is shorter than one mother wavelet.
    pub fn analysis_depth(&self, sample_len: usize) -> usize {
        let blocks = sample_len / self.filter.mother_wavelet_length();
        if blocks == 0 {
            0
        } else {
            blocks.ilog2() as usize
        }
    }

    /// Apply `level` packet steps to `signal`.
    ///
    /// Levels beyond `log2(len)` leave the signal unchanged, as there are no
    /// blocks left to split.
    pub fn forward(&self, signal: &[Sample], level: usize) -> LhipaResult<Vec<f64>> {
        let n = signal.len();
        if !n.is_power_of_two() {
            return Err(LhipaError::InvalidSignalLength(n));
        }

        let mut current = signal.to_vec();
        let mut scratch = vec![0.0; n];
        let mut block = n;
        let mut step = 0;

        while block >= 2 && step < level {
            for (src, dst) in current
                .chunks_exact(block)
                .zip(scratch.chunks_exact_mut(block))
            {
                self.analysis_step(src, dst);
            }
            std::mem::swap(&mut current, &mut scratch);
            block /= 2;
            step += 1;
        }

        Ok(current)
    }

    /// Decompose `signal` into every packet level `0..=log2(len)`.
    pub fn decompose(&self, signal: &[Sample]) -> LhipaResult<DecompositionMatrix> {
        let n = signal.len();
        if !n.is_power_of_two() {
            return Err(LhipaError::InvalidSignalLength(n));
        }
        let levels = n.trailing_zeros() as usize;

        let rows = (0..=levels)
            .map(|p| {
                tracing::trace!(level = p, len = n, "packet level");
                self.forward(signal, p)
            })
            .collect::<LhipaResult<Vec<_>>>()?;

        Ok(DecompositionMatrix { rows })
    }

    /// One filter-bank step on a single block: periodic correlation with the
    /// high-pass and low-pass taps, decimated by 2.
    ///
    /// `output[..n/2]` receives the detail half, `output[n/2..]` the
    /// approximation half. Taps are summed in index order.
    ///
    /// The high-pass taps see samples relative to the block's first sample.
    /// The taps only sum to zero up to rounding, and without the offset a
    /// constant block would leave a residual of order `1e-12 * x` in every
    /// detail packet below it.
    fn analysis_step(&self, input: &[f64], output: &mut [f64]) {
        let n = input.len();
        let half = n / 2;
        let lo_d = self.filter.low_pass();
        let hi_d = self.filter.high_pass();
        let offset = input[0];
        let (detail, approx) = output.split_at_mut(half);

        for i in 0..half {
            let mut lo_sum = 0.0;
            let mut hi_sum = 0.0;
            for (j, (&lo, &hi)) in lo_d.iter().zip(hi_d.iter()).enumerate() {
                let sample = input[(2 * i + j) % n];
                lo_sum += lo * sample;
                hi_sum += hi * (sample - offset);
            }
            detail[i] = hi_sum;
            approx[i] = lo_sum;
        }
    }
}

#[cfg(feature = "parallel")]
impl<F: WaveletFilter> WaveletPacketEngine<F> {
    /// Same as [`decompose`](Self::decompose) with levels computed on the
    /// rayon pool. Results are bit-identical to the sequential path.
    pub fn decompose_parallel(&self, signal: &[Sample]) -> LhipaResult<DecompositionMatrix> {
        use rayon::prelude::*;

        let n = signal.len();
        if !n.is_power_of_two() {
            return Err(LhipaError::InvalidSignalLength(n));
        }
        let levels = n.trailing_zeros() as usize;

        let rows = (0..=levels)
            .into_par_iter()
            .map(|p| self.forward(signal, p))
            .collect::<LhipaResult<Vec<_>>>()?;

        Ok(DecompositionMatrix { rows })
    }
}
