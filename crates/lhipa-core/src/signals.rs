//! Synthetic test signals
//!
//! Deterministic inputs for exercising the pipeline without recorded data:
//! a single sine period and a seeded set of pupil-diameter-like traces whose
//! oscillation speeds up over the recording.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Samples per generated pupil trace by default.
pub const DEFAULT_TRACE_LEN: usize = 32 * 16;

/// One full sine period spread over `n` samples.
pub fn sine_wave(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * PI * i as f64 / n as f64).sin())
        .collect()
}

/// Generate `count` pupil-diameter traces of `len` samples each.
///
/// Trace `k` oscillates with an instantaneous frequency that grows with both
/// the sample index and `k`. Every sample draws a baseline in `[3.5, 7.0)` mm,
/// an amplitude in `[0.8, 1.2)` and noise in `[-0.05, 0.05)`, and is rounded
/// to two decimals. The same seed always yields the same set.
pub fn pupil_test_set(count: usize, len: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|k| {
            let mut phase = 0.0;
            (0..len)
                .map(|x| {
                    let step = ((x + 1) * (k + 1)) as f64 / 100.0;
                    phase += 1.0 / (step + 1.0);

                    let amplitude = 0.8 + rng.gen::<f64>() * 0.4;
                    let baseline = 3.5 + rng.gen::<f64>() * 3.5;
                    let noise = rng.gen::<f64>() * 0.1 - 0.05;
                    round_to(baseline + amplitude * phase.sin() + noise, 2)
                })
                .collect()
        })
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
