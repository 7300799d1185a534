//! Periodic signal extension to a power-of-two length
//!
//! The packet transform only accepts dyadic lengths. Shorter recordings are
//! padded on both sides with samples wrapped from the opposite end, so the
//! padded edges continue the signal instead of introducing a step:
//!
//! ```text
//! signal:    [a b c d e f]                  len 6 -> target 8, pad 1
//! extended:  [f | a b c d e f | a]
//! ```

use crate::types::{LhipaError, LhipaResult, Sample};

/// Smallest power of two that is `>= n`.
pub fn next_power_of_two(n: usize) -> LhipaResult<usize> {
    if n == 0 {
        return Err(LhipaError::InvalidInput(
            "cannot extend an empty signal".to_string(),
        ));
    }
    n.checked_next_power_of_two().ok_or_else(|| {
        LhipaError::InvalidInput(format!("signal length {} is too large to extend", n))
    })
}

/// Extend `signal` to the next power of two with periodic boundaries.
///
/// `pad = (target - len) / 2` samples are copied from the end of the signal
/// to the front. The back takes the remaining `target - len - pad` samples
/// from the start, so an odd padding puts the extra sample on the right.
pub fn extend_periodic(signal: &[Sample]) -> LhipaResult<Vec<Sample>> {
    let len = signal.len();
    let target = next_power_of_two(len)?;
    let pad = (target - len) / 2;

    let right = target - len - pad;

    let mut extended = Vec::with_capacity(target);
    extended.extend_from_slice(&signal[len - pad..]);
    extended.extend_from_slice(signal);
    extended.extend_from_slice(&signal[..right]);

    Ok(extended)
}
