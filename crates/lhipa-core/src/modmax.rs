//! Modulus maxima detection
//!
//! Marks the local peaks of `|x|`. A peak may sit on one edge of a plateau
//! (equal to one neighbour, strictly above the other) but a flat run equal
//! to both neighbours is not a peak.
//!
//! ```text
//!   |x|:   1  3  2  2  5  5  1  4
//!   peak:  .  3  .  .  5  5  .  4
//! ```

/// Left and right neighbours of `values[i]`. A missing neighbour at either
/// end of the sequence is the element itself.
pub fn neighbours(values: &[f64], i: usize) -> (f64, f64) {
    let own = values[i];
    let left = if i >= 1 { values[i - 1] } else { own };
    let right = values.get(i + 1).copied().unwrap_or(own);
    (left, right)
}

/// Plateau-aware local maximum test.
fn is_local_max(left: f64, value: f64, right: f64) -> bool {
    (left <= value && value >= right) && (left < value || value > right)
}

/// Detect modulus maxima of `signal`.
///
/// The output has the same length as the input. Each detected peak holds
/// its magnitude; peaks below `min_magnitude` and all other positions hold
/// zero.
pub fn modulus_maxima(signal: &[f64], min_magnitude: f64) -> Vec<f64> {
    let modulus: Vec<f64> = signal.iter().map(|x| x.abs()).collect();

    (0..signal.len())
        .map(|i| {
            let (left, right) = neighbours(&modulus, i);
            if !is_local_max(left, modulus[i], right) {
                return 0.0;
            }
            let mag = (signal[i] * signal[i]).sqrt();
            if mag < min_magnitude {
                0.0
            } else {
                mag
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours_at_boundaries() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(neighbours(&v, 0), (1.0, 2.0));
        assert_eq!(neighbours(&v, 1), (1.0, 3.0));
        assert_eq!(neighbours(&v, 2), (2.0, 3.0));
        assert_eq!(neighbours(&[7.0], 0), (7.0, 7.0));
    }

    #[test]
    fn test_plateau_edges() {
        let signal = [1.0, 3.0, 2.0, 2.0, 5.0, 5.0, 1.0, 4.0];
        let maxima = modulus_maxima(&signal, 0.0);
        assert_eq!(maxima, vec![0.0, 3.0, 0.0, 0.0, 5.0, 5.0, 0.0, 4.0]);
    }

    #[test]
    fn test_uses_modulus() {
        let signal = [0.5, -3.0, 1.0, 2.0, -0.5];
        let maxima = modulus_maxima(&signal, 0.0);
        assert_eq!(maxima, vec![0.0, 3.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_flat_signal_has_no_maxima() {
        let maxima = modulus_maxima(&[2.0; 16], 0.0);
        assert!(maxima.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_boundary_peaks() {
        // First element compares against itself on the left
        let maxima = modulus_maxima(&[5.0, 1.0, 1.0, 6.0], 0.0);
        assert_eq!(maxima, vec![5.0, 0.0, 0.0, 6.0]);
    }

    #[test]
    fn test_min_magnitude_cutoff() {
        let signal = [0.0, 0.03, 0.0, 0.2, 0.0, 0.05, 0.0];
        let maxima = modulus_maxima(&signal, 0.05);
        assert_eq!(maxima, vec![0.0, 0.0, 0.0, 0.2, 0.0, 0.05, 0.0]);
    }

    #[test]
    fn test_raising_cutoff_never_adds_maxima() {
        let signal: Vec<f64> = (0..200).map(|i| (i as f64 * 0.7).sin() * (i as f64 * 0.05).cos()).collect();
        let count = |t: f64| modulus_maxima(&signal, t).iter().filter(|&&m| m > 0.0).count();
        let mut previous = count(0.0);
        for t in [0.01, 0.05, 0.1, 0.5, 1.0] {
            let c = count(t);
            assert!(c <= previous, "threshold {} increased count", t);
            previous = c;
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(modulus_maxima(&[], 0.0).is_empty());
    }
}
