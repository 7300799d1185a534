//! End-to-end behaviour of the LHIPA pipeline through the public API.

use approx::assert_relative_eq;
use lhipa_core::extend::extend_periodic;
use lhipa_core::prelude::*;
use lhipa_core::signals::{pupil_test_set, sine_wave};
use lhipa_core::{LhipaConfig, WaveletPacketEngine};

#[test]
fn short_signals_are_rejected_regardless_of_options() {
    let options = [
        LhipaOptions::default(),
        LhipaOptions::default().with_mod_max_threshold(0.5),
        LhipaOptions::default().with_corrections(Corrections {
            multiplicative: 2.0,
            additive: 0.1,
        }),
    ];
    for len in [1usize, 16, 64, 127] {
        let samples = vec![4.0; len];
        for opts in &options {
            let err = compute_lhipa(&samples, 1.0, opts).unwrap_err();
            assert_eq!(
                err,
                LhipaError::InsufficientLength {
                    required: 128,
                    actual: len
                }
            );
            assert!(err.to_string().contains("128"));
        }
    }
    assert!(compute_lhipa(&vec![4.0; 128], 1.0, &LhipaOptions::default()).is_ok());
}

#[test]
fn non_positive_duration_is_invalid_input() {
    let samples = sine_wave(256);
    for duration in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = compute_lhipa(&samples, duration, &LhipaOptions::default()).unwrap_err();
        assert!(matches!(err, LhipaError::InvalidInput(_)), "{:?}", err);
    }
    // Duration is checked before length
    let err = compute_lhipa(&[1.0; 10], 0.0, &LhipaOptions::default()).unwrap_err();
    assert!(matches!(err, LhipaError::InvalidInput(_)));
}

#[test]
fn empty_signal_is_invalid_input() {
    let err = compute_lhipa(&[], 1.0, &LhipaOptions::default()).unwrap_err();
    assert!(matches!(err, LhipaError::InvalidInput(_)));
}

#[test]
fn repeated_calls_are_bit_identical() {
    let samples = pupil_test_set(1, 900, 5).remove(0);
    let options = LhipaOptions::default().with_mod_max_threshold(0.01);
    let first = compute_lhipa(&samples, 15.0, &options).unwrap();
    for _ in 0..5 {
        assert_eq!(compute_lhipa(&samples, 15.0, &options).unwrap().to_bits(), first.to_bits());
    }
}

#[test]
fn extension_keeps_signal_in_the_middle() {
    let samples = pupil_test_set(1, 300, 9).remove(0);
    let extended = extend_periodic(&samples).unwrap();
    assert_eq!(extended.len(), 512);
    let pad = (512 - 300) / 2;
    assert_eq!(&extended[pad..pad + 300], samples.as_slice());
}

#[test]
fn analysis_depth_follows_signal_length() {
    let engine: WaveletPacketEngine = WaveletPacketEngine::default();
    for (len, depth) in [(128usize, 3usize), (256, 4), (512, 5), (4096, 8)] {
        assert_eq!(engine.analysis_depth(len), depth);
        let trace = compute_lhipa_traced(&vec![1.0; len], 1.0, &LhipaOptions::default()).unwrap();
        assert_eq!(trace.max_level, depth);
        assert_eq!(trace.levels.lof, depth / 2);
    }
}

#[test]
fn constant_signal_has_zero_lhipa() {
    for len in [128usize, 129, 255, 256, 300, 301, 1023, 1024] {
        let samples = vec![3.5; len];
        let lhipa = compute_lhipa(&samples, 2.0, &LhipaOptions::default()).unwrap();
        assert_eq!(lhipa, 0.0, "length {}", len);
    }
}

#[test]
fn constant_signal_with_uneven_padding_has_no_maxima() {
    for len in [129usize, 131, 255, 257, 301, 513, 777, 1023] {
        for value in [3.5, 0.1, 7.77, 4.2, 123.456] {
            let trace =
                compute_lhipa_traced(&vec![value; len], 2.0, &LhipaOptions::default()).unwrap();
            assert_eq!(trace.maxima_count, 0, "length {} value {}", len, value);
            assert_eq!(trace.lhipa, 0.0);
        }
    }
}

#[test]
fn flat_ratio_yields_no_maxima() {
    let trace = compute_lhipa_traced(&vec![3.5; 256], 1.0, &LhipaOptions::default()).unwrap();
    assert!(trace.high_band.iter().all(|&h| h == 0.0));
    assert_eq!(trace.maxima_count, 0);
    assert_eq!(trace.raw_lhipa, 0.0);
}

#[test]
fn default_corrections_leave_value_unchanged() {
    for (k, samples) in pupil_test_set(4, 512, 21).iter().enumerate() {
        let trace = compute_lhipa_traced(samples, 10.0, &LhipaOptions::default()).unwrap();
        assert_eq!(trace.lhipa, trace.raw_lhipa, "trace {}", k);
    }
}

#[test]
fn corrections_are_applied_to_raw_value() {
    let samples = pupil_test_set(1, 512, 3).remove(0);
    let raw = compute_lhipa(&samples, 10.0, &LhipaOptions::default()).unwrap();
    let corrected = compute_lhipa(
        &samples,
        10.0,
        &LhipaOptions::default().with_corrections(Corrections {
            multiplicative: 4.0,
            additive: 0.0,
        }),
    )
    .unwrap();
    assert_relative_eq!(corrected, raw / 4.0, max_relative = 1e-12);
}

#[test]
fn sine_is_finite_and_cutoff_lowers_count() {
    let samples = sine_wave(256);
    let plain = compute_lhipa(&samples, 1.0, &LhipaOptions::default()).unwrap();
    let cut = compute_lhipa(&samples, 1.0, &LhipaOptions::default().with_mod_max_threshold(0.05))
        .unwrap();
    assert!(plain.is_finite() && plain >= 0.0);
    assert!(cut.is_finite() && cut >= 0.0);
    assert!(cut <= plain);
}

#[test]
fn lhipa_does_not_depend_on_duration() {
    for samples in pupil_test_set(3, 600, 77) {
        let reference = compute_lhipa(&samples, 1.0, &LhipaOptions::default()).unwrap();
        for duration in [2.0, 5.0] {
            let value = compute_lhipa(&samples, duration, &LhipaOptions::default()).unwrap();
            assert_relative_eq!(value, reference, max_relative = 1e-12);
        }
    }
}

#[test]
fn generated_test_set_produces_valid_values() {
    let analyzer: LhipaAnalyzer = LhipaAnalyzer::default();
    let recordings = pupil_test_set(10, 512, 42);
    for result in analyzer.compute_batch(&recordings, 10.0) {
        let value = result.unwrap();
        assert!(value.is_finite() && value >= 0.0);
        // count / len never exceeds one
        assert!(value <= 1.0);
    }
}

#[test]
fn config_drives_analysis_options() {
    let config = LhipaConfig::parse(
        "analysis:\n  mod_max_threshold: 0.05\ncorrection:\n  multiplicative: 2.0\n",
    )
    .unwrap();
    let samples = sine_wave(256);
    let from_config = LhipaAnalyzer::new(config.options()).compute(&samples, 1.0).unwrap();
    let explicit = compute_lhipa(
        &samples,
        1.0,
        &LhipaOptions::default()
            .with_mod_max_threshold(0.05)
            .with_corrections(Corrections {
                multiplicative: 2.0,
                additive: 0.0,
            }),
    )
    .unwrap();
    assert_eq!(from_config, explicit);
}

#[test]
fn trace_serializes_to_yaml() {
    let trace = compute_lhipa_traced(&sine_wave(128), 1.0, &LhipaOptions::default()).unwrap();
    let yaml = serde_yaml::to_string(&trace).unwrap();
    assert!(yaml.contains("max_level: 3"));
    assert!(yaml.contains("thresholded:"));
}

#[test]
fn overflowing_samples_report_ratio_instability() {
    let samples: Vec<f64> = (0..256)
        .map(|i| if i % 2 == 0 { 1e308 } else { -1e308 })
        .collect();
    let err = compute_lhipa(&samples, 1.0, &LhipaOptions::default()).unwrap_err();
    assert_eq!(err, LhipaError::NumericInstability { stage: "ratio" });
}

#[test]
fn vanishing_duration_reports_result_instability() {
    let samples = pupil_test_set(1, 512, 42).remove(0);
    let trace = compute_lhipa_traced(&samples, 10.0, &LhipaOptions::default()).unwrap();
    assert!(trace.maxima_count > 0);

    // count / duration and the sampling rate both overflow
    let err = compute_lhipa(&samples, 1e-320, &LhipaOptions::default()).unwrap_err();
    assert_eq!(err, LhipaError::NumericInstability { stage: "lhipa" });
}
