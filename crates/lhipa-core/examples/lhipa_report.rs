//! Compute LHIPA for a generated pupil test set and print one trace
//!
//! Run with: cargo run --example lhipa_report -p lhipa-core

use lhipa_core::observe::init_logging;
use lhipa_core::prelude::*;
use lhipa_core::signals::{pupil_test_set, DEFAULT_TRACE_LEN};
use lhipa_core::LhipaConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LhipaConfig::load()?;
    init_logging(&config.logging);

    let analyzer = LhipaAnalyzer::new(config.options());
    let duration = 10.0;
    let recordings = pupil_test_set(10, DEFAULT_TRACE_LEN, 42);

    println!(
        "LHIPA over {} recordings of {} samples ({} s each)\n",
        recordings.len(),
        DEFAULT_TRACE_LEN,
        duration
    );
    for (i, result) in analyzer.compute_batch(&recordings, duration).iter().enumerate() {
        match result {
            Ok(value) => println!("  recording {:>2}: {:.6}", i, value),
            Err(e) => println!("  recording {:>2}: error: {}", i, e),
        }
    }

    let trace = analyzer.compute_traced(&recordings[0], duration)?;
    println!(
        "\nrecording 0: max_level={} hif={} lof={} lambda={:.4} maxima={} rate={:.1} Hz",
        trace.max_level,
        trace.levels.hif,
        trace.levels.lof,
        trace.lambda,
        trace.maxima_count,
        trace.sampling_rate
    );

    let summary = analyzer.summarize(&recordings[0], duration)?;
    println!("{}", serde_yaml::to_string(&summary)?);

    Ok(())
}
