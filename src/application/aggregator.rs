//! Per-target aggregation of recorded samples.
//!
//! The error mapping always carries every target in 1..=10, whether or not
//! any samples exist for it, so downstream consumers never have to deal with
//! missing keys. It is derived on every read and never persisted.

use std::collections::BTreeMap;

use crate::domain::errors::SampleLogError;
use crate::domain::sample::{Sample, TARGET_RANGE};
use crate::infrastructure::SampleLog;

/// Group actual durations by their integer target time.
///
/// Every target in [`TARGET_RANGE`] is present in the result, empty targets
/// included.
pub fn bucket_samples(samples: &[Sample]) -> BTreeMap<u8, Vec<f64>> {
    let mut buckets: BTreeMap<u8, Vec<f64>> =
        TARGET_RANGE.map(|target| (target, Vec::new())).collect();
    for sample in samples {
        // Parsing guarantees the target is in range, so the bucket exists.
        if let Some(bucket) = buckets.get_mut(&sample.target_secs) {
            bucket.push(sample.actual_secs);
        }
    }
    buckets
}

/// Mean of |target - actual| per bucket; an empty bucket scores 0.0.
pub fn average_errors(buckets: &BTreeMap<u8, Vec<f64>>) -> BTreeMap<u8, f64> {
    buckets
        .iter()
        .map(|(&target, actuals)| {
            let error = if actuals.is_empty() {
                0.0
            } else {
                let total: f64 = actuals
                    .iter()
                    .map(|actual| (f64::from(target) - actual).abs())
                    .sum();
                total / actuals.len() as f64
            };
            (target, error)
        })
        .collect()
}

/// Read the log and produce the full error mapping in one step.
pub fn load_error_mapping(log: &SampleLog) -> Result<BTreeMap<u8, f64>, SampleLogError> {
    let samples = log.read_all()?;
    Ok(average_errors(&bucket_samples(&samples)))
}
