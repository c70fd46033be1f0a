//! Per-bucket cancellation rates.
//!
//! Groups affected pairs by (bucket of the predecessor's delay, booking
//! channel) and computes the empirical cancellation rate and sample size of
//! each group. This is the data behind the delay/cancellation-rate curve.

use crate::engine::binning::{DelayBinner, DelayBucket};
use crate::engine::linker::AffectedPair;
use crate::engine::EngineError;
use crate::models::{Channel, RentalOutcome};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

pub type RateKey = (DelayBucket, Channel);

/// Cancellation statistics for one (bucket, channel) group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketRate {
    /// Fraction of the group's rentals that were canceled, in `[0, 1]`.
    pub cancellation_rate: f64,
    /// Number of affected pairs behind the rate.
    pub sample_count: usize,
}

/// Compute the cancellation-rate table for one bucket count.
///
/// Pairs whose predecessor never recorded a checkout delay have no place on
/// the curve and are skipped. Groups nobody falls into are simply absent from
/// the result; a rate is only ever formed over a count that was observed to
/// be positive.
pub fn aggregate(
    pairs: &[AffectedPair],
    n_interval: u32,
) -> Result<HashMap<RateKey, BucketRate>, EngineError> {
    let binner = DelayBinner::new(n_interval)?;

    let mut groups: HashMap<RateKey, (usize, usize)> = HashMap::new();
    for pair in pairs {
        let Some(last_delay) = pair.last_delay else {
            continue;
        };

        let key = (binner.bucket_for(last_delay), pair.channel);
        let (canceled, total) = groups.entry(key).or_insert((0, 0));
        *total += 1;
        if pair.outcome == RentalOutcome::Canceled {
            *canceled += 1;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(key, (canceled, total))| {
            (
                key,
                BucketRate {
                    cancellation_rate: canceled as f64 / total as f64,
                    sample_count: total,
                },
            )
        })
        .collect())
}

/// Aggregate across several bucket counts at once.
///
/// Each bucket count is an independent pure query over the same immutable
/// pair table, so the sweep fans out across threads with no synchronization.
pub fn aggregate_sweep(
    pairs: &[AffectedPair],
    n_intervals: &[u32],
) -> Result<Vec<(u32, HashMap<RateKey, BucketRate>)>, EngineError> {
    n_intervals
        .par_iter()
        .map(|&n| aggregate(pairs, n).map(|table| (n, table)))
        .collect()
}
