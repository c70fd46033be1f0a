//! Headline dataset statistics.
//!
//! The descriptive numbers shown alongside the curve and the counterfactual:
//! average checkout delay, average gap between consecutive rentals, how much
//! of the fleet's activity is back-to-back at all, and how the affected set
//! splits around a chosen delay level.

use crate::engine::linker::AffectedPair;
use crate::engine::EngineError;
use crate::models::{Channel, RentalOutcome, RentalRecord};
use serde::Serialize;

/// Dataset-wide descriptive statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_rentals: usize,
    /// Rentals with a resolved predecessor on the same vehicle.
    pub affected_rentals: usize,
    /// Share of all rentals that are consecutive, as a percentage.
    pub consecutive_share_pct: Option<f64>,
    /// Mean checkout delay across affected rentals, skipping unrecorded ones.
    pub avg_checkout_delay_minutes: Option<f64>,
    /// Mean scheduled gap between an affected rental and its predecessor.
    pub avg_gap_minutes: Option<f64>,
}

pub fn summarize(records: &[RentalRecord], pairs: &[AffectedPair]) -> DatasetSummary {
    let consecutive_share_pct = if records.is_empty() {
        None
    } else {
        Some(pairs.len() as f64 / records.len() as f64 * 100.0)
    };

    DatasetSummary {
        total_rentals: records.len(),
        affected_rentals: pairs.len(),
        consecutive_share_pct,
        avg_checkout_delay_minutes: mean(pairs.iter().filter_map(|p| p.delay_at_checkout)),
        avg_gap_minutes: mean(pairs.iter().filter_map(|p| p.time_since_previous)),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Channel and outcome composition of one side of a delay split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SplitSide {
    pub total: usize,
    pub connect: usize,
    pub mobile: usize,
    pub completed: usize,
    pub canceled: usize,
}

impl SplitSide {
    fn add(&mut self, pair: &AffectedPair) {
        self.total += 1;
        match pair.channel {
            Channel::Connect => self.connect += 1,
            Channel::Mobile => self.mobile += 1,
        }
        match pair.outcome {
            RentalOutcome::Completed => self.completed += 1,
            RentalOutcome::Canceled => self.canceled += 1,
        }
    }
}

/// Affected rentals partitioned by whether the predecessor ran late past the
/// split point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelaySplitBreakdown {
    pub split_at_minutes: f64,
    /// Predecessor delay strictly above the split point.
    pub delayed: SplitSide,
    /// Everything else, including pairs with no recorded predecessor delay
    /// (an unknown delay cannot be asserted to be late).
    pub on_time: SplitSide,
}

pub fn delay_split(
    pairs: &[AffectedPair],
    split_at: f64,
) -> Result<DelaySplitBreakdown, EngineError> {
    if !split_at.is_finite() || split_at < 0.0 {
        return Err(EngineError::InvalidParameter(format!(
            "split point must be a non-negative number of minutes, got {split_at}"
        )));
    }

    let mut breakdown = DelaySplitBreakdown {
        split_at_minutes: split_at,
        delayed: SplitSide::default(),
        on_time: SplitSide::default(),
    };

    for pair in pairs {
        let delayed = matches!(pair.last_delay, Some(d) if d > split_at);
        if delayed {
            breakdown.delayed.add(pair);
        } else {
            breakdown.on_time.add(pair);
        }
    }

    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(
        delay: Option<f64>,
        gap: Option<f64>,
        last_delay: Option<f64>,
        channel: Channel,
        outcome: RentalOutcome,
    ) -> AffectedPair {
        AffectedPair {
            rental_id: 0,
            previous_rental_id: 0,
            channel,
            delay_at_checkout: delay,
            time_since_previous: gap,
            outcome,
            last_delay,
            last_channel: channel,
            last_outcome: RentalOutcome::Completed,
        }
    }

    fn record(id: u64) -> RentalRecord {
        RentalRecord {
            id,
            channel: Channel::Mobile,
            delay_at_checkout: None,
            previous_rental_id: None,
            time_since_previous: None,
            outcome: RentalOutcome::Completed,
        }
    }

    #[test]
    fn test_summarize() {
        let records: Vec<RentalRecord> = (1..=4).map(record).collect();
        let pairs = vec![
            pair(
                Some(30.0),
                Some(100.0),
                Some(10.0),
                Channel::Mobile,
                RentalOutcome::Completed,
            ),
            pair(
                Some(-10.0),
                Some(200.0),
                None,
                Channel::Connect,
                RentalOutcome::Canceled,
            ),
            pair(
                None,
                None,
                Some(90.0),
                Channel::Mobile,
                RentalOutcome::Completed,
            ),
        ];

        let summary = summarize(&records, &pairs);
        assert_eq!(summary.total_rentals, 4);
        assert_eq!(summary.affected_rentals, 3);
        assert_eq!(summary.consecutive_share_pct, Some(75.0));
        // Means skip the unrecorded values
        assert_eq!(summary.avg_checkout_delay_minutes, Some(10.0));
        assert_eq!(summary.avg_gap_minutes, Some(150.0));
    }

    #[test]
    fn test_summarize_empty_inputs_have_no_averages() {
        let summary = summarize(&[], &[]);
        assert_eq!(summary.total_rentals, 0);
        assert_eq!(summary.consecutive_share_pct, None);
        assert_eq!(summary.avg_checkout_delay_minutes, None);
        assert_eq!(summary.avg_gap_minutes, None);
    }

    #[test]
    fn test_delay_split() {
        let pairs = vec![
            pair(
                None,
                None,
                Some(400.0),
                Channel::Connect,
                RentalOutcome::Canceled,
            ),
            pair(
                None,
                None,
                Some(360.0),
                Channel::Mobile,
                RentalOutcome::Completed,
            ),
            pair(None, None, None, Channel::Mobile, RentalOutcome::Completed),
        ];

        let breakdown = delay_split(&pairs, 360.0).unwrap();

        assert_eq!(breakdown.delayed.total, 1);
        assert_eq!(breakdown.delayed.connect, 1);
        assert_eq!(breakdown.delayed.canceled, 1);

        // A delay exactly at the split point is not "late past it", and an
        // unknown delay lands on the on-time side
        assert_eq!(breakdown.on_time.total, 2);
        assert_eq!(breakdown.on_time.mobile, 2);
        assert_eq!(breakdown.on_time.completed, 2);
    }

    #[test]
    fn test_delay_split_rejects_bad_split_point() {
        assert!(matches!(
            delay_split(&[], -360.0),
            Err(EngineError::InvalidParameter(_))
        ));
    }
}
