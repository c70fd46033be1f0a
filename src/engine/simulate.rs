//! Buffer-threshold counterfactual.
//!
//! Answers: if a minimum delay buffer had been enforced between consecutive
//! rentals, which affected rentals would have been blocked, and what would
//! that have cost? A pair is blocked when its predecessor's checkout delay
//! sits strictly below the threshold; a pair whose predecessor delay is
//! unknown cannot be asserted below any threshold and is left alone.

use crate::engine::linker::AffectedPair;
use crate::engine::EngineError;
use crate::models::{Channel, RentalOutcome};
use serde::Serialize;

/// How many affected rentals a threshold policy would have blocked, split by
/// what actually happened to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropCounts {
    /// Blocked rentals that in reality ran to completion (lost business).
    pub would_drop_completed: usize,
    /// Blocked rentals that in reality were canceled (friction avoided).
    pub would_drop_canceled: usize,
}

impl DropCounts {
    pub fn selected(&self) -> usize {
        self.would_drop_completed + self.would_drop_canceled
    }

    /// Net share of all rentals the policy would needlessly block, as a
    /// percentage. Negative when the policy prevents more cancellations than
    /// it blocks completions, which is a meaningful result and not clamped.
    pub fn revenue_loss_pct(&self, total_rentals: usize) -> Result<f64, EngineError> {
        if total_rentals == 0 {
            return Err(EngineError::DivisionUndefined(
                "total rental count is zero".to_string(),
            ));
        }

        let net = self.would_drop_completed as f64 - self.would_drop_canceled as f64;
        Ok(net / total_rentals as f64 * 100.0)
    }

    /// Blocked completions per actual cancellation in the affected set. A
    /// ratio, not a percentage bounded by 100.
    pub fn friction_loss_pct(&self, total_canceled_affected: usize) -> Result<f64, EngineError> {
        if total_canceled_affected == 0 {
            return Err(EngineError::DivisionUndefined(
                "no canceled rentals in the affected set".to_string(),
            ));
        }

        Ok(self.would_drop_completed as f64 / total_canceled_affected as f64)
    }
}

/// Partition the pairs a threshold policy would block by their real outcome.
pub fn simulate(
    pairs: &[AffectedPair],
    threshold: f64,
    channel_filter: Option<Channel>,
) -> Result<DropCounts, EngineError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(EngineError::InvalidParameter(format!(
            "threshold must be a non-negative number of minutes, got {threshold}"
        )));
    }

    let mut counts = DropCounts {
        would_drop_completed: 0,
        would_drop_canceled: 0,
    };

    for pair in pairs {
        let Some(last_delay) = pair.last_delay else {
            continue;
        };
        if last_delay >= threshold {
            continue;
        }
        if let Some(channel) = channel_filter {
            if pair.channel != channel {
                continue;
            }
        }

        match pair.outcome {
            RentalOutcome::Completed => counts.would_drop_completed += 1,
            RentalOutcome::Canceled => counts.would_drop_canceled += 1,
        }
    }

    Ok(counts)
}
