//! Delay bucketing.
//!
//! Maps a continuous checkout delay onto one of `n_interval` equal-width
//! buckets over `[0, 720)` minutes, plus a single unbounded overflow bucket
//! for anything at or beyond the horizon. The mapping is total: every finite
//! delay lands somewhere, including negative ones (early checkouts), which
//! clamp into the first bucket.

use crate::engine::EngineError;

/// Upper edge of the finite delay domain, in minutes (12 hours).
pub const MAX_DELAY_HORIZON_MINUTES: f64 = 720.0;

/// A slice of the delay domain.
///
/// `Bin(k)` is the k-th bucket `[(k-1)·w, k·w)` for width `w = 720/n`,
/// `k` in `1..=n`. `Overflow` absorbs `[720, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DelayBucket {
    Bin(u32),
    Overflow,
}

impl DelayBucket {
    /// Finite upper boundary of this bucket in minutes, `None` for overflow.
    /// This is the x coordinate the cancellation-rate curve is plotted at.
    pub fn upper_edge_minutes(&self, n_interval: u32) -> Option<f64> {
        match self {
            DelayBucket::Bin(k) => {
                Some(*k as f64 * (MAX_DELAY_HORIZON_MINUTES / n_interval as f64))
            }
            DelayBucket::Overflow => None,
        }
    }
}

/// Assigns delays to buckets for a fixed bucket count.
#[derive(Debug, Clone, Copy)]
pub struct DelayBinner {
    n_interval: u32,
    width: f64,
}

impl DelayBinner {
    /// Rejects a zero bucket count up front; the per-delay lookup is then
    /// infallible.
    pub fn new(n_interval: u32) -> Result<Self, EngineError> {
        if n_interval == 0 {
            return Err(EngineError::InvalidParameter(
                "n_interval must be a positive integer".to_string(),
            ));
        }

        Ok(Self {
            n_interval,
            width: MAX_DELAY_HORIZON_MINUTES / n_interval as f64,
        })
    }

    pub fn n_interval(&self) -> u32 {
        self.n_interval
    }

    /// Smallest bucket whose upper edge exceeds `delay`.
    ///
    /// Scans the edges `w, 2w, … 720`; a delay at or past the horizon maps to
    /// the overflow bucket rather than disappearing.
    pub fn bucket_for(&self, delay: f64) -> DelayBucket {
        for k in 1..=self.n_interval {
            if delay < k as f64 * self.width {
                return DelayBucket::Bin(k);
            }
        }
        DelayBucket::Overflow
    }
}
