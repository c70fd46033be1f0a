//! Delay-Impact Analytics Engine
//!
//! Pure, stateless computation over an immutable snapshot of rental records:
//!
//! ```text
//! Vec<RentalRecord>
//!        │
//!        ▼
//! ┌─────────────┐     ┌──────────────┐     ┌────────────────┐
//! │   linker    │────▶│  aggregate   │────▶│ rate curve     │
//! │ (pair join) │     │ (bin + rate) │     │ (bucket, chan) │
//! └──────┬──────┘     └──────────────┘     └────────────────┘
//!        │
//!        ▼
//! ┌─────────────┐     ┌──────────────────────┐
//! │  simulate   │────▶│ drop counts + losses │
//! │ (threshold) │     └──────────────────────┘
//! └─────────────┘
//! ```
//!
//! The two downstream computations never interact, and no function here
//! mutates shared state; every call is safe to repeat or run concurrently on
//! the same snapshot. All I/O and caching live with the callers.

pub mod aggregate;
pub mod binning;
pub mod linker;
pub mod simulate;
pub mod summary;

pub use aggregate::{aggregate, aggregate_sweep, BucketRate, RateKey};
pub use binning::{DelayBinner, DelayBucket, MAX_DELAY_HORIZON_MINUTES};
pub use linker::{link, AffectedPair};
pub use simulate::{simulate, DropCounts};
pub use summary::{delay_split, summarize, DatasetSummary, DelaySplitBreakdown};

use std::fmt;

/// Failures the engine surfaces to callers.
///
/// Each variant carries a human-readable description of the offending input;
/// none of them is recoverable inside the engine and no partial result is
/// ever returned alongside one.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A predecessor link exists but cannot be resolved to exactly one record
    /// (dangling reference, duplicate id, self-reference, or cycle).
    BrokenReference(String),
    /// A query parameter was rejected before any computation began.
    InvalidParameter(String),
    /// A ratio was requested whose denominator is zero.
    DivisionUndefined(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::BrokenReference(msg) => write!(f, "broken predecessor reference: {msg}"),
            EngineError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            EngineError::DivisionUndefined(msg) => write!(f, "division undefined: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
