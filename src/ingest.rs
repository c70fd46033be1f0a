//! Ingestion boundary.
//!
//! The engine itself never touches the filesystem; this module is the one
//! place that does. It reads the upstream rental export (a JSON array using
//! the operator's column names), translates it into the analysis schema, and
//! materializes the immutable `DatasetSnapshot` every query runs against.
//! Re-using one snapshot across requests is the caller's caching strategy;
//! the engine recomputes nothing behind its back.

use crate::engine::{link, AffectedPair};
use crate::models::{Channel, RentalOutcome, RentalRecord};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// One row of the upstream export, under its original column names.
#[derive(Debug, Deserialize)]
struct RawRentalRow {
    rental_id: u64,
    checkin_type: Channel,
    delay_at_checkout_in_minutes: Option<f64>,
    previous_ended_rental_id: Option<u64>,
    time_delta_with_previous_rental_in_minutes: Option<f64>,
    state: RentalOutcome,
}

impl From<RawRentalRow> for RentalRecord {
    fn from(row: RawRentalRow) -> Self {
        RentalRecord {
            id: row.rental_id,
            channel: row.checkin_type,
            delay_at_checkout: row.delay_at_checkout_in_minutes,
            previous_rental_id: row.previous_ended_rental_id,
            time_since_previous: row.time_delta_with_previous_rental_in_minutes,
            outcome: row.state,
        }
    }
}

/// An immutable view of the rental log with its pair table built once.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    records: Vec<RentalRecord>,
    pairs: Vec<AffectedPair>,
}

impl DatasetSnapshot {
    /// Build a snapshot from already-materialized records, running the
    /// linking pass (and its integrity checks) up front.
    pub fn from_records(records: Vec<RentalRecord>) -> Result<Self> {
        let pairs = link(&records).context("rental log failed integrity checks")?;
        Ok(Self { records, pairs })
    }

    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }

    pub fn pairs(&self) -> &[AffectedPair] {
        &self.pairs
    }

    pub fn total_rentals(&self) -> usize {
        self.records.len()
    }

    /// Canceled rentals within the affected set; the denominator of the
    /// friction-loss metric.
    pub fn canceled_affected(&self) -> usize {
        self.pairs
            .iter()
            .filter(|p| p.outcome == RentalOutcome::Canceled)
            .count()
    }
}

/// Load the upstream JSON export and materialize a snapshot.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<DatasetSnapshot> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rental export {}", path.display()))?;

    let rows: Vec<RawRentalRow> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse rental export {}", path.display()))?;

    let records: Vec<RentalRecord> = rows.into_iter().map(RentalRecord::from).collect();
    let snapshot = DatasetSnapshot::from_records(records)?;

    info!(
        path = %path.display(),
        rentals = snapshot.total_rentals(),
        affected = snapshot.pairs().len(),
        "📦 rental snapshot loaded"
    );

    Ok(snapshot)
}
