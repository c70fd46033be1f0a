//! Consecutive-pair linking.
//!
//! Joins each rental to the rental that returned the same vehicle immediately
//! before it, producing the "affected rentals" table the rest of the engine
//! works on. The join is explicit and checked: a dangling, ambiguous, self- or
//! cyclic predecessor reference is upstream data corruption and fails the
//! whole pass, while records that simply have no predecessor are dropped;
//! they carry no information about buffer thresholds.

use crate::engine::EngineError;
use crate::models::{Channel, RentalOutcome, RentalRecord};
use serde::Serialize;
use std::collections::HashMap;

/// A rental paired with the predecessor it immediately followed.
///
/// Carries the current rental's own fields plus the predecessor's checkout
/// delay, channel and outcome under `last_*` names. Built fresh on every
/// linking pass and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AffectedPair {
    pub rental_id: u64,
    pub previous_rental_id: u64,
    pub channel: Channel,
    pub delay_at_checkout: Option<f64>,
    pub time_since_previous: Option<f64>,
    pub outcome: RentalOutcome,
    /// Predecessor's checkout delay; `None` when its checkout was never
    /// recorded.
    pub last_delay: Option<f64>,
    pub last_channel: Channel,
    pub last_outcome: RentalOutcome,
}

/// Inner-join each record against its predecessor.
///
/// Output length equals the number of records whose `previous_rental_id`
/// resolves to exactly one other record in `records`; everything else either
/// drops out (no link) or fails the pass (`BrokenReference`).
pub fn link(records: &[RentalRecord]) -> Result<Vec<AffectedPair>, EngineError> {
    let mut by_id: HashMap<u64, &RentalRecord> = HashMap::with_capacity(records.len());
    let mut id_counts: HashMap<u64, usize> = HashMap::with_capacity(records.len());

    for record in records {
        *id_counts.entry(record.id).or_insert(0) += 1;
        by_id.insert(record.id, record);
    }

    check_predecessor_forest(records, &by_id, &id_counts)?;

    let mut pairs = Vec::with_capacity(records.len());
    for record in records {
        let Some(prev_id) = record.previous_rental_id else {
            continue;
        };

        // check_predecessor_forest has already rejected unresolvable links
        let predecessor = by_id[&prev_id];

        pairs.push(AffectedPair {
            rental_id: record.id,
            previous_rental_id: prev_id,
            channel: record.channel,
            delay_at_checkout: record.delay_at_checkout,
            time_since_previous: record.time_since_previous,
            outcome: record.outcome,
            last_delay: predecessor.delay_at_checkout,
            last_channel: predecessor.channel,
            last_outcome: predecessor.outcome,
        });
    }

    Ok(pairs)
}

/// Verify that the predecessor relation is a forest: every present link
/// resolves to exactly one record, no record precedes itself, and no chain
/// loops back on itself.
fn check_predecessor_forest(
    records: &[RentalRecord],
    by_id: &HashMap<u64, &RentalRecord>,
    id_counts: &HashMap<u64, usize>,
) -> Result<(), EngineError> {
    for record in records {
        let Some(prev_id) = record.previous_rental_id else {
            continue;
        };

        if prev_id == record.id {
            return Err(EngineError::BrokenReference(format!(
                "rental {} lists itself as its own predecessor",
                record.id
            )));
        }

        match id_counts.get(&prev_id).copied().unwrap_or(0) {
            0 => {
                return Err(EngineError::BrokenReference(format!(
                    "rental {} references predecessor {} which does not exist",
                    record.id, prev_id
                )))
            }
            1 => {}
            n => {
                return Err(EngineError::BrokenReference(format!(
                    "rental {} references predecessor {} which resolves to {} records",
                    record.id, prev_id, n
                )))
            }
        }
    }

    // Chain walk with tri-state marking: 0 = unvisited, 1 = on the current
    // chain, 2 = proven cycle-free.
    let mut state: HashMap<u64, u8> = HashMap::with_capacity(records.len());
    for record in records {
        if state.get(&record.id).copied().unwrap_or(0) == 2 {
            continue;
        }

        let mut chain = Vec::new();
        let mut current = record.id;
        loop {
            match state.get(&current).copied().unwrap_or(0) {
                2 => break,
                1 => {
                    return Err(EngineError::BrokenReference(format!(
                        "predecessor chain through rental {} forms a cycle",
                        current
                    )))
                }
                _ => {}
            }

            state.insert(current, 1);
            chain.push(current);

            match by_id.get(&current).and_then(|r| r.previous_rental_id) {
                Some(next) => current = next,
                None => break,
            }
        }

        for id in chain {
            state.insert(id, 2);
        }
    }

    Ok(())
}
