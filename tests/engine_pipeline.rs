//! Integration tests for the analytics pipeline behind the ingestion
//! boundary: raw export file in, linked snapshot out, curve and
//! counterfactual computed on top.

use std::io::Write;
use std::path::PathBuf;

use delaygate_backend::engine::{self, DelayBucket, EngineError};
use delaygate_backend::ingest;
use delaygate_backend::models::Channel;
use tempfile::NamedTempFile;

fn write_export(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp export");
    file.write_all(json.as_bytes())
        .expect("failed to write temp export");
    file
}

#[test]
fn test_snapshot_from_export_file() {
    let export = write_export(
        r#"[
        { "rental_id": 1, "checkin_type": "mobile",
          "delay_at_checkout_in_minutes": 100.0,
          "previous_ended_rental_id": null,
          "time_delta_with_previous_rental_in_minutes": null,
          "state": "ended" },
        { "rental_id": 2, "checkin_type": "connect",
          "delay_at_checkout_in_minutes": -7.5,
          "previous_ended_rental_id": 1,
          "time_delta_with_previous_rental_in_minutes": 120.0,
          "state": "canceled" },
        { "rental_id": 3, "checkin_type": "mobile",
          "delay_at_checkout_in_minutes": null,
          "previous_ended_rental_id": null,
          "time_delta_with_previous_rental_in_minutes": null,
          "state": "ended" }
    ]"#,
    );

    let snapshot = ingest::load_snapshot(export.path()).unwrap();
    assert_eq!(snapshot.total_rentals(), 3);
    assert_eq!(snapshot.pairs().len(), 1);
    assert_eq!(snapshot.canceled_affected(), 1);

    let pair = &snapshot.pairs()[0];
    assert_eq!(pair.rental_id, 2);
    assert_eq!(pair.last_delay, Some(100.0));
    assert_eq!(pair.channel, Channel::Connect);
}

#[test]
fn test_curve_and_impact_end_to_end() {
    // Four predecessor/successor chains; predecessor delays 100, 400, 700,
    // 750, successor outcomes alternating completed/canceled.
    let export = write_export(
        r#"[
        { "rental_id": 1, "checkin_type": "mobile", "delay_at_checkout_in_minutes": 100.0,
          "previous_ended_rental_id": null, "time_delta_with_previous_rental_in_minutes": null, "state": "ended" },
        { "rental_id": 2, "checkin_type": "mobile", "delay_at_checkout_in_minutes": 400.0,
          "previous_ended_rental_id": null, "time_delta_with_previous_rental_in_minutes": null, "state": "ended" },
        { "rental_id": 3, "checkin_type": "mobile", "delay_at_checkout_in_minutes": 700.0,
          "previous_ended_rental_id": null, "time_delta_with_previous_rental_in_minutes": null, "state": "ended" },
        { "rental_id": 4, "checkin_type": "mobile", "delay_at_checkout_in_minutes": 750.0,
          "previous_ended_rental_id": null, "time_delta_with_previous_rental_in_minutes": null, "state": "ended" },
        { "rental_id": 5, "checkin_type": "mobile", "delay_at_checkout_in_minutes": 3.0,
          "previous_ended_rental_id": 1, "time_delta_with_previous_rental_in_minutes": 60.0, "state": "ended" },
        { "rental_id": 6, "checkin_type": "mobile", "delay_at_checkout_in_minutes": 5.0,
          "previous_ended_rental_id": 2, "time_delta_with_previous_rental_in_minutes": 60.0, "state": "canceled" },
        { "rental_id": 7, "checkin_type": "mobile", "delay_at_checkout_in_minutes": 1.0,
          "previous_ended_rental_id": 3, "time_delta_with_previous_rental_in_minutes": 60.0, "state": "ended" },
        { "rental_id": 8, "checkin_type": "mobile", "delay_at_checkout_in_minutes": null,
          "previous_ended_rental_id": 4, "time_delta_with_previous_rental_in_minutes": 60.0, "state": "canceled" },
        { "rental_id": 9, "checkin_type": "connect", "delay_at_checkout_in_minutes": 0.0,
          "previous_ended_rental_id": null, "time_delta_with_previous_rental_in_minutes": null, "state": "ended" },
        { "rental_id": 10, "checkin_type": "connect", "delay_at_checkout_in_minutes": null,
          "previous_ended_rental_id": null, "time_delta_with_previous_rental_in_minutes": null, "state": "ended" }
    ]"#,
    );

    let snapshot = ingest::load_snapshot(export.path()).unwrap();
    assert_eq!(snapshot.total_rentals(), 10);
    assert_eq!(snapshot.pairs().len(), 4);

    // Curve with two buckets of width 360
    let table = engine::aggregate(snapshot.pairs(), 2).unwrap();
    let mid = &table[&(DelayBucket::Bin(2), Channel::Mobile)];
    assert_eq!(mid.sample_count, 2);
    assert!((mid.cancellation_rate - 0.5).abs() < f64::EPSILON);
    assert!(table.contains_key(&(DelayBucket::Overflow, Channel::Mobile)));

    // Threshold counterfactual at 500 minutes
    let counts = engine::simulate(snapshot.pairs(), 500.0, None).unwrap();
    assert_eq!(counts.would_drop_completed, 1);
    assert_eq!(counts.would_drop_canceled, 1);
    assert_eq!(
        counts.revenue_loss_pct(snapshot.total_rentals()).unwrap(),
        0.0
    );
    assert_eq!(
        counts
            .friction_loss_pct(snapshot.canceled_affected())
            .unwrap(),
        0.5
    );
}

#[test]
fn test_corrupt_export_fails_loudly() {
    let export = write_export(
        r#"[
        { "rental_id": 1, "checkin_type": "mobile", "delay_at_checkout_in_minutes": 10.0,
          "previous_ended_rental_id": 999, "time_delta_with_previous_rental_in_minutes": 45.0, "state": "ended" }
    ]"#,
    );

    let err = ingest::load_snapshot(export.path()).unwrap_err();
    let engine_err = err
        .downcast_ref::<EngineError>()
        .expect("expected an EngineError in the chain");
    assert!(matches!(engine_err, EngineError::BrokenReference(_)));
}

#[test]
fn test_shipped_sample_artifacts_parse() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let snapshot = ingest::load_snapshot(root.join("data/sample_rentals.json")).unwrap();
    assert!(snapshot.total_rentals() > 0);
    assert!(snapshot.pairs().len() > 0);
    assert!(snapshot.canceled_affected() > 0);

    let model =
        delaygate_backend::pricing::PriceModel::from_file(root.join("data/pricing_model.json"))
            .unwrap();
    assert!(model.intercept > 0.0);
}
