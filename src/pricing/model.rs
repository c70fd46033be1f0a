//! Pre-fitted pricing model.
//!
//! The artifact is the serialized output of an offline fit: per-numeric-
//! feature standardization parameters and a linear weight for every encoded
//! column (one-hot categories with the baseline level at weight zero, plus
//! the boolean equipment flags). Applying it is a dot product; no fitting
//! happens in this process.

use crate::pricing::features::CarFeatures;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Standardization parameters and weight for one numeric feature.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NumericTerm {
    pub mean: f64,
    pub std: f64,
    pub weight: f64,
}

impl NumericTerm {
    fn apply(&self, value: f64) -> f64 {
        if self.std > 0.0 {
            (value - self.mean) / self.std * self.weight
        } else {
            0.0
        }
    }
}

/// Weights for the boolean equipment flags (applied when the flag is set).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FlagWeights {
    pub private_parking_available: f64,
    pub has_gps: f64,
    pub has_air_conditioning: f64,
    pub automatic_car: f64,
    pub has_getaround_connect: f64,
    pub has_speed_regulator: f64,
    pub winter_tires: f64,
}

/// The fitted preprocessor + regressor.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceModel {
    pub intercept: f64,
    pub mileage: NumericTerm,
    pub engine_power: NumericTerm,
    /// One-hot weights keyed by category label; levels absent from the map
    /// are the fit's baseline and contribute zero.
    pub model_key: HashMap<String, f64>,
    pub fuel: HashMap<String, f64>,
    pub paint_color: HashMap<String, f64>,
    pub car_type: HashMap<String, f64>,
    pub flags: FlagWeights,
}

impl PriceModel {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read pricing model {}", path.display()))?;
        let model: PriceModel = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse pricing model {}", path.display()))?;

        info!(path = %path.display(), "pricing model loaded");
        Ok(model)
    }

    /// Predicted daily rental price for one vehicle.
    pub fn predict_one(&self, car: &CarFeatures) -> f64 {
        let mut price = self.intercept;

        price += self.mileage.apply(car.mileage);
        price += self.engine_power.apply(car.engine_power);

        price += category_weight(&self.model_key, car.model_key.as_str());
        price += category_weight(&self.fuel, car.fuel.as_str());
        price += category_weight(&self.paint_color, car.paint_color.as_str());
        price += category_weight(&self.car_type, car.car_type.as_str());

        let flags = &self.flags;
        for (set, weight) in [
            (car.private_parking_available, flags.private_parking_available),
            (car.has_gps, flags.has_gps),
            (car.has_air_conditioning, flags.has_air_conditioning),
            (car.automatic_car, flags.automatic_car),
            (car.has_getaround_connect, flags.has_getaround_connect),
            (car.has_speed_regulator, flags.has_speed_regulator),
            (car.winter_tires, flags.winter_tires),
        ] {
            if set {
                price += weight;
            }
        }

        price
    }

    /// Predict a batch, one price per car, in request order.
    pub fn predict_batch(&self, cars: &[CarFeatures]) -> Vec<f64> {
        cars.iter().map(|car| self.predict_one(car)).collect()
    }
}

fn category_weight(weights: &HashMap<String, f64>, label: &str) -> f64 {
    weights.get(label).copied().unwrap_or(0.0)
}
