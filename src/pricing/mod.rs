//! Car price prediction service.
//!
//! A separate subsystem from the delay analytics engine; the two share no
//! state. It applies a pre-fitted feature preprocessor and linear regressor
//! (shipped as a JSON artifact) to vehicle feature records. All categorical
//! validation happens at the request boundary: a value outside the fitted
//! domain never reaches the model.

pub mod features;
pub mod model;

pub use features::{CarFeatures, CarMake, CarType, FuelType, PaintColor};
pub use model::PriceModel;
