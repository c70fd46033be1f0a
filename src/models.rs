use serde::{Deserialize, Serialize};

/// Booking channel a rental was made through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Connect,
    Mobile,
}

impl Channel {
    pub fn as_str(&self) -> &str {
        match self {
            Channel::Connect => "connect",
            Channel::Mobile => "mobile",
        }
    }
}

/// Final state of a rental
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalOutcome {
    /// The trip ran to completion ("ended" in the upstream export)
    #[serde(alias = "ended")]
    Completed,
    Canceled,
}

impl RentalOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            RentalOutcome::Completed => "completed",
            RentalOutcome::Canceled => "canceled",
        }
    }
}

/// One rental event.
///
/// `previous_rental_id` is a weak reference to the rental that returned the
/// same vehicle immediately before this one; it is `None` when the vehicle
/// sat idle long enough that no predecessor was tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalRecord {
    pub id: u64,
    pub channel: Channel,
    /// Minutes late (positive) or early (negative) at checkout; `None` when
    /// the checkout was never recorded.
    pub delay_at_checkout: Option<f64>,
    pub previous_rental_id: Option<u64>,
    /// Minutes between the predecessor's scheduled checkout and this rental's
    /// scheduled checkin.
    pub time_since_previous: Option<f64>,
    pub outcome: RentalOutcome,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub rentals_path: String,
    pub pricing_model_path: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let rentals_path = std::env::var("RENTALS_PATH")
            .unwrap_or_else(|_| "./data/sample_rentals.json".to_string());

        let pricing_model_path = std::env::var("PRICING_MODEL_PATH")
            .unwrap_or_else(|_| "./data/pricing_model.json".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        Ok(Self {
            rentals_path,
            pricing_model_path,
            port,
        })
    }
}
