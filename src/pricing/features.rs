//! Vehicle feature schema.
//!
//! Field domains mirror the fitted training data exactly; serde rejects any
//! categorical value outside them while the request is still being decoded.

use serde::{Deserialize, Serialize};

/// Vehicle makes the pricing model was fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarMake {
    #[serde(rename = "Citroën")]
    Citroen,
    Peugeot,
    #[serde(rename = "PGO")]
    Pgo,
    Renault,
    Audi,
    #[serde(rename = "BMW")]
    Bmw,
    Ford,
    Mercedes,
    Opel,
    Porsche,
    Volkswagen,
    #[serde(rename = "KIA Motors")]
    KiaMotors,
    #[serde(rename = "Alfa Romeo")]
    AlfaRomeo,
    Ferrari,
    Fiat,
    Lamborghini,
    Maserati,
    Lexus,
    Honda,
    Mazda,
    Mini,
    Mitsubishi,
    Nissan,
    #[serde(rename = "SEAT")]
    Seat,
    Subaru,
    Suzuki,
    Toyota,
    Yamaha,
}

impl CarMake {
    pub fn as_str(&self) -> &str {
        match self {
            CarMake::Citroen => "Citroën",
            CarMake::Peugeot => "Peugeot",
            CarMake::Pgo => "PGO",
            CarMake::Renault => "Renault",
            CarMake::Audi => "Audi",
            CarMake::Bmw => "BMW",
            CarMake::Ford => "Ford",
            CarMake::Mercedes => "Mercedes",
            CarMake::Opel => "Opel",
            CarMake::Porsche => "Porsche",
            CarMake::Volkswagen => "Volkswagen",
            CarMake::KiaMotors => "KIA Motors",
            CarMake::AlfaRomeo => "Alfa Romeo",
            CarMake::Ferrari => "Ferrari",
            CarMake::Fiat => "Fiat",
            CarMake::Lamborghini => "Lamborghini",
            CarMake::Maserati => "Maserati",
            CarMake::Lexus => "Lexus",
            CarMake::Honda => "Honda",
            CarMake::Mazda => "Mazda",
            CarMake::Mini => "Mini",
            CarMake::Mitsubishi => "Mitsubishi",
            CarMake::Nissan => "Nissan",
            CarMake::Seat => "SEAT",
            CarMake::Subaru => "Subaru",
            CarMake::Suzuki => "Suzuki",
            CarMake::Toyota => "Toyota",
            CarMake::Yamaha => "Yamaha",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Diesel,
    Petrol,
    HybridPetrol,
    Electro,
}

impl FuelType {
    pub fn as_str(&self) -> &str {
        match self {
            FuelType::Diesel => "diesel",
            FuelType::Petrol => "petrol",
            FuelType::HybridPetrol => "hybrid_petrol",
            FuelType::Electro => "electro",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintColor {
    Black,
    Grey,
    White,
    Red,
    Silver,
    Blue,
    Orange,
    Beige,
    Brown,
    Green,
}

impl PaintColor {
    pub fn as_str(&self) -> &str {
        match self {
            PaintColor::Black => "black",
            PaintColor::Grey => "grey",
            PaintColor::White => "white",
            PaintColor::Red => "red",
            PaintColor::Silver => "silver",
            PaintColor::Blue => "blue",
            PaintColor::Orange => "orange",
            PaintColor::Beige => "beige",
            PaintColor::Brown => "brown",
            PaintColor::Green => "green",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarType {
    Convertible,
    Coupe,
    Estate,
    Hatchback,
    Sedan,
    Subcompact,
    Suv,
    Van,
}

impl CarType {
    pub fn as_str(&self) -> &str {
        match self {
            CarType::Convertible => "convertible",
            CarType::Coupe => "coupe",
            CarType::Estate => "estate",
            CarType::Hatchback => "hatchback",
            CarType::Sedan => "sedan",
            CarType::Subcompact => "subcompact",
            CarType::Suv => "suv",
            CarType::Van => "van",
        }
    }
}

/// One vehicle to price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarFeatures {
    pub model_key: CarMake,
    pub mileage: f64,
    pub engine_power: f64,
    pub fuel: FuelType,
    pub paint_color: PaintColor,
    pub car_type: CarType,
    pub private_parking_available: bool,
    pub has_gps: bool,
    pub has_air_conditioning: bool,
    pub automatic_car: bool,
    pub has_getaround_connect: bool,
    pub has_speed_regulator: bool,
    pub winter_tires: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "model_key": "Citroën",
            "mileage": 140000,
            "engine_power": 100,
            "fuel": "diesel",
            "paint_color": "black",
            "car_type": "sedan",
            "private_parking_available": true,
            "has_gps": true,
            "has_air_conditioning": false,
            "automatic_car": false,
            "has_getaround_connect": true,
            "has_speed_regulator": false,
            "winter_tires": true
        }"#
    }

    #[test]
    fn test_deserialize_valid_car() {
        let car: CarFeatures = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(car.model_key, CarMake::Citroen);
        assert_eq!(car.fuel, FuelType::Diesel);
        assert_eq!(car.mileage, 140000.0);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let json = sample_json().replace("diesel", "kerosene");
        assert!(serde_json::from_str::<CarFeatures>(&json).is_err());

        let json = sample_json().replace("Citroën", "Tesla");
        assert!(serde_json::from_str::<CarFeatures>(&json).is_err());
    }

    #[test]
    fn test_brand_spellings_round_trip() {
        for (make, spelling) in [
            (CarMake::KiaMotors, "\"KIA Motors\""),
            (CarMake::AlfaRomeo, "\"Alfa Romeo\""),
            (CarMake::Pgo, "\"PGO\""),
            (CarMake::Seat, "\"SEAT\""),
        ] {
            assert_eq!(serde_json::to_string(&make).unwrap(), spelling);
            let parsed: CarMake = serde_json::from_str(spelling).unwrap();
            assert_eq!(parsed, make);
        }
    }
}
