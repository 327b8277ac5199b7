use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type VehicleId = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Transmission {
    Automatic,
    Manual,
}

impl FromStr for Transmission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "automatic" => Ok(Transmission::Automatic),
            "manual" => Ok(Transmission::Manual),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transmission::Automatic => write!(f, "Automatic"),
            Transmission::Manual => write!(f, "Manual"),
        }
    }
}

/// Fuel type after synonym normalization. `Petrol` is stored as `Gasoline`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Hybrid,
    Electric,
}

impl FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gasoline" | "petrol" => Ok(FuelType::Gasoline),
            "diesel" => Ok(FuelType::Diesel),
            "hybrid" => Ok(FuelType::Hybrid),
            "electric" => Ok(FuelType::Electric),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FuelType::Gasoline => "gasoline",
            FuelType::Diesel => "diesel",
            FuelType::Hybrid => "hybrid",
            FuelType::Electric => "electric",
        };
        f.write_str(name)
    }
}

/// Canonical catalog entry. Every upstream shape is normalized into this
/// before filtering or pricing sees it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price_per_day: f64,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub seats: u32,
    pub rating: f64,
    pub category: String,
    #[serde(default)]
    pub photo_gallery: Vec<String>,
    pub availability: Option<String>,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        if self.model.is_empty() {
            self.make.clone()
        } else {
            format!("{} {}", self.make, self.model)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_synonyms() {
        assert_eq!("Petrol".parse::<FuelType>().unwrap(), FuelType::Gasoline);
        assert_eq!("Gasoline".parse::<FuelType>().unwrap(), FuelType::Gasoline);
        assert_eq!("ELECTRIC".parse::<FuelType>().unwrap(), FuelType::Electric);
        assert!("steam".parse::<FuelType>().is_err());
    }

    #[test]
    fn test_vehicle_serialization() {
        let vehicle = Vehicle {
            id: 7,
            make: "Mercedes-Benz".to_string(),
            model: "GLE 450".to_string(),
            year: 2023,
            price_per_day: 180.0,
            transmission: Transmission::Automatic,
            fuel_type: FuelType::Hybrid,
            seats: 5,
            rating: 4.8,
            category: "suv".to_string(),
            photo_gallery: vec![],
            availability: None,
        };

        let json = serde_json::to_value(&vehicle).expect("Failed to serialize");
        assert_eq!(json["pricePerDay"], 180.0);
        assert_eq!(json["fuelType"], "hybrid");
        assert_eq!(json["transmission"], "Automatic");
        assert_eq!(vehicle.display_name(), "Mercedes-Benz GLE 450");
    }
}
