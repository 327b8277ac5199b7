use serde::Deserialize;
use std::collections::HashSet;
use fleetline_shared::{FuelType, Transmission, Vehicle, VehicleId};

pub const MIN_MODEL_YEAR: i32 = 1950;
pub const MAX_MODEL_YEAR: i32 = 2050;

/// Identifier as it arrives from upstream: number or numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn resolve(&self) -> Result<VehicleId, CatalogError> {
        match self {
            RawId::Number(n) => Ok(*n),
            RawId::Text(s) => s
                .trim()
                .parse::<VehicleId>()
                .map_err(|_| CatalogError::InvalidId(s.clone())),
        }
    }
}

/// Tolerant upstream record. Older data carries a combined `name`, newer
/// data separate `make`/`model`; several field spellings are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVehicle {
    #[serde(alias = "car_id", alias = "carId")]
    pub id: Option<RawId>,
    pub name: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    #[serde(alias = "price_per_day", alias = "price")]
    pub price_per_day: Option<f64>,
    pub transmission: Option<String>,
    #[serde(alias = "fuel_type", alias = "fuel")]
    pub fuel_type: Option<String>,
    pub seats: Option<u32>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(alias = "photo_gallery", alias = "photos", default)]
    pub photo_gallery: Vec<String>,
    pub availability: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "available_from")]
    pub available_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("Invalid vehicle id: {0}")]
    InvalidId(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid price per day: {0}")]
    InvalidPrice(f64),

    #[error("Model year {0} out of range")]
    YearOutOfRange(i32),

    #[error("Make is empty")]
    EmptyMake,

    #[error("Invalid seat count: {0}")]
    InvalidSeats(u32),

    #[error("Rating {0} outside 0-5")]
    InvalidRating(f64),

    #[error("Unknown transmission: {0}")]
    UnknownTransmission(String),

    #[error("Unknown fuel type: {0}")]
    UnknownFuelType(String),

    #[error("Duplicate vehicle id: {0}")]
    DuplicateId(VehicleId),
}

/// Splits a combined name: the first token is the make (hyphens allowed),
/// the rest is the model.
pub fn split_name(name: &str) -> (String, String) {
    let mut tokens = name.split_whitespace();
    let make = tokens.next().unwrap_or_default().to_string();
    let model = tokens.collect::<Vec<_>>().join(" ");
    (make, model)
}

impl RawVehicle {
    pub fn normalize(&self) -> Result<Vehicle, CatalogError> {
        let id = self
            .id
            .as_ref()
            .ok_or(CatalogError::MissingField("id"))?
            .resolve()?;

        let (make, model) = match (&self.make, &self.model, &self.name) {
            (Some(make), model, _) if !make.trim().is_empty() => (
                make.trim().to_string(),
                model.as_deref().unwrap_or_default().trim().to_string(),
            ),
            (_, _, Some(name)) => split_name(name),
            _ => return Err(CatalogError::EmptyMake),
        };
        if make.is_empty() {
            return Err(CatalogError::EmptyMake);
        }

        let year = self.year.ok_or(CatalogError::MissingField("year"))?;
        if !(MIN_MODEL_YEAR..=MAX_MODEL_YEAR).contains(&year) {
            return Err(CatalogError::YearOutOfRange(year));
        }

        let price_per_day = self
            .price_per_day
            .ok_or(CatalogError::MissingField("pricePerDay"))?;
        if !price_per_day.is_finite() || price_per_day <= 0.0 {
            return Err(CatalogError::InvalidPrice(price_per_day));
        }

        let transmission = self
            .transmission
            .as_deref()
            .ok_or(CatalogError::MissingField("transmission"))?
            .parse::<Transmission>()
            .map_err(CatalogError::UnknownTransmission)?;

        let fuel_type = self
            .fuel_type
            .as_deref()
            .ok_or(CatalogError::MissingField("fuelType"))?
            .parse::<FuelType>()
            .map_err(CatalogError::UnknownFuelType)?;

        let seats = self.seats.ok_or(CatalogError::MissingField("seats"))?;
        if seats == 0 {
            return Err(CatalogError::InvalidSeats(seats));
        }

        let rating = self.rating.unwrap_or(0.0);
        if !(0.0..=5.0).contains(&rating) {
            return Err(CatalogError::InvalidRating(rating));
        }

        let availability = self
            .availability
            .clone()
            .or_else(|| self.status.clone())
            .or_else(|| self.available_from.clone());

        Ok(Vehicle {
            id,
            make,
            model,
            year,
            price_per_day,
            transmission,
            fuel_type,
            seats,
            rating,
            category: self
                .category
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_lowercase(),
            photo_gallery: self.photo_gallery.clone(),
            availability,
        })
    }
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub vehicles: Vec<Vehicle>,
    /// (position in the upstream list, reason)
    pub rejected: Vec<(usize, CatalogError)>,
}

fn read_record(record: serde_json::Value) -> Result<Vehicle, CatalogError> {
    let raw: RawVehicle =
        serde_json::from_value(record).map_err(|e| CatalogError::Malformed(e.to_string()))?;
    raw.normalize()
}

/// Normalizes a batch of upstream records, keeping upstream order.
/// A record that does not even decode is rejected on its own. The first
/// occurrence of an id wins.
pub fn ingest(records: Vec<serde_json::Value>) -> IngestReport {
    let mut report = IngestReport::default();
    let mut seen = HashSet::new();

    for (position, record) in records.into_iter().enumerate() {
        match read_record(record) {
            Ok(vehicle) => {
                if seen.insert(vehicle.id) {
                    report.vehicles.push(vehicle);
                } else {
                    report
                        .rejected
                        .push((position, CatalogError::DuplicateId(vehicle.id)));
                }
            }
            Err(e) => report.rejected.push((position, e)),
        }
    }

    report
}
