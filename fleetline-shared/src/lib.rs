pub mod models;

pub use models::vehicle::{FuelType, Transmission, Vehicle, VehicleId};
