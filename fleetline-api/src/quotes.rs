use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use fleetline_catalog::{RentalPeriod, RentalQuote};
use fleetline_shared::VehicleId;
use crate::{error::AppError, state::AppState, vehicles::find_vehicle};

/// Date/time pickers as sent by the car-detail form. Blank means unset.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteRequest {
    pub pickup_date: Option<String>,
    pub pickup_time: Option<String>,
    pub return_date: Option<String>,
    pub return_time: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub vehicle_id: VehicleId,
    pub currency: String,
    pub base_price_per_day: f64,
    /// All four fields are filled in
    pub booking_complete: bool,
    /// Null until the period is complete and return is after pickup
    pub quote: Option<RentalQuote>,
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    blank_to_none(value)
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .map_err(|_| AppError::ValidationError(format!("Invalid {}: {}", field, v)))
        })
        .transpose()
}

fn parse_time(field: &str, value: Option<&str>) -> Result<Option<NaiveTime>, AppError> {
    blank_to_none(value)
        .map(|v| {
            NaiveTime::parse_from_str(v, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(v, "%H:%M:%S"))
                .map_err(|_| AppError::ValidationError(format!("Invalid {}: {}", field, v)))
        })
        .transpose()
}

impl QuoteRequest {
    pub fn into_period(self) -> Result<RentalPeriod, AppError> {
        Ok(RentalPeriod {
            pickup_date: parse_date("pickupDate", self.pickup_date.as_deref())?,
            pickup_time: parse_time("pickupTime", self.pickup_time.as_deref())?,
            return_date: parse_date("returnDate", self.return_date.as_deref())?,
            return_time: parse_time("returnTime", self.return_time.as_deref())?,
        })
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/vehicles/{id}/quote", post(quote_rental))
}

/// POST /v1/vehicles/{id}/quote
/// Duration and price for the selected period
async fn quote_rental(
    State(state): State<AppState>,
    Path(id): Path<VehicleId>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let vehicle = find_vehicle(&state, id)?;
    let period = req.into_period()?;
    let quote = state.pricing.quote(&period, vehicle.price_per_day);

    if let Some(q) = &quote {
        tracing::debug!(
            "Quote for vehicle {}: {}d {}h at {:.2}/day = {}",
            id, q.days, q.hours, q.effective_price_per_day, q.total_price
        );
    }

    Ok(Json(QuoteResponse {
        vehicle_id: id,
        currency: state.pricing.currency().to_string(),
        base_price_per_day: vehicle.price_per_day,
        booking_complete: period.is_complete(),
        quote,
    }))
}
