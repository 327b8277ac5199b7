use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use fleetline_catalog::{CatalogIndex, PricingEngine};
use fleetline_core::search::{self, Bounds, EmptyState, FilterCriteria, SortKey};
use fleetline_shared::{Vehicle, VehicleId};
use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Listing query string. Every value arrives as text so blanks and the
/// "Any" sentinel can be handled uniformly.
#[derive(Debug, Default, Deserialize)]
pub struct FleetQuery {
    pub make: Option<String>,
    pub model: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub year_min: Option<String>,
    pub year_max: Option<String>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub seats: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetResponse {
    pub vehicles: Vec<Vehicle>,
    pub total: usize,
    pub filters_applied: bool,
    pub empty_state: Option<EmptyState>,
    /// Make/model as applied; a model the make cannot offer comes back null
    pub make: Option<String>,
    pub model: Option<String>,
    pub sort: SortKey,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetailResponse {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub display_name: String,
    pub currency: String,
}

// ============================================================================
// Query parsing
// ============================================================================

fn parse_opt<T: FromStr>(field: &str, value: Option<&str>) -> Result<Option<T>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| AppError::ValidationError(format!("Invalid {}: {}", field, v))),
    }
}

fn parse_with<T: FromStr>(field: &str, value: Option<&str>) -> Result<T, AppError>
where
    T: Default,
{
    Ok(parse_opt(field, value)?.unwrap_or_default())
}

/// Price bound; NaN and infinities parse as f64 but never compare sanely
fn parse_price(field: &str, value: Option<&str>) -> Result<Option<f64>, AppError> {
    match parse_opt::<f64>(field, value)? {
        Some(v) if !v.is_finite() => {
            Err(AppError::ValidationError(format!("Invalid {}: {}", field, v)))
        }
        parsed => Ok(parsed),
    }
}

fn bounds<T: PartialOrd + Copy>(
    field: &str,
    min: Option<T>,
    max: Option<T>,
    floor: T,
    ceiling: T,
) -> Result<Option<Bounds<T>>, AppError> {
    if min.is_none() && max.is_none() {
        return Ok(None);
    }
    let range = Bounds::new(min.unwrap_or(floor), max.unwrap_or(ceiling));
    if range.min > range.max {
        return Err(AppError::ValidationError(format!("{} range is inverted", field)));
    }
    Ok(Some(range))
}

impl FleetQuery {
    pub fn into_criteria(self, index: &CatalogIndex) -> Result<FilterCriteria, AppError> {
        let mut criteria = FilterCriteria::default();

        criteria.set_make(self.make.as_deref(), index);
        criteria.set_model(self.model.as_deref());
        criteria.reconcile(index);

        criteria.price_range = bounds(
            "price",
            parse_price("price_min", self.price_min.as_deref())?,
            parse_price("price_max", self.price_max.as_deref())?,
            0.0,
            f64::INFINITY,
        )?;
        criteria.year_range = bounds(
            "year",
            parse_opt::<i32>("year_min", self.year_min.as_deref())?,
            parse_opt::<i32>("year_max", self.year_max.as_deref())?,
            i32::MIN,
            i32::MAX,
        )?;

        criteria.transmission = parse_with("transmission", self.transmission.as_deref())?;
        criteria.fuel_type = parse_with("fuel_type", self.fuel_type.as_deref())?;
        criteria.seats = parse_with("seats", self.seats.as_deref())?;
        criteria.sort = parse_with("sort", self.sort.as_deref())?;

        Ok(criteria)
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/vehicles", get(list_vehicles))
        .route("/v1/vehicles/lookups", get(get_lookups))
        .route("/v1/vehicles/{id}", get(get_vehicle))
}

/// GET /v1/vehicles
/// Filtered and sorted fleet listing
async fn list_vehicles(
    State(state): State<AppState>,
    Query(query): Query<FleetQuery>,
) -> Result<Json<FleetResponse>, AppError> {
    let criteria = query.into_criteria(state.catalog.index())?;
    let result = search::search(state.catalog.vehicles(), &criteria);

    Ok(Json(FleetResponse {
        total: result.vehicles.len(),
        vehicles: result.vehicles.into_iter().cloned().collect(),
        filters_applied: result.filters_applied,
        empty_state: result.empty_state,
        make: criteria.make().map(str::to_string),
        model: criteria.model().map(str::to_string),
        sort: criteria.sort,
    }))
}

/// GET /v1/vehicles/lookups
/// Make dropdown and make -> models table
async fn get_lookups(State(state): State<AppState>) -> Json<CatalogIndex> {
    Json(state.catalog.index().clone())
}

/// GET /v1/vehicles/{id}
async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<VehicleId>,
) -> Result<Json<VehicleDetailResponse>, AppError> {
    let vehicle = find_vehicle(&state, id)?;
    Ok(Json(detail(vehicle, &state.pricing)))
}

pub(crate) fn find_vehicle(state: &AppState, id: VehicleId) -> Result<&Vehicle, AppError> {
    state
        .catalog
        .get(id)
        .ok_or_else(|| AppError::NotFoundError(format!("Vehicle {} not found", id)))
}

fn detail(vehicle: &Vehicle, pricing: &PricingEngine) -> VehicleDetailResponse {
    VehicleDetailResponse {
        display_name: vehicle.display_name(),
        vehicle: vehicle.clone(),
        currency: pricing.currency().to_string(),
    }
}
