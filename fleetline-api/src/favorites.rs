use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use fleetline_core::favorites::FavoriteToggle;
use fleetline_shared::{Vehicle, VehicleId};
use crate::{error::AppError, state::AppState, vehicles::find_vehicle};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    pub scope: String,
    pub favorites: Vec<VehicleId>,
    /// Favorites still present in the catalog, in favorite order
    pub vehicles: Vec<Vehicle>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/favorites/{scope}", get(list_favorites))
        .route("/v1/favorites/{scope}/{vehicle_id}/toggle", post(toggle_favorite))
}

/// GET /v1/favorites/{scope}
async fn list_favorites(
    State(state): State<AppState>,
    Path(scope): Path<String>,
) -> Result<Json<FavoritesResponse>, AppError> {
    let favorites = state
        .favorites
        .list(&scope)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let vehicles = favorites
        .iter()
        .filter_map(|id| state.catalog.get(*id).cloned())
        .collect();

    Ok(Json(FavoritesResponse {
        scope,
        favorites,
        vehicles,
    }))
}

/// POST /v1/favorites/{scope}/{vehicle_id}/toggle
async fn toggle_favorite(
    State(state): State<AppState>,
    Path((scope, vehicle_id)): Path<(String, VehicleId)>,
) -> Result<Json<FavoriteToggle>, AppError> {
    find_vehicle(&state, vehicle_id)?;

    let toggled = state
        .favorites
        .toggle(&scope, vehicle_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(toggled))
}
