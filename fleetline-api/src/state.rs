use std::sync::Arc;
use fleetline_catalog::{Catalog, PricingConfig, PricingEngine};
use fleetline_core::favorites::{Favorites, FavoritesStore};
use fleetline_core::repository::VehicleRepository;

#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup; lookup tables are derived with it
    pub catalog: Arc<Catalog>,
    pub pricing: Arc<PricingEngine>,
    pub favorites: Favorites,
}

impl AppState {
    pub async fn load(
        repo: &dyn VehicleRepository,
        pricing: PricingConfig,
        favorites_store: Arc<dyn FavoritesStore>,
    ) -> anyhow::Result<Self> {
        pricing.validate()?;

        let vehicles = repo
            .load_catalog()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load catalog: {}", e))?;

        let catalog = Catalog::new(vehicles);
        tracing::info!(
            "Catalog ready: {} vehicles, {} makes",
            catalog.len(),
            catalog.index().unique_makes.len()
        );

        Ok(Self {
            catalog: Arc::new(catalog),
            pricing: Arc::new(PricingEngine::new(pricing)),
            favorites: Favorites::new(favorites_store),
        })
    }
}
