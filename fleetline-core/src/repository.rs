use async_trait::async_trait;
use fleetline_shared::Vehicle;

/// Source of the vehicle catalog. Loaded once and held for the session.
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn load_catalog(
        &self,
    ) -> Result<Vec<Vehicle>, Box<dyn std::error::Error + Send + Sync>>;
}
