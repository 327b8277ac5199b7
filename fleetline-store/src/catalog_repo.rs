use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, warn};
use fleetline_catalog::ingest;
use fleetline_core::repository::VehicleRepository;
use fleetline_shared::Vehicle;

/// Reads the catalog from a JSON array of upstream vehicle records
pub struct JsonCatalogRepository {
    path: PathBuf,
}

impl JsonCatalogRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Only a file that is not a JSON array fails; bad records are skipped
    pub fn parse(raw: &str) -> Result<Vec<Vehicle>, serde_json::Error> {
        let records: Vec<serde_json::Value> = serde_json::from_str(raw)?;
        let total = records.len();
        let report = ingest(records);

        for (position, reason) in &report.rejected {
            warn!("Skipping catalog record #{}: {}", position, reason);
        }
        info!("Catalog ingested: {} of {} records", report.vehicles.len(), total);

        Ok(report.vehicles)
    }
}

#[async_trait]
impl VehicleRepository for JsonCatalogRepository {
    async fn load_catalog(
        &self,
    ) -> Result<Vec<Vehicle>, Box<dyn std::error::Error + Send + Sync>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        Ok(Self::parse(&raw)?)
    }
}

/// Catalog held in memory, already canonical
pub struct StaticCatalogRepository {
    vehicles: Vec<Vehicle>,
}

impl StaticCatalogRepository {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }
}

#[async_trait]
impl VehicleRepository for StaticCatalogRepository {
    async fn load_catalog(
        &self,
    ) -> Result<Vec<Vehicle>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.vehicles.clone())
    }
}
