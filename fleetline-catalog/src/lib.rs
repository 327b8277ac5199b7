pub mod ingest;
pub mod index;
pub mod pricing;

pub use ingest::{ingest, CatalogError, IngestReport, RawVehicle};
pub use index::{contains_folded, eq_folded, Catalog, CatalogIndex};
pub use pricing::{
    DiscountTier, PricingConfig, PricingConfigError, PricingEngine, RentalPeriod, RentalQuote,
};
