pub mod app_config;
pub mod catalog_repo;
pub mod memory_store;

pub use catalog_repo::{JsonCatalogRepository, StaticCatalogRepository};
pub use memory_store::InMemoryFavoritesStore;
