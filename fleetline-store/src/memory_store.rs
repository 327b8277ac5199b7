use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use fleetline_core::favorites::FavoritesStore;
use fleetline_core::CoreResult;
use fleetline_shared::VehicleId;

/// Process-local favorites; lost on restart
#[derive(Default)]
pub struct InMemoryFavoritesStore {
    entries: RwLock<HashMap<String, Vec<VehicleId>>>,
}

impl InMemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoritesStore for InMemoryFavoritesStore {
    async fn get(&self, key: &str) -> CoreResult<Vec<VehicleId>> {
        Ok(self.entries.read().await.get(key).cloned().unwrap_or_default())
    }

    async fn set(&self, key: &str, ids: Vec<VehicleId>) -> CoreResult<()> {
        self.entries.write().await.insert(key.to_string(), ids);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_set() {
        let store = InMemoryFavoritesStore::new();
        assert!(store.get("favorites:a").await.unwrap().is_empty());

        store.set("favorites:a", vec![4, 2]).await.unwrap();
        assert_eq!(store.get("favorites:a").await.unwrap(), vec![4, 2]);
        assert!(store.get("favorites:b").await.unwrap().is_empty());
    }
}
