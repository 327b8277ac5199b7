use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;
use fleetline_shared::VehicleId;
use crate::{CoreError, CoreResult};

/// Key-value store holding favorite vehicle ids per scope (a session or
/// user). Injected so the toggle logic does not depend on the medium.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn get(&self, key: &str) -> CoreResult<Vec<VehicleId>>;

    async fn set(&self, key: &str, ids: Vec<VehicleId>) -> CoreResult<()>;
}

/// Adds `id` when absent, removes it when present. Order is preserved.
pub fn toggle_membership(current: &[VehicleId], id: VehicleId) -> Vec<VehicleId> {
    if current.contains(&id) {
        current.iter().copied().filter(|v| *v != id).collect()
    } else {
        let mut next = current.to_vec();
        next.push(id);
        next
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub vehicle_id: VehicleId,
    pub is_favorite: bool,
    pub favorites: Vec<VehicleId>,
}

/// Favorites service. Toggles on the same key run one at a time so the
/// read-modify-write against the store never loses an update.
#[derive(Clone)]
pub struct Favorites {
    store: Arc<dyn FavoritesStore>,
    key_locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl Favorites {
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        Self {
            store,
            key_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn key(scope: &str) -> String {
        format!("favorites:{}", scope)
    }

    fn lock_for(&self, key: &str) -> CoreResult<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self
            .key_locks
            .lock()
            .map_err(|e| CoreError::StoreError(e.to_string()))?;
        Ok(locks.entry(key.to_string()).or_default().clone())
    }

    pub async fn list(&self, scope: &str) -> CoreResult<Vec<VehicleId>> {
        self.store.get(&Self::key(scope)).await
    }

    pub async fn is_favorite(&self, scope: &str, id: VehicleId) -> CoreResult<bool> {
        Ok(self.list(scope).await?.contains(&id))
    }

    pub async fn toggle(&self, scope: &str, id: VehicleId) -> CoreResult<FavoriteToggle> {
        let key = Self::key(scope);
        let lock = self.lock_for(&key)?;
        let _guard = lock.lock().await;

        let current = self.store.get(&key).await?;
        let next = toggle_membership(&current, id);
        let is_favorite = next.contains(&id);

        self.store.set(&key, next.clone()).await?;
        info!("Favorite toggled: {} -> {} ({})", key, id, is_favorite);

        Ok(FavoriteToggle {
            vehicle_id: id,
            is_favorite,
            favorites: next,
        })
    }
}
