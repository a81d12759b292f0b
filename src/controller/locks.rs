use ahash::AHashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Single-writer locks keyed by entity id (a booking id). Holding the guard
/// serializes load-validate-save sequences on that entity.
#[derive(Clone, Default)]
pub struct EntityLocks {
    inner: Arc<Mutex<AHashMap<i64, Arc<Mutex<()>>>>>,
}

impl EntityLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: i64) -> OwnedMutexGuard<()> {
        let entry = {
            let mut map = self.inner.lock().await;
            // drop locks nobody is holding or waiting on
            map.retain(|_, m| Arc::strong_count(m) > 1);
            Arc::clone(map.entry(key).or_default())
        };
        entry.lock_owned().await
    }
}
