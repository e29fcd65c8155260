// # Memory Notification Store
//
// In-memory implementation of NotificationStore.
//
// Nothing survives a restart: every property starts as "never alerted".
// Useful for tests and for one-shot runs where duplicate suppression only
// matters within the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::PropertyId;
use crate::error::Result;
use crate::state::record::NotificationRecord;
use crate::traits::NotificationStore;

/// In-memory notification store
#[derive(Debug, Clone, Default)]
pub struct MemoryNotificationStore {
    inner: Arc<RwLock<HashMap<PropertyId, NotificationRecord>>>,
}

impl MemoryNotificationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of properties with any history
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether no property has history
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn load(&self, property: PropertyId) -> Result<NotificationRecord> {
        Ok(self
            .inner
            .read()
            .await
            .get(&property)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, property: PropertyId, record: &NotificationRecord) -> Result<()> {
        self.inner.write().await.insert(property, record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn load_unknown_property_is_empty() {
        let store = MemoryNotificationStore::new();
        let record = store.load(PropertyId::Miyakowasure).await.unwrap();
        assert!(record.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MemoryNotificationStore::new();
        let mut record = NotificationRecord::new();
        record.record_notified("00001:2026-03-15:2026-03-16", Utc::now());

        store.save(PropertyId::Miyamaso, &record).await.unwrap();

        let loaded = store.load(PropertyId::Miyamaso).await.unwrap();
        assert_eq!(loaded, record);
        assert!(store.load(PropertyId::Miyakowasure).await.unwrap().is_empty());
    }
}
