use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{parse_id, PlanRecord, PlanStore};
use crate::error::StoreError;

/// In-memory implementation for tests and single-process development
pub struct MemoryPlanStore {
    records: RwLock<HashMap<Uuid, PlanRecord>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for MemoryPlanStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn save(&self, record: &PlanRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<PlanRecord>, StoreError> {
        let id = parse_id(id)?;
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures;

    #[tokio::test]
    async fn test_save_then_get() {
        let store = MemoryPlanStore::new();
        let record = fixtures::record();
        store.save(&record).await.unwrap();

        let loaded = store.get(&record.id.to_string()).await.unwrap();
        assert_eq!(loaded, Some(record));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_and_invalid_ids() {
        let store = MemoryPlanStore::new();
        assert!(store.get(&Uuid::new_v4().to_string()).await.unwrap().is_none());
        assert!(matches!(
            store.get("../etc/passwd").await,
            Err(StoreError::InvalidId(_))
        ));
    }
}
