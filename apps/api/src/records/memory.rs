use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::records::{BuildFn, Collection, RecordStore, StoreError};

/// In-process backend: used by tests and when no database is configured.
/// Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, BTreeMap<i64, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, collection: Collection) -> Result<Vec<(i64, Value)>, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .map(|rows| rows.iter().map(|(id, v)| (*id, v.clone())).collect())
            .unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: i64) -> Result<Option<Value>, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).and_then(|rows| rows.get(&id)).cloned())
    }

    async fn put(&self, collection: Collection, id: i64, data: Value) -> Result<(), StoreError> {
        let mut guard = self.collections.write().await;
        guard.entry(collection).or_default().insert(id, data);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: i64) -> Result<bool, StoreError> {
        let mut guard = self.collections.write().await;
        Ok(guard
            .get_mut(&collection)
            .map(|rows| rows.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn insert_new(
        &self,
        collection: Collection,
        build: BuildFn,
    ) -> Result<(i64, Value), StoreError> {
        let mut guard = self.collections.write().await;
        let rows = guard.entry(collection).or_default();
        let id = rows.keys().next_back().copied().unwrap_or(0).max(0) + 1;
        let existing: Vec<(i64, Value)> = rows.iter().map(|(id, v)| (*id, v.clone())).collect();
        let data = build(id, &existing)?;
        rows.insert(id, data.clone());
        Ok((id, data))
    }

    async fn replace_all(
        &self,
        collection: Collection,
        rows: Vec<(i64, Value)>,
    ) -> Result<(), StoreError> {
        let mut guard = self.collections.write().await;
        guard.insert(collection, rows.into_iter().collect());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new();
        store
            .put(Collection::Career, 3, json!({"companyName": "A"}))
            .await
            .unwrap();
        assert_eq!(
            store.get(Collection::Career, 3).await.unwrap(),
            Some(json!({"companyName": "A"}))
        );
        assert!(store.get(Collection::History, 3).await.unwrap().is_none());
        assert!(store.delete(Collection::Career, 3).await.unwrap());
        assert!(!store.delete(Collection::Career, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_is_id_ordered_and_insert_new_follows_max() {
        let store = MemoryStore::new();
        for id in [7, 2, 5] {
            store.put(Collection::History, id, json!({})).await.unwrap();
        }
        let ids: Vec<i64> = store
            .list(Collection::History)
            .await
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![2, 5, 7]);

        let (id, data) = store
            .insert_new(
                Collection::History,
                Box::new(|id, rows| Ok(json!({"seen": rows.len(), "id": id}))),
            )
            .await
            .unwrap();
        assert_eq!(id, 8);
        assert_eq!(data, json!({"seen": 3, "id": 8}));
    }

    #[tokio::test]
    async fn test_insert_new_into_empty_collection_starts_at_one() {
        let store = MemoryStore::new();
        let (id, _) = store
            .insert_new(Collection::Career, Box::new(|_, _| Ok(json!({}))))
            .await
            .unwrap();
        assert_eq!(id, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_get_distinct_ids() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert_new(Collection::Qualifications, Box::new(|_, _| Ok(json!({}))))
                        .await
                        .unwrap()
                        .0
                })
            })
            .collect();
        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=50).collect::<Vec<i64>>());
        assert_eq!(store.list(Collection::Qualifications).await.unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_replace_all_drops_previous_rows() {
        let store = MemoryStore::new();
        store.put(Collection::Qualifications, 1, json!({})).await.unwrap();
        store
            .replace_all(Collection::Qualifications, vec![(10, json!({"content": "x"}))])
            .await
            .unwrap();
        let rows = store.list(Collection::Qualifications).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 10);
    }
}
