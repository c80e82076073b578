//! Typed access to the record store.

use std::collections::HashSet;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{
    ApplicationProfile, CareerEntry, HistoryEntry, PaginationOptions, Profile, QualificationEntry,
};
use crate::records::{BuildFn, Collection, RecordStore, StoreError, SINGLETON_ID};

/// A record kept in one of the id-keyed collections.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);

    /// Sequencing key; ties keep id order.
    fn order(&self) -> i32 {
        0
    }

    /// Called before every save.
    fn before_save(&mut self) {}
}

impl Record for HistoryEntry {
    const COLLECTION: Collection = Collection::History;

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn order(&self) -> i32 {
        self.order
    }
}

impl Record for CareerEntry {
    const COLLECTION: Collection = Collection::Career;

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn order(&self) -> i32 {
        self.order
    }
}

impl Record for QualificationEntry {
    const COLLECTION: Collection = Collection::Qualifications;

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn order(&self) -> i32 {
        self.order
    }
}

impl Record for ApplicationProfile {
    const COLLECTION: Collection = Collection::Applications;

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn before_save(&mut self) {
        self.touch(Utc::now());
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Collections
// ────────────────────────────────────────────────────────────────────────────

/// All records of `T`, stable-sorted by `order`.
///
/// Documents that no longer decode are skipped with a warning so one bad row
/// cannot make a whole collection unreadable.
pub async fn load_all<T: Record>(store: &dyn RecordStore) -> Result<Vec<T>, StoreError> {
    let rows = store.list(T::COLLECTION).await?;
    Ok(decode_rows(rows))
}

fn decode_rows<T: Record>(rows: Vec<(i64, serde_json::Value)>) -> Vec<T> {
    let mut records: Vec<T> = rows
        .into_iter()
        .filter_map(|(id, data)| match decode::<T>(id, data) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping undecodable {} record {id}: {e}", T::COLLECTION);
                None
            }
        })
        .collect();
    records.sort_by_key(|r| r.order());
    records
}

pub async fn load_one<T: Record>(store: &dyn RecordStore, id: i64) -> Result<Option<T>, StoreError> {
    match store.get(T::COLLECTION, id).await? {
        Some(data) => Ok(Some(decode(id, data)?)),
        None => Ok(None),
    }
}

/// Saves `record`, assigning a fresh id when it has none (id ≤ 0).
pub async fn save<T: Record>(store: &dyn RecordStore, mut record: T) -> Result<T, StoreError> {
    if record.id() <= 0 {
        return insert(store, record, |_, _| {}).await;
    }
    record.before_save();
    store
        .put(T::COLLECTION, record.id(), serde_json::to_value(&record)?)
        .await?;
    Ok(record)
}

/// Inserts `record` under a freshly allocated id. `prepare` sees the record
/// with its new id alongside the collection's other records, and runs under
/// the same store guard as the insert.
pub async fn insert<T, F>(store: &dyn RecordStore, record: T, prepare: F) -> Result<T, StoreError>
where
    T: Record,
    F: FnOnce(&mut T, &[T]) + Send + 'static,
{
    let build: BuildFn = Box::new(move |id, rows| {
        let existing = decode_rows::<T>(rows.to_vec());
        let mut record = record;
        record.set_id(id);
        prepare(&mut record, &existing);
        record.before_save();
        Ok(serde_json::to_value(&record)?)
    });
    let (id, data) = store.insert_new(T::COLLECTION, build).await?;
    decode(id, data)
}

pub async fn delete<T: Record>(store: &dyn RecordStore, id: i64) -> Result<bool, StoreError> {
    store.delete(T::COLLECTION, id).await
}

/// Replaces the whole collection. Missing or repeated ids are reassigned
/// after the largest id in the batch.
pub async fn replace_all<T: Record>(
    store: &dyn RecordStore,
    mut records: Vec<T>,
) -> Result<Vec<T>, StoreError> {
    let mut next = records.iter().map(|r| r.id()).max().unwrap_or(0).max(0) + 1;
    let mut seen = HashSet::new();
    for record in records.iter_mut() {
        if record.id() <= 0 || !seen.insert(record.id()) {
            record.set_id(next);
            seen.insert(next);
            next += 1;
        }
    }

    let rows = records
        .iter()
        .map(|r| Ok((r.id(), serde_json::to_value(r)?)))
        .collect::<Result<Vec<_>, StoreError>>()?;
    store.replace_all(T::COLLECTION, rows).await?;
    Ok(records)
}

fn decode<T: Record>(id: i64, data: serde_json::Value) -> Result<T, StoreError> {
    let mut record: T = serde_json::from_value(data)?;
    record.set_id(id);
    Ok(record)
}

// ────────────────────────────────────────────────────────────────────────────
// Singletons
// ────────────────────────────────────────────────────────────────────────────

pub async fn load_profile(store: &dyn RecordStore) -> Result<Option<Profile>, StoreError> {
    load_singleton(store, Collection::Profile).await
}

pub async fn save_profile(store: &dyn RecordStore, profile: &Profile) -> Result<(), StoreError> {
    save_singleton(store, Collection::Profile, profile).await
}

/// Clears the profile back to empty.
pub async fn reset_profile(store: &dyn RecordStore) -> Result<(), StoreError> {
    store.delete(Collection::Profile, SINGLETON_ID).await?;
    Ok(())
}

/// Empties the four record collections and clears the profile. Saved
/// pagination settings survive.
pub async fn reset_all(store: &dyn RecordStore) -> Result<(), StoreError> {
    for collection in [
        Collection::History,
        Collection::Career,
        Collection::Qualifications,
        Collection::Applications,
    ] {
        store.replace_all(collection, Vec::new()).await?;
    }
    reset_profile(store).await?;
    info!("All records reset");
    Ok(())
}

/// Persisted pagination settings, or the defaults when none were saved.
pub async fn load_settings(store: &dyn RecordStore) -> Result<PaginationOptions, StoreError> {
    Ok(load_singleton(store, Collection::Settings)
        .await?
        .unwrap_or_default())
}

pub async fn save_settings(
    store: &dyn RecordStore,
    options: &PaginationOptions,
) -> Result<(), StoreError> {
    save_singleton(store, Collection::Settings, options).await
}

async fn load_singleton<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: Collection,
) -> Result<Option<T>, StoreError> {
    match store.get(collection, SINGLETON_ID).await? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}

async fn save_singleton<T: Serialize + Sync>(
    store: &dyn RecordStore,
    collection: Collection,
    value: &T,
) -> Result<(), StoreError> {
    store
        .put(collection, SINGLETON_ID, serde_json::to_value(value)?)
        .await
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::models::HistoryKind;
    use crate::records::MemoryStore;

    fn entry(id: i64, order: i32, content: &str) -> HistoryEntry {
        HistoryEntry {
            id,
            year: 2020,
            month: 4,
            content: content.to_string(),
            kind: HistoryKind::Education,
            order,
        }
    }

    #[tokio::test]
    async fn test_save_assigns_ids_and_load_sorts_by_order() {
        let store = MemoryStore::new();
        let a = save(&store, entry(0, 2, "a")).await.unwrap();
        let b = save(&store, entry(0, 0, "b")).await.unwrap();
        let c = save(&store, entry(0, 2, "c")).await.unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));

        let loaded: Vec<HistoryEntry> = load_all(&store).await.unwrap();
        let contents: Vec<&str> = loaded.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_insert_prepares_against_existing_records() {
        let store = MemoryStore::new();
        save(&store, entry(0, 4, "a")).await.unwrap();

        let inserted = insert(&store, entry(99, 0, "b"), |record, existing| {
            record.order = existing.iter().map(|e| e.order).max().unwrap_or(-1) + 1;
        })
        .await
        .unwrap();
        assert_eq!(inserted.id, 2);
        assert_eq!(inserted.order, 5);
        let stored: HistoryEntry = load_one(&store, 2).await.unwrap().unwrap();
        assert_eq!(stored, inserted);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_keep_every_record() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let tasks: Vec<_> = (0..40)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    save(store.as_ref(), entry(0, i, &format!("entry {i}")))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();
        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 40);
        let loaded: Vec<HistoryEntry> = load_all(store.as_ref()).await.unwrap();
        assert_eq!(loaded.len(), 40);
    }

    #[tokio::test]
    async fn test_reset_all_clears_records_but_keeps_settings() {
        let store = MemoryStore::new();
        save(&store, entry(0, 0, "a")).await.unwrap();
        save_profile(
            &store,
            &Profile {
                name: "山田 太郎".to_string(),
                ..Profile::default()
            },
        )
        .await
        .unwrap();
        let options = PaginationOptions::advanced(20, 6, 8);
        save_settings(&store, &options).await.unwrap();

        reset_all(&store).await.unwrap();
        assert!(load_all::<HistoryEntry>(&store).await.unwrap().is_empty());
        assert!(load_profile(&store).await.unwrap().is_none());
        assert_eq!(load_settings(&store).await.unwrap(), options);
    }

    #[tokio::test]
    async fn test_load_skips_undecodable_rows() {
        let store = MemoryStore::new();
        store
            .put(Collection::History, 1, json!({"content": "ok", "type": "学歴", "year": "x"}))
            .await
            .unwrap();
        store.put(Collection::History, 2, json!("garbage")).await.unwrap();

        let loaded: Vec<HistoryEntry> = load_all(&store).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 1);
        assert_eq!(loaded[0].year, 0);
    }

    #[tokio::test]
    async fn test_application_save_stamps_timestamps() {
        let store = MemoryStore::new();
        let app = ApplicationProfile::new("A社", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let saved = save(&store, app).await.unwrap();
        assert!(saved.created_at.is_some());
        assert_eq!(saved.created_at, saved.updated_at);

        let again = save(&store, saved.clone()).await.unwrap();
        assert_eq!(again.created_at, saved.created_at);
        assert!(again.updated_at >= saved.updated_at);
    }

    #[tokio::test]
    async fn test_replace_all_reassigns_missing_and_duplicate_ids() {
        let store = MemoryStore::new();
        save(&store, entry(0, 0, "old")).await.unwrap();

        let replaced = replace_all(
            &store,
            vec![entry(5, 0, "a"), entry(5, 1, "b"), entry(0, 2, "c")],
        )
        .await
        .unwrap();
        let ids: Vec<i64> = replaced.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5, 6, 7]);

        let loaded: Vec<HistoryEntry> = load_all(&store).await.unwrap();
        assert_eq!(loaded.len(), 3);
        assert!(loaded.iter().all(|e| e.content != "old"));
    }

    #[tokio::test]
    async fn test_profile_and_settings_singletons() {
        let store = MemoryStore::new();
        assert!(load_profile(&store).await.unwrap().is_none());
        assert_eq!(load_settings(&store).await.unwrap(), PaginationOptions::default());

        let profile = Profile {
            name: "山田 太郎".to_string(),
            ..Profile::default()
        };
        save_profile(&store, &profile).await.unwrap();
        assert_eq!(load_profile(&store).await.unwrap().unwrap().name, "山田 太郎");

        reset_profile(&store).await.unwrap();
        assert!(load_profile(&store).await.unwrap().is_none());

        let options = PaginationOptions::advanced(20, 6, 8);
        save_settings(&store, &options).await.unwrap();
        assert_eq!(load_settings(&store).await.unwrap(), options);
    }
}
