//! Whole-store JSON bundle (backup / restore).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::interchange::{decode_items, InterchangeError};
use crate::models::{
    lenient, ApplicationProfile, CareerEntry, HistoryEntry, Profile, QualificationEntry,
};
use crate::records::{repo, Record, RecordStore, StoreError};

pub const BUNDLE_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub profile: Option<Profile>,
    pub education: Vec<HistoryEntry>,
    pub career: Vec<CareerEntry>,
    pub qualifications: Vec<QualificationEntry>,
    pub applications: Vec<ApplicationProfile>,
}

/// A bundle as read from disk. Collections that are absent (or `null`) are
/// left untouched on import; items are decoded one by one.
#[derive(Debug, Default, Deserialize)]
pub struct ImportBundle {
    #[serde(default, deserialize_with = "lenient::int")]
    pub version: u32,
    #[serde(default)]
    pub profile: Option<Value>,
    #[serde(default)]
    pub education: Option<Vec<Value>>,
    #[serde(default)]
    pub career: Option<Vec<Value>>,
    #[serde(default)]
    pub qualifications: Option<Vec<Value>>,
    #[serde(default)]
    pub applications: Option<Vec<Value>>,
}

/// Which collections an import replaced, and with how many records.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub profile: bool,
    pub education: Option<usize>,
    pub career: Option<usize>,
    pub qualifications: Option<usize>,
    pub applications: Option<usize>,
}

pub async fn export_bundle(
    store: &dyn RecordStore,
    now: DateTime<Utc>,
) -> Result<ExportBundle, StoreError> {
    Ok(ExportBundle {
        version: BUNDLE_VERSION,
        exported_at: now,
        profile: repo::load_profile(store).await?,
        education: repo::load_all(store).await?,
        career: repo::load_all(store).await?,
        qualifications: repo::load_all(store).await?,
        applications: repo::load_all(store).await?,
    })
}

/// Restores a bundle. A missing version is read as version 1.
pub async fn import_bundle(
    store: &dyn RecordStore,
    bundle: ImportBundle,
) -> Result<ImportSummary, InterchangeError> {
    if bundle.version > BUNDLE_VERSION {
        return Err(InterchangeError::UnsupportedVersion(bundle.version));
    }

    let mut summary = ImportSummary::default();

    if let Some(profile) = bundle.profile {
        let profile: Profile = serde_json::from_value(profile)?;
        repo::save_profile(store, &profile).await?;
        summary.profile = true;
    }
    summary.education = replace::<HistoryEntry>(store, bundle.education).await?;
    summary.career = replace::<CareerEntry>(store, bundle.career).await?;
    summary.qualifications = replace::<QualificationEntry>(store, bundle.qualifications).await?;
    summary.applications = replace::<ApplicationProfile>(store, bundle.applications).await?;

    info!("Imported bundle: {summary:?}");
    Ok(summary)
}

async fn replace<T: Record>(
    store: &dyn RecordStore,
    items: Option<Vec<Value>>,
) -> Result<Option<usize>, StoreError> {
    let Some(items) = items else {
        return Ok(None);
    };
    let records = repo::replace_all(store, decode_items::<T>(items)).await?;
    Ok(Some(records.len()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::models::HistoryKind;
    use crate::records::MemoryStore;

    fn bundle(value: Value) -> ImportBundle {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_export_then_import_restores_store() {
        let source = MemoryStore::new();
        repo::save_profile(
            &source,
            &Profile {
                name: "山田 太郎".to_string(),
                ..Profile::default()
            },
        )
        .await
        .unwrap();
        repo::save(
            &source,
            HistoryEntry {
                id: 0,
                year: 2015,
                month: 4,
                content: "○○大学 入学".to_string(),
                kind: HistoryKind::Education,
                order: 0,
            },
        )
        .await
        .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let exported = export_bundle(&source, now).await.unwrap();
        let text = serde_json::to_string(&exported).unwrap();
        assert!(text.contains("\"exportedAt\""));

        let target = MemoryStore::new();
        let summary = import_bundle(&target, serde_json::from_str(&text).unwrap())
            .await
            .unwrap();
        assert!(summary.profile);
        assert_eq!(summary.education, Some(1));
        assert_eq!(summary.career, Some(0));

        let history: Vec<HistoryEntry> = repo::load_all(&target).await.unwrap();
        assert_eq!(history[0].content, "○○大学 入学");
        assert_eq!(
            repo::load_profile(&target).await.unwrap().unwrap().name,
            "山田 太郎"
        );
    }

    #[tokio::test]
    async fn test_import_replaces_only_present_collections() {
        let store = MemoryStore::new();
        repo::save(
            &store,
            QualificationEntry {
                id: 0,
                year: 2019,
                month: 6,
                content: "普通自動車第一種運転免許".to_string(),
                order: 0,
            },
        )
        .await
        .unwrap();

        let summary = import_bundle(
            &store,
            bundle(json!({
                "version": 1,
                "career": [{"id": 4, "companyName": "株式会社A"}],
                "education": null
            })),
        )
        .await
        .unwrap();

        assert_eq!(summary.career, Some(1));
        assert_eq!(summary.qualifications, None);
        assert!(!summary.profile);
        let quals: Vec<QualificationEntry> = repo::load_all(&store).await.unwrap();
        assert_eq!(quals.len(), 1);
        let career: Vec<CareerEntry> = repo::load_all(&store).await.unwrap();
        assert_eq!(career[0].id, 4);
    }

    #[tokio::test]
    async fn test_newer_version_is_rejected_before_writing() {
        let store = MemoryStore::new();
        let err = import_bundle(
            &store,
            bundle(json!({"version": 2, "career": [{"companyName": "X"}]})),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, InterchangeError::UnsupportedVersion(2)));
        let career: Vec<CareerEntry> = repo::load_all(&store).await.unwrap();
        assert!(career.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_items_are_skipped() {
        let store = MemoryStore::new();
        let summary = import_bundle(
            &store,
            bundle(json!({
                "education": [
                    {"id": 1, "type": "学歴", "content": "入学"},
                    {"id": 2, "content": "no type"}
                ]
            })),
        )
        .await
        .unwrap();
        assert_eq!(summary.education, Some(1));
    }
}
