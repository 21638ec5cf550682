//! Catalog store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vodsync_models::{AssetId, CatalogRecord, RecordId, SyncProvenance};

use crate::error::StoreResult;
use crate::page::{PageRequest, RecordPage};

/// Partial update applied to an existing catalog record.
///
/// Absent fields are left untouched; every applied patch bumps the
/// record's `updated_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<SyncProvenance>,
}

impl CatalogPatch {
    /// Patch that unpublishes a record and stamps it as orphaned.
    pub fn orphan(reason: impl Into<String>, detected_at: DateTime<Utc>) -> Self {
        Self {
            is_published: Some(false),
            provenance: Some(SyncProvenance::OrphanedBecause {
                reason: reason.into(),
                detected_at,
            }),
            ..Self::default()
        }
    }

    /// Apply this patch to an in-memory record, bumping `updated_at`.
    ///
    /// Store implementations are expected to produce exactly this result.
    pub fn apply(self, record: &mut CatalogRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(duration) = self.duration_seconds {
            record.duration_seconds = Some(duration);
        }
        if let Some(published) = self.is_published {
            record.is_published = published;
        }
        if let Some(provenance) = self.provenance {
            record.provenance = provenance;
        }
        record.updated_at = Utc::now();
    }
}

/// CRUD view of the internal catalog.
///
/// The unique constraint on `external_asset_id` is the sole
/// concurrency-control mechanism the engines rely on; `insert` must fail
/// with `StoreError::Conflict` when another record already maps the id.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Find the record referencing a remote asset, if one exists.
    async fn find_by_external_id(&self, id: &AssetId) -> StoreResult<Option<CatalogRecord>>;

    /// Insert a new record, guarded by the `external_asset_id` uniqueness
    /// constraint.
    async fn insert(&self, record: CatalogRecord) -> StoreResult<CatalogRecord>;

    /// Apply a partial update to one record.
    async fn update(&self, id: &RecordId, patch: CatalogPatch) -> StoreResult<CatalogRecord>;

    /// Permanently delete one record.
    async fn delete(&self, id: &RecordId) -> StoreResult<()>;

    /// List a page of records that carry an external asset id.
    async fn list_with_external_id(&self, page: PageRequest) -> StoreResult<RecordPage>;
}
