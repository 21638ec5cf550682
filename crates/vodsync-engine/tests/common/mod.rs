//! In-memory collaborator fakes shared by the engine integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};

use vodsync_models::{AssetId, CatalogRecord, ProcessingState, RecordId, RemoteAsset};
use vodsync_stores::{
    AssetPage, CatalogPatch, CatalogStore, PageRequest, RecordPage, RemoteAssetSource,
    SourceError, SourceResult, StoreError, StoreResult,
};

/// One scripted response for `get` on a specific asset id.
#[derive(Debug, Clone)]
pub enum GetResponse {
    Asset(RemoteAsset),
    NotVisible,
    NotFound,
    Transport,
}

/// Scripted remote asset source.
///
/// `get` consumes a per-id response queue, repeating the last entry once
/// the queue is down to one (so "never leaves InProgress" scripts work);
/// ids without a script fall back to the listing population.
#[derive(Default)]
pub struct FakeSource {
    assets: Mutex<Vec<RemoteAsset>>,
    scripts: Mutex<HashMap<String, VecDeque<GetResponse>>>,
    pub deletes: Mutex<Vec<AssetId>>,
    delete_failures: Mutex<HashSet<String>>,
    pub get_calls: Mutex<u32>,
    page_size: Mutex<Option<usize>>,
    fail_on_page: Mutex<Option<u32>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_asset(&self, asset: RemoteAsset) {
        self.assets.lock().unwrap().push(asset);
    }

    pub fn script(&self, id: &str, responses: Vec<GetResponse>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(id.to_string(), responses.into());
    }

    pub fn set_page_size(&self, size: usize) {
        *self.page_size.lock().unwrap() = Some(size);
    }

    /// Make the listing fail when it reaches the given 1-based page.
    pub fn fail_on_page(&self, page: u32) {
        *self.fail_on_page.lock().unwrap() = Some(page);
    }

    pub fn fail_delete_for(&self, id: &str) {
        self.delete_failures.lock().unwrap().insert(id.to_string());
    }

    pub fn deleted_ids(&self) -> Vec<AssetId> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteAssetSource for FakeSource {
    async fn list(&self, page: PageRequest) -> SourceResult<AssetPage> {
        let assets = self.assets.lock().unwrap().clone();
        let page_size = self.page_size.lock().unwrap().unwrap_or(usize::MAX);
        let start: usize = page
            .page_token
            .as_deref()
            .map(|t| t.parse().unwrap_or(0))
            .unwrap_or(0);
        let page_no = if page_size == usize::MAX {
            1
        } else {
            (start / page_size) as u32 + 1
        };

        if Some(page_no) == *self.fail_on_page.lock().unwrap() {
            return Err(SourceError::transport("listing blew up"));
        }

        let end = start.saturating_add(page_size).min(assets.len());
        let next_page_token = if end < assets.len() {
            Some(end.to_string())
        } else {
            None
        };

        Ok(AssetPage {
            assets: assets[start.min(assets.len())..end].to_vec(),
            next_page_token,
        })
    }

    async fn get(&self, id: &AssetId) -> SourceResult<RemoteAsset> {
        *self.get_calls.lock().unwrap() += 1;

        let mut scripts = self.scripts.lock().unwrap();
        if let Some(queue) = scripts.get_mut(id.as_str()) {
            let response = if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                queue.front().cloned().unwrap()
            };
            return match response {
                GetResponse::Asset(asset) => Ok(asset),
                GetResponse::NotVisible => Err(SourceError::not_visible_yet(id.as_str())),
                GetResponse::NotFound => Err(SourceError::not_found(id.as_str())),
                GetResponse::Transport => Err(SourceError::transport("connection reset")),
            };
        }
        drop(scripts);

        self.assets
            .lock()
            .unwrap()
            .iter()
            .find(|a| &a.id == id)
            .cloned()
            .ok_or_else(|| SourceError::not_found(id.as_str()))
    }

    async fn delete(&self, id: &AssetId) -> SourceResult<()> {
        if self.delete_failures.lock().unwrap().contains(id.as_str()) {
            return Err(SourceError::transport("delete rejected"));
        }
        self.deletes.lock().unwrap().push(id.clone());
        self.assets.lock().unwrap().retain(|a| &a.id != id);
        Ok(())
    }
}

/// In-memory catalog enforcing the external-id uniqueness constraint.
#[derive(Default)]
pub struct MemoryCatalog {
    records: Mutex<HashMap<String, CatalogRecord>>,
    /// External ids hidden from `find_by_external_id` to simulate a
    /// concurrent writer racing the existence check.
    hidden_from_find: Mutex<HashSet<String>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, record: CatalogRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.as_str().to_string(), record);
    }

    pub fn hide_from_find(&self, external_id: &str) {
        self.hidden_from_find
            .lock()
            .unwrap()
            .insert(external_id.to_string());
    }

    pub fn all(&self) -> Vec<CatalogRecord> {
        let mut records: Vec<CatalogRecord> =
            self.records.lock().unwrap().values().cloned().collect();
        records.sort_by(|a, b| a.external_asset_id.cmp(&b.external_asset_id));
        records
    }

    pub fn by_external_id(&self, id: &str) -> Option<CatalogRecord> {
        self.records
            .lock()
            .unwrap()
            .values()
            .find(|r| r.external_asset_id.as_str() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_by_external_id(&self, id: &AssetId) -> StoreResult<Option<CatalogRecord>> {
        if self.hidden_from_find.lock().unwrap().contains(id.as_str()) {
            return Ok(None);
        }
        Ok(self.by_external_id(id.as_str()))
    }

    async fn insert(&self, record: CatalogRecord) -> StoreResult<CatalogRecord> {
        let mut records = self.records.lock().unwrap();
        if records
            .values()
            .any(|r| r.external_asset_id == record.external_asset_id)
        {
            return Err(StoreError::conflict(format!(
                "external asset id {} already mapped",
                record.external_asset_id
            )));
        }
        records.insert(record.id.as_str().to_string(), record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RecordId, patch: CatalogPatch) -> StoreResult<CatalogRecord> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::not_found(id.as_str()))?;
        patch.apply(record);
        Ok(record.clone())
    }

    async fn delete(&self, id: &RecordId) -> StoreResult<()> {
        self.records
            .lock()
            .unwrap()
            .remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(id.as_str()))
    }

    async fn list_with_external_id(&self, page: PageRequest) -> StoreResult<RecordPage> {
        let records = self.all();
        let page_size = page.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        let start: usize = page
            .page_token
            .as_deref()
            .map(|t| t.parse().unwrap_or(0))
            .unwrap_or(0);
        let end = start.saturating_add(page_size).min(records.len());
        let next_page_token = if end < records.len() {
            Some(end.to_string())
        } else {
            None
        };

        Ok(RecordPage {
            records: records[start.min(records.len())..end].to_vec(),
            next_page_token,
        })
    }
}

/// Build an asset in the given state.
pub fn asset_in_state(id: &str, state: ProcessingState) -> RemoteAsset {
    let mut asset = RemoteAsset::new(id);
    asset.state = state;
    if state == ProcessingState::Ready {
        asset.ready_to_stream = true;
    }
    asset
}

/// Build a playable asset with a display name and duration.
pub fn ready_asset(id: &str, name: &str, duration: f64) -> RemoteAsset {
    let mut asset = asset_in_state(id, ProcessingState::Ready);
    asset.display_name = Some(name.to_string());
    asset.duration_seconds = Some(duration);
    asset
}

/// Build a pending upload created `minutes` ago.
pub fn pending_asset_aged(id: &str, minutes: i64) -> RemoteAsset {
    let mut asset = asset_in_state(id, ProcessingState::PendingUpload);
    asset.created_at = Utc::now() - ChronoDuration::minutes(minutes);
    asset
}
