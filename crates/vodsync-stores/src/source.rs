//! Remote asset source contract.

use async_trait::async_trait;

use vodsync_models::{AssetId, RemoteAsset};

use crate::error::SourceResult;
use crate::page::{AssetPage, PageRequest};

/// Read/delete view of the assets held by the external processing service.
///
/// The service is externally owned and append-mostly; the engines only
/// read from it, except for the explicit delete calls issued by the
/// stuck-upload sweeper and remote-side cleanup.
#[async_trait]
pub trait RemoteAssetSource: Send + Sync {
    /// List a page of assets.
    async fn list(&self, page: PageRequest) -> SourceResult<AssetPage>;

    /// Fetch one asset by id.
    ///
    /// Implementations must report `SourceError::NotVisibleYet` when the
    /// asset exists but read replicas have not caught up, and
    /// `SourceError::NotFound` only for a genuine miss.
    async fn get(&self, id: &AssetId) -> SourceResult<RemoteAsset>;

    /// Delete one asset from the service.
    async fn delete(&self, id: &AssetId) -> SourceResult<()>;
}
