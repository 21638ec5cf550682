//! Pagination types shared by both collaborator listings.

use serde::{Deserialize, Serialize};

use vodsync_models::{CatalogRecord, RemoteAsset};

/// Page parameters for list operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum items to return; collaborator default applies when absent
    pub limit: Option<u32>,
    /// Opaque continuation token from a previous page
    pub page_token: Option<String>,
}

impl PageRequest {
    pub fn first(limit: Option<u32>) -> Self {
        Self {
            limit,
            page_token: None,
        }
    }

    pub fn next(limit: Option<u32>, page_token: impl Into<String>) -> Self {
        Self {
            limit,
            page_token: Some(page_token.into()),
        }
    }
}

/// One page of remote assets.
#[derive(Debug, Clone, Default)]
pub struct AssetPage {
    pub assets: Vec<RemoteAsset>,
    /// Absent on the last page
    pub next_page_token: Option<String>,
}

/// One page of catalog records.
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub records: Vec<CatalogRecord>,
    /// Absent on the last page
    pub next_page_token: Option<String>,
}
