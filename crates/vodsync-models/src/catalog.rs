//! Catalog record models.
//!
//! A catalog record is the internal system-of-record row for a video.
//! At most one record may ever reference a given remote asset; the store's
//! insert path enforces this, and repair treats a conflict as success.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::asset::{AssetId, ProcessingState, RemoteAsset};

/// Internal catalog row identifier, distinct from the remote asset id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generate a new random record ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provenance and health of a catalog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Created through the normal content-authoring flow
    Manual,
    /// Created by the repair engine from remote metadata
    AutoRepaired,
    /// Referenced remote asset no longer resolves
    Orphaned,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Manual => "manual",
            SyncStatus::AutoRepaired => "auto_repaired",
            SyncStatus::Orphaned => "orphaned",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of the remote fields a repair decision was based on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    pub state: ProcessingState,
    pub ready_to_stream: bool,
    pub captured_at: DateTime<Utc>,
}

impl SourceSnapshot {
    /// Capture the repair-relevant fields of a remote asset.
    pub fn capture(asset: &RemoteAsset) -> Self {
        Self {
            display_name: asset.display_name.clone(),
            duration_seconds: asset.duration_seconds,
            state: asset.state,
            ready_to_stream: asset.ready_to_stream,
            captured_at: Utc::now(),
        }
    }
}

/// How a catalog record came to be in its current state.
///
/// Each variant carries exactly the provenance its status implies, so a
/// record can never claim `Orphaned` without a detection reason or
/// `AutoRepaired` without the source snapshot it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncProvenance {
    /// Record created by the normal authoring flow
    ManualEntry,
    /// Record created by repair from remote metadata
    AutoRepairedFrom {
        snapshot: SourceSnapshot,
        repaired_at: DateTime<Utc>,
    },
    /// Record marked after its remote asset stopped resolving
    OrphanedBecause {
        reason: String,
        detected_at: DateTime<Utc>,
    },
}

impl SyncProvenance {
    /// The status this provenance implies.
    pub fn status(&self) -> SyncStatus {
        match self {
            SyncProvenance::ManualEntry => SyncStatus::Manual,
            SyncProvenance::AutoRepairedFrom { .. } => SyncStatus::AutoRepaired,
            SyncProvenance::OrphanedBecause { .. } => SyncStatus::Orphaned,
        }
    }
}

/// The internal system-of-record row for a video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogRecord {
    /// Internal identifier
    pub id: RecordId,

    /// Foreign reference to exactly one remote asset
    pub external_asset_id: AssetId,

    /// Presentation title
    pub title: String,

    /// Duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,

    /// Whether the rest of the application may surface this video
    #[serde(default)]
    pub is_published: bool,

    /// Provenance of the record; determines its sync status
    pub provenance: SyncProvenance,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl CatalogRecord {
    /// Create a record through the normal authoring flow.
    pub fn new_manual(external_asset_id: impl Into<AssetId>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            external_asset_id: external_asset_id.into(),
            title: title.into(),
            duration_seconds: None,
            is_published: false,
            provenance: SyncProvenance::ManualEntry,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a record from remote metadata, as the repair engine does.
    ///
    /// The title falls back to a generated name when the service reported
    /// none; publication mirrors the asset's playable flag.
    pub fn from_remote(asset: &RemoteAsset) -> Self {
        let now = Utc::now();
        let title = asset
            .display_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| generated_title(&asset.id));

        Self {
            id: RecordId::new(),
            external_asset_id: asset.id.clone(),
            title,
            duration_seconds: asset.duration_seconds,
            is_published: asset.is_playable(),
            provenance: SyncProvenance::AutoRepairedFrom {
                snapshot: SourceSnapshot::capture(asset),
                repaired_at: now,
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// The sync status implied by this record's provenance.
    pub fn sync_status(&self) -> SyncStatus {
        self.provenance.status()
    }
}

/// Fallback title for assets the service never named.
pub fn generated_title(id: &AssetId) -> String {
    let short: String = id.as_str().chars().take(8).collect();
    format!("Video {}", short)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::RemoteAsset;

    #[test]
    fn test_record_id_generation() {
        let id1 = RecordId::new();
        let id2 = RecordId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_from_remote_mirrors_playability() {
        let mut asset = RemoteAsset::new("asset-1");
        asset.display_name = Some("Launch keynote".to_string());
        asset.state = ProcessingState::Ready;
        asset.ready_to_stream = true;
        asset.duration_seconds = Some(120.5);

        let record = CatalogRecord::from_remote(&asset);
        assert_eq!(record.external_asset_id.as_str(), "asset-1");
        assert_eq!(record.title, "Launch keynote");
        assert!(record.is_published);
        assert_eq!(record.duration_seconds, Some(120.5));
        assert_eq!(record.sync_status(), SyncStatus::AutoRepaired);
    }

    #[test]
    fn test_from_remote_generates_title_when_unnamed() {
        let mut asset = RemoteAsset::new("abcdef123456");
        asset.state = ProcessingState::Ready;
        asset.ready_to_stream = true;

        let record = CatalogRecord::from_remote(&asset);
        assert_eq!(record.title, "Video abcdef12");
    }

    #[test]
    fn test_blank_display_name_falls_back() {
        let mut asset = RemoteAsset::new("asset-2");
        asset.display_name = Some("   ".to_string());
        let record = CatalogRecord::from_remote(&asset);
        assert!(record.title.starts_with("Video "));
    }

    #[test]
    fn test_provenance_implies_status() {
        let manual = SyncProvenance::ManualEntry;
        assert_eq!(manual.status(), SyncStatus::Manual);

        let orphaned = SyncProvenance::OrphanedBecause {
            reason: "asset gone".to_string(),
            detected_at: Utc::now(),
        };
        assert_eq!(orphaned.status(), SyncStatus::Orphaned);
    }
}
