//! Collaborator contracts the sync engines depend on.
//!
//! The wire-level clients for the external processing service and the
//! catalog database live outside this workspace; the engines only ever see
//! the two traits defined here. Error taxonomies are part of the contract:
//! a `Get` on an asset that has not propagated to read replicas yet must
//! surface as `NotVisibleYet`, never as `NotFound`, and an insert that
//! violates the one-record-per-asset invariant must surface as `Conflict`.

pub mod catalog;
pub mod error;
pub mod page;
pub mod source;

pub use catalog::{CatalogPatch, CatalogStore};
pub use error::{SourceError, SourceResult, StoreError, StoreResult};
pub use page::{AssetPage, PageRequest, RecordPage};
pub use source::RemoteAssetSource;
