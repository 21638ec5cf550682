//! Full-listing helpers shared by reconciliation and the sweeper.
//!
//! A failure on the first page aborts the pass; a failure on a later page
//! truncates the snapshot and is annotated instead of thrown, so bulk
//! operations still return a structured result.

use tracing::warn;

use vodsync_models::{CatalogRecord, RemoteAsset};
use vodsync_stores::{CatalogStore, PageRequest, RemoteAssetSource};

use crate::error::SyncResult;

/// Pages above this count are assumed to be a paging bug in the
/// collaborator and abort the loop.
const MAX_PAGES: u32 = 10_000;

/// Fetch every remote asset, following continuation tokens.
pub async fn list_all_assets<S: RemoteAssetSource + ?Sized>(
    source: &S,
    page_limit: Option<u32>,
) -> SyncResult<(Vec<RemoteAsset>, Vec<String>)> {
    let mut assets = Vec::new();
    let mut errors = Vec::new();
    let mut request = PageRequest::first(page_limit);
    let mut page_no = 0u32;

    loop {
        page_no += 1;
        match source.list(request).await {
            Ok(page) => {
                assets.extend(page.assets);
                match page.next_page_token {
                    Some(token) if page_no < MAX_PAGES => {
                        request = PageRequest::next(page_limit, token);
                    }
                    Some(_) => {
                        errors.push(format!("remote listing exceeded {} pages", MAX_PAGES));
                        break;
                    }
                    None => break,
                }
            }
            Err(e) if page_no == 1 => return Err(e.into()),
            Err(e) => {
                warn!(page = page_no, "remote listing truncated: {}", e);
                errors.push(format!("remote page {} failed: {}", page_no, e));
                break;
            }
        }
    }

    Ok((assets, errors))
}

/// Fetch every catalog record carrying an external asset id.
pub async fn list_all_records<C: CatalogStore + ?Sized>(
    catalog: &C,
    page_limit: Option<u32>,
) -> SyncResult<(Vec<CatalogRecord>, Vec<String>)> {
    let mut records = Vec::new();
    let mut errors = Vec::new();
    let mut request = PageRequest::first(page_limit);
    let mut page_no = 0u32;

    loop {
        page_no += 1;
        match catalog.list_with_external_id(request).await {
            Ok(page) => {
                records.extend(page.records);
                match page.next_page_token {
                    Some(token) if page_no < MAX_PAGES => {
                        request = PageRequest::next(page_limit, token);
                    }
                    Some(_) => {
                        errors.push(format!("catalog listing exceeded {} pages", MAX_PAGES));
                        break;
                    }
                    None => break,
                }
            }
            Err(e) if page_no == 1 => return Err(e.into()),
            Err(e) => {
                warn!(page = page_no, "catalog listing truncated: {}", e);
                errors.push(format!("catalog page {} failed: {}", page_no, e));
                break;
            }
        }
    }

    Ok((records, errors))
}
