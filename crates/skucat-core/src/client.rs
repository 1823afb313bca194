//! Listing collaborator contracts.
//!
//! The cache depends only on [`SkuLister`]: one blocking call that returns
//! the complete listing or an error. Paged clients implement
//! [`ResourceClient`] and are adapted by [`PagingLister`], which drains every
//! page and discards partial results on failure.

use crate::ClientError;
use skucat_schema::RawSku;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Iterator over listing pages; each item is one fetched page.
pub type PageIter<'a> = Box<dyn Iterator<Item = Result<Vec<RawSku>, BoxError>> + 'a>;

/// Cooperative cancellation flag shared between a caller and a listing call.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Complete listing of raw SKU records for a provider filter expression.
pub trait SkuLister: Send + Sync {
    fn list(&self, cancel: &CancelToken, filter: &str) -> Result<Vec<RawSku>, ClientError>;
}

/// A paged listing API. Fetching the first page may happen eagerly in
/// `list_pages` or lazily on the first `next()`.
pub trait ResourceClient: Send + Sync {
    fn list_pages(&self, filter: &str) -> Result<PageIter<'_>, BoxError>;
}

/// Adapts a paged [`ResourceClient`] into a [`SkuLister`].
pub struct PagingLister {
    client: Arc<dyn ResourceClient>,
}

impl PagingLister {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }
}

impl SkuLister for PagingLister {
    fn list(&self, cancel: &CancelToken, filter: &str) -> Result<Vec<RawSku>, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let mut pages = self.client.list_pages(filter).map_err(ClientError::List)?;
        let mut skus = Vec::new();
        let mut page_count = 0usize;

        loop {
            if cancel.is_cancelled() {
                return Err(ClientError::Cancelled);
            }
            let Some(page) = pages.next() else { break };
            skus.extend(page.map_err(ClientError::Iterate)?);
            page_count += 1;
        }

        debug!("listed {} skus across {page_count} pages", skus.len());
        Ok(skus)
    }
}
