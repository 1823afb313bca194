//! Capability queries and availability-zone resolution over a cached SKU catalog.
//!
//! This crate wraps raw listing records as immutable `Sku` values with typed
//! capability accessors and restriction-aware zone resolution, provides the
//! order-preserving `filter`/`map` query combinators, and the `Cache` that owns
//! a refreshable snapshot fetched through a `SkuLister` collaborator. A
//! `LazyCache` memoizes the first successfully constructed cache.

pub mod cache;
pub mod client;
pub mod lazy;
pub mod query;
pub mod sku;
pub mod zones;

pub use cache::{
    static_cache_fn, with_client, with_location, with_resource_client, Cache, CacheOption,
    NewCacheFn,
};
pub use client::{BoxError, CancelToken, PageIter, PagingLister, ResourceClient, SkuLister};
pub use lazy::LazyCache;
pub use query::{all, filter, map, name_filter, resource_type_filter, FilterFn, Predicate};
pub use sku::{wrap_records, Capability, Sku, DISKS, VIRTUAL_MACHINES};
pub use zones::ZoneAvailability;

use thiserror::Error;

/// Failure reading a single capability from a single SKU.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("capability not found: {name}")]
    NotFound { name: String },
    #[error("failed to parse capability '{name}' value '{value}': {reason}")]
    ValueParse {
        name: String,
        value: String,
        reason: String,
    },
}

/// Errors surfaced by a listing collaborator. The wrapped source is passed
/// through untouched.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not list resource skus: {0}")]
    List(#[source] BoxError),
    #[error("could not iterate resource skus: {0}")]
    Iterate(#[source] BoxError),
    #[error("listing cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("a listing client is already set; supply exactly one client option")]
    ClientAlreadySet,
    #[error("no listing client configured")]
    NoClient,
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    #[error("capability error: {0}")]
    Capability(#[from] CapabilityError),
}
