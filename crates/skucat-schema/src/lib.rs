//! Wire schema for the provider's resource-SKU catalog.
//!
//! This crate defines the raw record layer: `RawSku` and its nested location,
//! capability and restriction records exactly as the listing API returns them,
//! the `ListingPage` envelope used both by the paged API and by snapshot
//! fixture files, and typed string identifiers shared by the other crates.

pub mod listing;
pub mod records;
pub mod types;

pub use listing::{parse_listing_file, parse_listing_str, ListingPage};
pub use records::{
    RawCapability, RawLocationInfo, RawRestriction, RawRestrictionInfo, RawSku, RawZoneDetails,
    RestrictionType,
};
pub use types::{FilterExpression, PageLink};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read listing file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse listing: {0}")]
    Parse(#[from] serde_json::Error),
}
