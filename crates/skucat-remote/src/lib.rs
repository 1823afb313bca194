//! Remote listing of compute resource SKUs.
//!
//! This crate provides `HttpSkuClient`, a paged `ResourceClient` that walks the
//! provider's SKU listing endpoint via `nextLink`, and `ArmConfig`, the
//! endpoint/subscription/token configuration persisted as JSON.

pub mod config;
pub mod http;

pub use config::ArmConfig;
pub use http::HttpSkuClient;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("remote config error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use skucat_core::BoxError;

    #[test]
    fn remote_error_boxes_for_listing_collaborators() {
        let boxed: BoxError = RemoteError::Http("HTTP 403 for /skus".to_owned()).into();
        assert_eq!(boxed.to_string(), "HTTP error: HTTP 403 for /skus");
    }
}
