use crate::{ArmConfig, RemoteError};
use skucat_core::{BoxError, PageIter, ResourceClient};
use skucat_schema::{ListingPage, RawSku};
use std::io::Read;
use std::time::Duration;

/// Paged client for the compute SKU listing endpoint.
///
/// The first request goes to [`ArmConfig::listing_url`] with `api-version`
/// and `$filter` query parameters; every later request follows the
/// `nextLink` of the previous page verbatim until a page has none.
pub struct HttpSkuClient {
    config: ArmConfig,
    agent: ureq::Agent,
}

impl HttpSkuClient {
    pub fn new(config: ArmConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        Self { config, agent }
    }

    pub fn config(&self) -> &ArmConfig {
        &self.config
    }

    fn first_page(&self, filter: &str) -> Result<ListingPage, RemoteError> {
        let url = self.config.listing_url();
        tracing::debug!("GET {url} (filter: {filter:?})");
        let mut req = self
            .agent
            .get(&url)
            .query("api-version", &self.config.api_version);
        if !filter.is_empty() {
            req = req.query("$filter", filter);
        }
        if let Some(ref token) = self.config.auth_token {
            req = req.header("Authorization", &format!("Bearer {token}"));
        }
        Self::read_page(&url, req.call())
    }

    fn next_page(&self, url: &str) -> Result<ListingPage, RemoteError> {
        tracing::debug!("GET {url}");
        let mut req = self.agent.get(url);
        if let Some(ref token) = self.config.auth_token {
            req = req.header("Authorization", &format!("Bearer {token}"));
        }
        Self::read_page(url, req.call())
    }

    fn read_page(
        url: &str,
        result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
    ) -> Result<ListingPage, RemoteError> {
        let resp = match result {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(code)) => {
                return Err(RemoteError::Http(format!("HTTP {code} for {url}")));
            }
            Err(e) => return Err(RemoteError::Http(e.to_string())),
        };

        let code = resp.status().as_u16();
        if code >= 400 {
            return Err(RemoteError::Http(format!("HTTP {code} for {url}")));
        }

        let mut reader = resp.into_body().into_reader();
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .map_err(|e| RemoteError::Http(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| RemoteError::Serialization(e.to_string()))
    }
}

enum Cursor {
    Start(String),
    Next(String),
    Done,
}

struct Pages<'a> {
    client: &'a HttpSkuClient,
    cursor: Cursor,
    fetched: usize,
}

impl Iterator for Pages<'_> {
    type Item = Result<Vec<RawSku>, BoxError>;

    fn next(&mut self) -> Option<Self::Item> {
        let page = match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => return None,
            Cursor::Start(filter) => self.client.first_page(&filter),
            Cursor::Next(url) => self.client.next_page(&url),
        };
        match page {
            Ok(page) => {
                self.fetched += 1;
                if let Some(link) = page.next() {
                    self.cursor = Cursor::Next(link.to_string());
                } else {
                    tracing::debug!("listing complete after {} pages", self.fetched);
                }
                Some(Ok(page.value))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl ResourceClient for HttpSkuClient {
    fn list_pages(&self, filter: &str) -> Result<PageIter<'_>, BoxError> {
        self.config.validate()?;
        Ok(Box::new(Pages {
            client: self,
            cursor: Cursor::Start(filter.to_owned()),
            fetched: 0,
        }))
    }
}
