use crate::RemoteError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";
pub const DEFAULT_API_VERSION: &str = "2021-07-01";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub subscription_id: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ArmConfig {
    pub fn new(subscription_id: &str) -> Self {
        Self {
            endpoint: default_endpoint(),
            subscription_id: subscription_id.to_owned(),
            api_version: default_api_version(),
            auth_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        endpoint.trim_end_matches('/').clone_into(&mut self.endpoint);
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_owned());
        self
    }

    #[must_use]
    pub fn with_subscription(mut self, subscription_id: &str) -> Self {
        subscription_id.clone_into(&mut self.subscription_id);
        self
    }

    /// `{endpoint}/subscriptions/{id}/providers/Microsoft.Compute/skus`
    pub fn listing_url(&self) -> String {
        format!(
            "{}/subscriptions/{}/providers/Microsoft.Compute/skus",
            self.endpoint, self.subscription_id
        )
    }

    /// Load config from `~/.config/skucat/arm.json`.
    pub fn load_default() -> Result<Self, RemoteError> {
        let path = default_config_path()?;
        Self::load(&path)
    }

    pub fn load(path: &Path) -> Result<Self, RemoteError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| RemoteError::Config(format!("invalid arm config: {e}")))?;
        config.endpoint = config.endpoint.trim_end_matches('/').to_owned();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), RemoteError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| RemoteError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RemoteError> {
        if self.subscription_id.trim().is_empty() {
            return Err(RemoteError::Config("subscription_id is empty".to_owned()));
        }
        if self.endpoint.is_empty() {
            return Err(RemoteError::Config("endpoint is empty".to_owned()));
        }
        if self.timeout_secs == 0 {
            return Err(RemoteError::Config("timeout_secs must be positive".to_owned()));
        }
        Ok(())
    }
}

pub fn default_config_path() -> Result<PathBuf, RemoteError> {
    let home = std::env::var("HOME").map_err(|_| RemoteError::Config("HOME not set".to_owned()))?;
    Ok(PathBuf::from(home).join(".config/skucat/arm.json"))
}
