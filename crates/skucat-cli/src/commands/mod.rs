pub mod check;
pub mod completions;
pub mod fetch;
pub mod get;
pub mod list;
pub mod zones;

use serde::Serialize;
use skucat_core::{
    with_location, with_resource_client, wrap_records, Cache, CacheOption, CancelToken, Sku,
};
use skucat_remote::{ArmConfig, HttpSkuClient};
use std::path::PathBuf;
use std::sync::Arc;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;

pub fn json_pretty(value: &impl Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Where the catalog comes from: a listing file on disk, or the remote
/// listing endpoint.
#[derive(Debug, Default)]
pub struct Source {
    pub snapshot: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub subscription: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub location: Option<String>,
}

impl Source {
    pub fn arm_config(&self) -> Result<ArmConfig, String> {
        let mut config = if let Some(ref path) = self.config {
            ArmConfig::load(path).map_err(|e| format!("failed to load {}: {e}", path.display()))?
        } else if let Some(ref subscription) = self.subscription {
            ArmConfig::new(subscription)
        } else {
            ArmConfig::load_default()
                .map_err(|e| format!("no --snapshot, --subscription or config: {e}"))?
        };
        if let Some(ref subscription) = self.subscription {
            config = config.with_subscription(subscription);
        }
        if let Some(ref endpoint) = self.endpoint {
            config = config.with_endpoint(endpoint);
        }
        if let Some(ref token) = self.token {
            config = config.with_token(token);
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }

    fn location_options(&self) -> Vec<CacheOption> {
        self.location.as_deref().map(with_location).into_iter().collect()
    }

    pub fn open(&self, cancel: &CancelToken) -> Result<Cache, String> {
        if let Some(ref path) = self.snapshot {
            let page = skucat_schema::parse_listing_file(path)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            tracing::debug!("loaded {} skus from {}", page.value.len(), path.display());
            return Cache::new_static(wrap_records(page.value), self.location_options())
                .map_err(|e| e.to_string());
        }

        let client = HttpSkuClient::new(self.arm_config()?);
        let mut options = self.location_options();
        options.push(with_resource_client(Arc::new(client)));
        Cache::new(cancel, options).map_err(|e| e.to_string())
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Flattened view of one SKU for tables and JSON output.
#[derive(Debug, Serialize)]
pub struct SkuRow {
    pub name: String,
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted: Option<bool>,
}

impl SkuRow {
    pub fn new(sku: &Sku, location: Option<&str>) -> Self {
        Self {
            name: sku.name().to_owned(),
            resource_type: sku.resource_type().to_owned(),
            vcpus: sku.vcpus().ok(),
            memory_gb: sku.memory_gb().ok(),
            zones: location.and_then(|l| sku.availability_zones(l).map(|z| z.into_iter().collect())),
            restricted: location.map(|l| sku.is_restricted(l)),
        }
    }

    pub fn zones_display(&self) -> String {
        match self.restricted {
            Some(true) => colorize_availability("restricted"),
            _ => match self.zones {
                None if self.restricted.is_none() => "-".to_owned(),
                None => colorize_availability("unavailable"),
                Some(ref z) if z.is_empty() => colorize_availability("regional"),
                Some(ref z) => colorize_availability(&z.join(",")),
            },
        }
    }
}

pub fn colorize_availability(status: &str) -> String {
    use console::Style;
    match status {
        "restricted" => Style::new().red().apply_to(status).to_string(),
        "unavailable" => Style::new().dim().apply_to(status).to_string(),
        "regional" => Style::new().yellow().apply_to(status).to_string(),
        other => Style::new().green().apply_to(other).to_string(),
    }
}

pub fn print_rows(rows: &[SkuRow], json: bool) -> Result<(), String> {
    if json {
        println!("{}", json_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("no skus found");
        return Ok(());
    }
    println!(
        "{:<32} {:<20} {:>6} {:>10} ZONES",
        "NAME", "RESOURCE_TYPE", "VCPUS", "MEMORY_GB"
    );
    for row in rows {
        let vcpus = row.vcpus.map_or_else(|| "-".to_owned(), |v| v.to_string());
        let memory = row.memory_gb.map_or_else(|| "-".to_owned(), |m| m.to_string());
        println!(
            "{:<32} {:<20} {:>6} {:>10} {}",
            row.name,
            row.resource_type,
            vcpus,
            memory,
            row.zones_display()
        );
    }
    Ok(())
}
