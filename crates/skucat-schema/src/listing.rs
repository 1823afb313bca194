use crate::records::RawSku;
use crate::types::PageLink;
use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One page of the SKU listing API. Snapshot files use the same shape with
/// `nextLink` omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    #[serde(default)]
    pub value: Vec<RawSku>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<PageLink>,
}

impl ListingPage {
    pub fn new(value: Vec<RawSku>) -> Self {
        Self {
            value,
            next_link: None,
        }
    }

    /// The link to the following page, ignoring empty links some
    /// endpoints send on the last page.
    pub fn next(&self) -> Option<&PageLink> {
        self.next_link.as_ref().filter(|link| !link.is_empty())
    }

    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn parse_listing_str(input: &str) -> Result<ListingPage, SchemaError> {
    Ok(serde_json::from_str(input)?)
}

pub fn parse_listing_file(path: impl AsRef<Path>) -> Result<ListingPage, SchemaError> {
    let content = fs::read_to_string(path)?;
    parse_listing_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_page_with_next_link() {
        let input = r#"{
            "value": [
                { "name": "Standard_A0", "resourceType": "virtualMachines" },
                { "name": "Premium_LRS", "resourceType": "disks" }
            ],
            "nextLink": "https://management.example.com/skus?page=2"
        }"#;
        let page = parse_listing_str(input).expect("should parse");
        assert_eq!(page.value.len(), 2);
        assert_eq!(page.value[1].name.as_deref(), Some("Premium_LRS"));
        assert_eq!(
            page.next().map(PageLink::as_str),
            Some("https://management.example.com/skus?page=2")
        );
    }

    #[test]
    fn empty_next_link_means_last_page() {
        let page = parse_listing_str(r#"{"value": [], "nextLink": ""}"#).unwrap();
        assert!(page.next().is_none());
    }

    #[test]
    fn missing_value_is_empty_page() {
        let page = parse_listing_str("{}").unwrap();
        assert!(page.value.is_empty());
        assert!(page.next().is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_listing_str(r#"{"value": [{"name": 5}]}"#),
            Err(SchemaError::Parse(_))
        ));
    }

    #[test]
    fn reads_listing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eastus.json");
        let page = ListingPage::new(vec![RawSku {
            name: Some("Standard_B1s".to_owned()),
            ..RawSku::default()
        }]);
        fs::write(&path, page.to_json_pretty().unwrap()).unwrap();

        let loaded = parse_listing_file(&path).unwrap();
        assert_eq!(loaded, page);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_listing_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(SchemaError::Io(_))));
    }
}
