use serde::{Deserialize, Serialize};

/// One resource SKU exactly as the listing API reports it.
///
/// Every field is optional on the wire; absent fields stay `None` here and are
/// normalized by the accessors on the core `Sku` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSku {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_info: Option<Vec<RawLocationInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<RawCapability>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Vec<RawRestriction>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_details: Option<Vec<RawZoneDetails>>,
}

/// Capabilities that only hold in a subset of a location's zones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawZoneDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<RawCapability>>,
}

/// A named attribute; the value is always a string on the wire regardless of
/// whether it encodes a boolean, an integer, or a comma-joined list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCapability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RawCapability {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: Some(name.to_owned()),
            value: Some(value.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestrictionType {
    Location,
    Zone,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRestriction {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub restriction_type: Option<RestrictionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restriction_info: Option<RawRestrictionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRestrictionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
}

impl RawRestriction {
    /// Restriction that removes every zone of the given locations.
    pub fn location(locations: &[&str]) -> Self {
        let owned: Vec<String> = locations.iter().map(|l| (*l).to_owned()).collect();
        Self {
            restriction_type: Some(RestrictionType::Location),
            values: Some(owned.clone()),
            restriction_info: Some(RawRestrictionInfo {
                locations: Some(owned),
                zones: None,
            }),
            reason_code: Some("NotAvailableForSubscription".to_owned()),
        }
    }

    /// Restriction that removes individual zones.
    pub fn zone(location: &str, zones: &[&str]) -> Self {
        Self {
            restriction_type: Some(RestrictionType::Zone),
            values: Some(vec![location.to_owned()]),
            restriction_info: Some(RawRestrictionInfo {
                locations: Some(vec![location.to_owned()]),
                zones: Some(zones.iter().map(|z| (*z).to_owned()).collect()),
            }),
            reason_code: Some("NotAvailableForSubscription".to_owned()),
        }
    }

    pub fn is_location_scoped(&self) -> bool {
        self.restriction_type == Some(RestrictionType::Location)
    }

    pub fn is_zone_scoped(&self) -> bool {
        self.restriction_type == Some(RestrictionType::Zone)
    }

    /// Locations named by a location-scoped restriction: the union of
    /// `values` and `restrictionInfo.locations`. Empty for other kinds.
    pub fn affected_locations(&self) -> impl Iterator<Item = &str> {
        let scoped = self.is_location_scoped();
        let values = self.values.iter().flatten();
        let info = self
            .restriction_info
            .iter()
            .filter_map(|info| info.locations.as_ref())
            .flatten();
        values
            .chain(info)
            .filter(move |_| scoped)
            .map(String::as_str)
    }

    /// Zones named by a zone-scoped restriction. Empty for other kinds.
    pub fn affected_zones(&self) -> impl Iterator<Item = &str> {
        let scoped = self.is_zone_scoped();
        self.restriction_info
            .iter()
            .filter_map(|info| info.zones.as_ref())
            .flatten()
            .filter(move |_| scoped)
            .map(String::as_str)
    }
}
