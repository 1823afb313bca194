use crate::CapabilityError;
use serde::{Deserialize, Serialize};
use skucat_schema::{RawCapability, RawSku};

/// Resource type of virtual machine sizes.
pub const VIRTUAL_MACHINES: &str = "virtualMachines";
/// Resource type of managed disks.
pub const DISKS: &str = "disks";

/// Marker value of a supported boolean capability.
pub const CAPABILITY_SUPPORTED: &str = "True";
/// Marker value of an unsupported boolean capability.
pub const CAPABILITY_UNSUPPORTED: &str = "False";

pub const EPHEMERAL_OS_DISK: &str = "EphemeralOSDiskSupported";
pub const ACCELERATED_NETWORKING: &str = "AcceleratedNetworkingEnabled";
pub const ENCRYPTION_AT_HOST: &str = "EncryptionAtHostSupported";
pub const ULTRA_SSD_AVAILABLE: &str = "UltraSSDAvailable";
pub const VCPUS: &str = "vCPUs";
pub const MEMORY_GB: &str = "MemoryGB";
/// Comma-joined list such as `V1,V2`.
pub const HYPERV_GENERATIONS: &str = "HyperVGenerations";
pub const MAX_RESOURCE_VOLUME_MB: &str = "MaxResourceVolumeMB";

/// A catalog entry wrapping exactly one raw listing record.
///
/// Immutable once constructed. Optional string fields are normalized to the
/// empty string by the accessors; zone results keep absence distinct from
/// emptiness (see [`crate::ZoneAvailability`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(RawSku);

/// Wrap listing records 1:1, preserving order.
pub fn wrap_records(records: Vec<RawSku>) -> Vec<Sku> {
    records.into_iter().map(Sku::new).collect()
}

impl From<RawSku> for Sku {
    fn from(raw: RawSku) -> Self {
        Self(raw)
    }
}

/// Borrowed view of one capability with typed parses of its raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> Capability<'a> {
    fn from_raw(raw: &'a RawCapability) -> Option<Self> {
        Some(Self {
            name: raw.name.as_deref()?,
            value: raw.value.as_deref(),
        })
    }

    /// True when the value is the boolean marker, ignoring case.
    pub fn is_supported(&self) -> bool {
        self.value
            .is_some_and(|v| v.eq_ignore_ascii_case(CAPABILITY_SUPPORTED))
    }

    /// Substring containment on the raw value. A token of `1` also matches
    /// `10`; callers pick tokens that cannot collide.
    pub fn contains(&self, token: &str) -> bool {
        self.value.is_some_and(|v| v.contains(token))
    }

    pub fn as_i64(&self) -> Result<i64, CapabilityError> {
        let value = self.value.unwrap_or_default();
        value.parse::<i64>().map_err(|e| self.parse_error(&e))
    }

    pub fn as_f64(&self) -> Result<f64, CapabilityError> {
        let value = self.value.unwrap_or_default();
        value.parse::<f64>().map_err(|e| self.parse_error(&e))
    }

    fn parse_error(&self, cause: &dyn std::fmt::Display) -> CapabilityError {
        CapabilityError::ValueParse {
            name: self.name.to_owned(),
            value: self.value.unwrap_or_default().to_owned(),
            reason: cause.to_string(),
        }
    }
}

impl Sku {
    pub fn new(raw: RawSku) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &RawSku {
        &self.0
    }

    pub fn into_raw(self) -> RawSku {
        self.0
    }

    /// SKU name, e.g. `Standard_D8s_v3`; empty when absent.
    pub fn name(&self) -> &str {
        self.0.name.as_deref().unwrap_or_default()
    }

    /// Resource type, e.g. `virtualMachines`; empty when absent.
    pub fn resource_type(&self) -> &str {
        self.0.resource_type.as_deref().unwrap_or_default()
    }

    /// Exact resource type match. A record without a resource type matches
    /// nothing, not even the empty string.
    pub fn is_resource_type(&self, resource_type: &str) -> bool {
        self.0.resource_type.as_deref() == Some(resource_type)
    }

    /// First declared location, falling back to the first location info
    /// entry. Listings return one record per region, so there is normally
    /// exactly one.
    pub fn location(&self) -> &str {
        if let Some(first) = self.0.locations.iter().flatten().next() {
            return first;
        }
        self.location_infos()
            .find_map(|info| info.location.as_deref())
            .unwrap_or_default()
    }

    pub(crate) fn location_infos(&self) -> impl Iterator<Item = &skucat_schema::RawLocationInfo> {
        self.0.location_info.iter().flatten()
    }

    pub(crate) fn restrictions(&self) -> impl Iterator<Item = &skucat_schema::RawRestriction> {
        self.0.restrictions.iter().flatten()
    }

    pub fn capabilities(&self) -> impl Iterator<Item = Capability<'_>> {
        self.0
            .capabilities
            .iter()
            .flatten()
            .filter_map(Capability::from_raw)
    }

    /// First capability whose name matches exactly.
    pub fn capability(&self, name: &str) -> Option<Capability<'_>> {
        self.capabilities().find(|c| c.name == name)
    }

    /// Boolean capability such as `EphemeralOSDiskSupported`,
    /// `EncryptionAtHostSupported` or `AcceleratedNetworkingEnabled`.
    pub fn has_capability(&self, name: &str) -> bool {
        self.capability(name).is_some_and(|c| c.is_supported())
    }

    /// List-valued capability such as `HyperVGenerations = "V1,V2"`.
    pub fn has_capability_with_separator(&self, name: &str, token: &str) -> bool {
        self.capability(name).is_some_and(|c| c.contains(token))
    }

    /// Numeric capability such as `vCPUs`, `MemoryGB`, `MaxResourceVolumeMB`
    /// or `MaxDataDiskCount`, compared against a requested minimum.
    ///
    /// An absent capability (or one without a value) is `Ok(false)`; a value
    /// that is not a base-10 integer is an error.
    pub fn has_capability_with_capacity(
        &self,
        name: &str,
        requested: i64,
    ) -> Result<bool, CapabilityError> {
        match self.capability(name) {
            Some(c) if c.value.is_some() => Ok(c.as_i64()? >= requested),
            _ => Ok(false),
        }
    }

    /// Integer quantity of a capability, distinguishing a missing capability
    /// from one whose value does not parse.
    pub fn capability_integer_quantity(&self, name: &str) -> Result<i64, CapabilityError> {
        self.capability(name)
            .ok_or_else(|| CapabilityError::NotFound {
                name: name.to_owned(),
            })?
            .as_i64()
    }

    pub fn vcpus(&self) -> Result<i64, CapabilityError> {
        self.capability_integer_quantity(VCPUS)
    }

    /// Memory in GiB; fractional for some sizes (e.g. `0.75`).
    pub fn memory_gb(&self) -> Result<f64, CapabilityError> {
        self.capability(MEMORY_GB)
            .ok_or_else(|| CapabilityError::NotFound {
                name: MEMORY_GB.to_owned(),
            })?
            .as_f64()
    }

    /// True when any zone of any location advertises the boolean capability,
    /// e.g. `UltraSSDAvailable`.
    pub fn has_zonal_capability(&self, name: &str) -> bool {
        self.location_infos()
            .flat_map(|info| info.zone_details.iter().flatten())
            .flat_map(|details| details.capabilities.iter().flatten())
            .filter_map(Capability::from_raw)
            .any(|c| c.name == name && c.is_supported())
    }

    /// Offered in `location` and not wholly restricted there.
    pub fn is_available(&self, location: &str) -> bool {
        let listed = self
            .0
            .locations
            .iter()
            .flatten()
            .any(|l| l.eq_ignore_ascii_case(location));
        listed && self.availability_zones(location).is_some()
    }

    /// A location-scoped restriction names `location`, whether or not the
    /// SKU is offered there.
    pub fn is_restricted(&self, location: &str) -> bool {
        self.restrictions().any(|r| {
            r.affected_locations()
                .any(|l| l.eq_ignore_ascii_case(location))
        })
    }

    /// Same resource type, name and location, ignoring case. Two listings of
    /// the same offering compare equal here even when their capabilities
    /// differ.
    pub fn same_offering(&self, other: &Sku) -> bool {
        self.resource_type()
            .eq_ignore_ascii_case(other.resource_type())
            && self.name().eq_ignore_ascii_case(other.name())
            && self.location().eq_ignore_ascii_case(other.location())
    }
}
