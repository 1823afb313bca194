//! Availability-zone resolution for a single SKU in a single location.

use crate::sku::Sku;
use std::collections::BTreeSet;

/// Where a SKU can be deployed within one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneAvailability {
    /// The SKU has no location info for this location.
    NotOffered,
    /// A location-scoped restriction removes the whole location.
    LocationRestricted,
    /// Offered; the zones left after zone-scoped restrictions. Empty for
    /// regional (non-zonal) offerings or when every zone is restricted.
    Offered(BTreeSet<String>),
}

impl ZoneAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Offered(_))
    }

    pub fn zones(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Offered(zones) => Some(zones),
            Self::NotOffered | Self::LocationRestricted => None,
        }
    }

    pub fn into_zones(self) -> Option<BTreeSet<String>> {
        match self {
            Self::Offered(zones) => Some(zones),
            Self::NotOffered | Self::LocationRestricted => None,
        }
    }
}

impl Sku {
    /// Resolve the deployable zones in `location`.
    ///
    /// A location restriction dominates: it is checked before any zone
    /// restriction is applied and short-circuits the result.
    pub fn zone_availability(&self, location: &str) -> ZoneAvailability {
        let Some(info) = self.location_infos().find(|info| {
            info.location
                .as_deref()
                .is_some_and(|l| l.eq_ignore_ascii_case(location))
        }) else {
            return ZoneAvailability::NotOffered;
        };

        if self.is_restricted(location) {
            return ZoneAvailability::LocationRestricted;
        }

        let mut zones: BTreeSet<String> = info.zones.iter().flatten().cloned().collect();

        for restriction in self.restrictions() {
            for zone in restriction.affected_zones() {
                zones.remove(zone);
            }
        }

        ZoneAvailability::Offered(zones)
    }

    /// Deployable zones in `location`, or `None` when the SKU is not offered
    /// there or the location is restricted.
    pub fn availability_zones(&self, location: &str) -> Option<BTreeSet<String>> {
        self.zone_availability(location).into_zones()
    }
}
