use crate::client::{CancelToken, PagingLister, ResourceClient, SkuLister};
use crate::query::{all, filter, name_filter, resource_type_filter, FilterFn};
use crate::sku::{wrap_records, Sku, VIRTUAL_MACHINES};
use crate::CoreError;
use skucat_schema::FilterExpression;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Construction option for a [`Cache`]. Options apply in order.
pub enum CacheOption {
    /// Restrict the listing to one location and resolve zones there.
    Location(String),
    /// A complete-listing collaborator.
    Client(Arc<dyn SkuLister>),
    /// A paged collaborator, drained by a [`PagingLister`].
    ResourceClient(Arc<dyn ResourceClient>),
}

impl fmt::Debug for CacheOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(location) => f.debug_tuple("Location").field(location).finish(),
            Self::Client(_) => f.write_str("Client(..)"),
            Self::ResourceClient(_) => f.write_str("ResourceClient(..)"),
        }
    }
}

pub fn with_location(location: &str) -> CacheOption {
    CacheOption::Location(location.to_owned())
}

pub fn with_client(client: Arc<dyn SkuLister>) -> CacheOption {
    CacheOption::Client(client)
}

pub fn with_resource_client(client: Arc<dyn ResourceClient>) -> CacheOption {
    CacheOption::ResourceClient(client)
}

/// Cache constructor signature, used by [`crate::LazyCache`] and to swap in
/// static data under test.
pub type NewCacheFn =
    Box<dyn Fn(&CancelToken, Vec<CacheOption>) -> Result<Cache, CoreError> + Send + Sync>;

/// Factory that ignores any client option and serves `skus` frozen.
pub fn static_cache_fn(skus: Vec<Sku>) -> NewCacheFn {
    Box::new(move |_cancel: &CancelToken, options: Vec<CacheOption>| {
        Cache::new_static(skus.clone(), options)
    })
}

#[derive(Default)]
struct CacheConfig {
    location: String,
    filter: FilterExpression,
    client: Option<Arc<dyn SkuLister>>,
}

impl CacheConfig {
    fn from_options(options: impl IntoIterator<Item = CacheOption>) -> Result<Self, CoreError> {
        let mut config = Self::default();
        for option in options {
            match option {
                CacheOption::Location(location) => {
                    config.filter = FilterExpression::for_location(&location);
                    config.location = location;
                }
                CacheOption::Client(client) => config.set_client(client)?,
                CacheOption::ResourceClient(client) => {
                    config.set_client(Arc::new(PagingLister::new(client)))?;
                }
            }
        }
        Ok(config)
    }

    fn set_client(&mut self, client: Arc<dyn SkuLister>) -> Result<(), CoreError> {
        if self.client.is_some() {
            return Err(CoreError::ClientAlreadySet);
        }
        self.client = Some(client);
        Ok(())
    }
}

/// An in-memory snapshot of the SKU catalog for one optional location.
///
/// The snapshot is replaced wholesale by [`Cache::refresh`]; readers hold an
/// `Arc` to whichever snapshot was current when they asked, so a refresh never
/// changes data a caller is already looking at. Nothing refreshes on its own.
pub struct Cache {
    location: String,
    filter: FilterExpression,
    client: Option<Arc<dyn SkuLister>>,
    data: RwLock<Arc<Vec<Sku>>>,
}

impl Cache {
    /// Apply `options`, then populate the cache with exactly one listing call.
    /// Returns an error rather than a partially initialized cache.
    pub fn new(
        cancel: &CancelToken,
        options: impl IntoIterator<Item = CacheOption>,
    ) -> Result<Self, CoreError> {
        let config = CacheConfig::from_options(options)?;
        if config.client.is_none() {
            return Err(CoreError::NoClient);
        }
        let cache = Self::from_config(config, Vec::new());
        cache.refresh(cancel)?;
        Ok(cache)
    }

    /// A cache over fixed data that never refreshes. Client options are
    /// validated like in [`Cache::new`] and then dropped.
    pub fn new_static(
        skus: Vec<Sku>,
        options: impl IntoIterator<Item = CacheOption>,
    ) -> Result<Self, CoreError> {
        let mut config = CacheConfig::from_options(options)?;
        config.client = None;
        Ok(Self::from_config(config, skus))
    }

    fn from_config(config: CacheConfig, skus: Vec<Sku>) -> Self {
        Self {
            location: config.location,
            filter: config.filter,
            client: config.client,
            data: RwLock::new(Arc::new(skus)),
        }
    }

    /// Fetch a fresh listing and swap it in. On failure the previous snapshot
    /// stays in place. A static cache has nothing to fetch and succeeds.
    pub fn refresh(&self, cancel: &CancelToken) -> Result<(), CoreError> {
        let Some(client) = &self.client else {
            debug!("static sku cache, nothing to refresh");
            return Ok(());
        };

        debug!("refreshing sku cache with filter '{}'", self.filter);
        let records = client.list(cancel, &self.filter)?;
        let snapshot = Arc::new(wrap_records(records));
        let count = snapshot.len();

        *self.data.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
        info!("sku cache refreshed: {count} records");
        Ok(())
    }

    fn snapshot(&self) -> Arc<Vec<Sku>> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Configured location; empty when the cache spans all locations.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn filter_expression(&self) -> &FilterExpression {
        &self.filter
    }

    pub fn is_static(&self) -> bool {
        self.client.is_none()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// First SKU in snapshot order with exactly this resource type and this
    /// name (ignoring case).
    pub fn get(&self, name: &str, resource_type: &str) -> Option<Sku> {
        let predicates = [resource_type_filter(resource_type), name_filter(name)];
        self.snapshot()
            .iter()
            .find(|sku| all(*sku, &predicates))
            .cloned()
    }

    /// The whole snapshot, read-only.
    pub fn list(&self) -> Arc<Vec<Sku>> {
        self.snapshot()
    }

    pub fn virtual_machines(&self) -> Vec<Sku> {
        filter(&self.snapshot(), &[resource_type_filter(VIRTUAL_MACHINES)])
    }

    /// Union of the deployable zones, in the configured location, of every SKU
    /// matching all `predicates`.
    pub fn availability_zones(&self, predicates: &[FilterFn]) -> BTreeSet<String> {
        let mut zones = BTreeSet::new();
        for sku in self.snapshot().iter().filter(|sku| all(*sku, predicates)) {
            if let Some(found) = sku.availability_zones(&self.location) {
                zones.extend(found);
            }
        }
        zones
    }

    pub fn virtual_machine_availability_zones(&self) -> BTreeSet<String> {
        self.availability_zones(&[resource_type_filter(VIRTUAL_MACHINES)])
    }

    pub fn virtual_machine_availability_zones_for_size(&self, size: &str) -> BTreeSet<String> {
        self.availability_zones(&[resource_type_filter(VIRTUAL_MACHINES), name_filter(size)])
    }
}

impl PartialEq for Cache {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.location == other.location
            && self.filter == other.filter
            && *self.snapshot() == *other.snapshot()
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("location", &self.location)
            .field("filter", &self.filter)
            .field("static", &self.is_static())
            .field("skus", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sku::DISKS;
    use crate::ClientError;
    use skucat_schema::{RawLocationInfo, RawRestriction, RawSku};
    use std::sync::Mutex;

    /// Returns canned records and remembers the filters it was called with.
    #[derive(Default)]
    struct FakeLister {
        records: Mutex<Vec<RawSku>>,
        fail: Mutex<bool>,
        filters: Mutex<Vec<String>>,
    }

    impl FakeLister {
        fn with(records: Vec<RawSku>) -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(records),
                ..Self::default()
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: Mutex::new(true),
                ..Self::default()
            })
        }
    }

    impl SkuLister for FakeLister {
        fn list(&self, _cancel: &CancelToken, filter: &str) -> Result<Vec<RawSku>, ClientError> {
            self.filters.lock().unwrap().push(filter.to_owned());
            if *self.fail.lock().unwrap() {
                return Err(ClientError::List("boom".into()));
            }
            Ok(self.records.lock().unwrap().clone())
        }
    }

    fn raw(name: &str, resource_type: &str, location: &str, zones: &[&str]) -> RawSku {
        RawSku {
            name: Some(name.to_owned()),
            resource_type: Some(resource_type.to_owned()),
            locations: Some(vec![location.to_owned()]),
            location_info: Some(vec![RawLocationInfo {
                location: Some(location.to_owned()),
                zones: Some(zones.iter().map(|z| (*z).to_owned()).collect()),
                zone_details: None,
            }]),
            ..RawSku::default()
        }
    }

    fn zone_set(zones: &[&str]) -> BTreeSet<String> {
        zones.iter().map(|z| (*z).to_owned()).collect()
    }

    fn static_cache(records: Vec<RawSku>, location: &str) -> Cache {
        Cache::new_static(wrap_records(records), [with_location(location)]).unwrap()
    }

    #[test]
    fn new_refreshes_once_with_location_filter() {
        let lister = FakeLister::with(vec![raw("foo", VIRTUAL_MACHINES, "eastus", &["1"])]);
        let cache = Cache::new(
            &CancelToken::new(),
            [with_location("eastus"), with_client(lister.clone())],
        )
        .unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.location(), "eastus");
        assert_eq!(cache.filter_expression(), "location eq 'eastus'");
        assert_eq!(*lister.filters.lock().unwrap(), vec!["location eq 'eastus'"]);
    }

    #[test]
    fn new_without_location_uses_empty_filter() {
        let lister = FakeLister::with(Vec::new());
        let cache = Cache::new(&CancelToken::new(), [with_client(lister.clone())]).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.location(), "");
        assert_eq!(*lister.filters.lock().unwrap(), vec![String::new()]);
    }

    #[test]
    fn later_location_option_wins() {
        let lister = FakeLister::with(Vec::new());
        let cache = Cache::new(
            &CancelToken::new(),
            [
                with_location("westus"),
                with_client(lister),
                with_location("eastus"),
            ],
        )
        .unwrap();
        assert_eq!(cache.location(), "eastus");
    }

    #[test]
    fn second_client_is_rejected() {
        let result = Cache::new(
            &CancelToken::new(),
            [
                with_client(FakeLister::with(Vec::new())),
                with_client(FakeLister::with(Vec::new())),
            ],
        );
        assert!(matches!(result, Err(CoreError::ClientAlreadySet)));
    }

    #[test]
    fn missing_client_is_rejected() {
        let result = Cache::new(&CancelToken::new(), [with_location("eastus")]);
        assert!(matches!(result, Err(CoreError::NoClient)));
    }

    #[test]
    fn construction_fails_when_listing_fails() {
        let result = Cache::new(&CancelToken::new(), [with_client(FakeLister::failing())]);
        assert!(matches!(result, Err(CoreError::Client(ClientError::List(_)))));
    }

    #[test]
    fn failed_refresh_keeps_previous_snapshot() {
        let lister = FakeLister::with(vec![raw("foo", VIRTUAL_MACHINES, "eastus", &["1"])]);
        let cache = Cache::new(&CancelToken::new(), [with_client(lister.clone())]).unwrap();

        *lister.fail.lock().unwrap() = true;
        assert!(cache.refresh(&CancelToken::new()).is_err());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn refresh_replaces_snapshot_without_touching_readers() {
        let lister = FakeLister::with(vec![raw("foo", VIRTUAL_MACHINES, "eastus", &["1"])]);
        let cache = Cache::new(&CancelToken::new(), [with_client(lister.clone())]).unwrap();
        let before = cache.list();

        *lister.records.lock().unwrap() = vec![
            raw("bar", VIRTUAL_MACHINES, "eastus", &["2"]),
            raw("baz", DISKS, "eastus", &[]),
        ];
        cache.refresh(&CancelToken::new()).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].name(), "foo");
        assert_eq!(cache.len(), 2);
        assert!(cache.get("foo", VIRTUAL_MACHINES).is_none());
        assert!(cache.get("bar", VIRTUAL_MACHINES).is_some());
    }

    #[test]
    fn static_refresh_is_noop() {
        let cache = static_cache(vec![raw("foo", VIRTUAL_MACHINES, "baz", &["1"])], "baz");
        assert!(cache.is_static());
        cache.refresh(&CancelToken::new()).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn static_validates_then_drops_clients() {
        let cache =
            Cache::new_static(Vec::new(), [with_client(FakeLister::with(Vec::new()))]).unwrap();
        assert!(cache.is_static());

        let result = Cache::new_static(
            Vec::new(),
            [
                with_client(FakeLister::with(Vec::new())),
                with_client(FakeLister::with(Vec::new())),
            ],
        );
        assert!(matches!(result, Err(CoreError::ClientAlreadySet)));
    }

    #[test]
    fn get_finds_by_type_and_name() {
        let cache = static_cache(
            vec![
                RawSku {
                    name: Some("other".to_owned()),
                    resource_type: Some("baz".to_owned()),
                    ..RawSku::default()
                },
                RawSku {
                    name: Some("foo".to_owned()),
                    resource_type: Some("bar".to_owned()),
                    ..RawSku::default()
                },
            ],
            "",
        );
        let found = cache.get("FOO", "bar").unwrap();
        assert_eq!(found.name(), "foo");
        assert_eq!(found.resource_type(), "bar");
        assert!(cache.get("foo", "baz").is_none());
    }

    #[test]
    fn get_returns_first_in_snapshot_order() {
        let mut first = raw("foo", VIRTUAL_MACHINES, "eastus", &["1"]);
        first.tier = Some("Standard".to_owned());
        let mut second = raw("foo", VIRTUAL_MACHINES, "eastus", &["2"]);
        second.tier = Some("Basic".to_owned());
        let cache = static_cache(vec![first, second], "eastus");
        let found = cache.get("foo", VIRTUAL_MACHINES).unwrap();
        assert_eq!(found.raw().tier.as_deref(), Some("Standard"));
    }

    #[test]
    fn get_on_empty_cache_finds_nothing() {
        let cache = static_cache(Vec::new(), "eastus");
        assert!(cache.get("foo", VIRTUAL_MACHINES).is_none());
        assert!(cache.get("", "").is_none());
    }

    #[test]
    fn virtual_machines_excludes_disks() {
        let cache = static_cache(
            vec![
                raw("Standard_D2_v2", VIRTUAL_MACHINES, "eastus", &["1"]),
                raw("Premium_LRS", DISKS, "eastus", &["1"]),
            ],
            "eastus",
        );
        let vms = cache.virtual_machines();
        assert_eq!(vms.len(), 1);
        assert_eq!(vms[0].name(), "Standard_D2_v2");
    }

    #[test]
    fn zones_union_across_skus() {
        let cache = static_cache(
            vec![
                raw("foo", VIRTUAL_MACHINES, "baz", &["1"]),
                raw("foo", VIRTUAL_MACHINES, "baz", &["2"]),
            ],
            "baz",
        );
        assert_eq!(cache.availability_zones(&[]), zone_set(&["1", "2"]));
    }

    #[test]
    fn zones_skip_other_locations() {
        let cache = static_cache(vec![raw("foo", VIRTUAL_MACHINES, "foobar", &["1"])], "baz");
        assert!(cache.availability_zones(&[]).is_empty());
    }

    #[test]
    fn zones_respect_location_restriction() {
        let mut sku = raw("foo", VIRTUAL_MACHINES, "baz", &["1"]);
        sku.restrictions = Some(vec![RawRestriction::location(&["baz"])]);
        let cache = static_cache(vec![sku], "baz");
        assert!(cache.availability_zones(&[]).is_empty());
    }

    #[test]
    fn zones_respect_zone_restriction() {
        let mut sku = raw("foo", VIRTUAL_MACHINES, "baz", &["1"]);
        sku.restrictions = Some(vec![RawRestriction::zone("baz", &["1"])]);
        let cache = static_cache(vec![sku], "baz");
        assert!(cache.availability_zones(&[]).is_empty());
    }

    #[test]
    fn vm_zones_for_size() {
        let cache = static_cache(
            vec![
                raw("foo", VIRTUAL_MACHINES, "baz", &["1", "2"]),
                raw("foobar", VIRTUAL_MACHINES, "baz", &["3"]),
                raw("foo", DISKS, "baz", &["3"]),
            ],
            "baz",
        );
        assert_eq!(
            cache.virtual_machine_availability_zones(),
            zone_set(&["1", "2", "3"])
        );
        assert_eq!(
            cache.virtual_machine_availability_zones_for_size("FOO"),
            zone_set(&["1", "2"])
        );
        assert!(cache
            .virtual_machine_availability_zones_for_size("missing")
            .is_empty());
    }

    #[test]
    fn equality_compares_config_and_data() {
        let records = vec![
            raw("a", VIRTUAL_MACHINES, "eastus", &["1"]),
            raw("b", DISKS, "eastus", &[]),
        ];
        let a = static_cache(records.clone(), "eastus");
        let b = static_cache(records.clone(), "eastus");
        assert_eq!(a, b);
        assert_eq!(a, a);

        let other_location = static_cache(records.clone(), "westus");
        assert_ne!(a, other_location);

        let reversed: Vec<RawSku> = records.iter().rev().cloned().collect();
        assert_ne!(a, static_cache(reversed, "eastus"));

        assert_ne!(a, static_cache(records[..1].to_vec(), "eastus"));
    }

    #[test]
    fn static_cache_fn_ignores_clients() {
        let factory = static_cache_fn(wrap_records(vec![raw("a", DISKS, "eastus", &[])]));
        let cache = factory(
            &CancelToken::new(),
            vec![with_client(FakeLister::failing()), with_location("eastus")],
        )
        .unwrap();
        assert!(cache.is_static());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.location(), "eastus");
    }

    #[test]
    fn debug_does_not_require_client_debug() {
        let cache = static_cache(Vec::new(), "eastus");
        let rendered = format!("{cache:?}");
        assert!(rendered.contains("eastus"));
        assert!(rendered.contains("static: true"));
    }
}
