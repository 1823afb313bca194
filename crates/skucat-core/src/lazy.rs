use crate::cache::{Cache, CacheOption, NewCacheFn};
use crate::client::CancelToken;
use crate::CoreError;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Builds a [`Cache`] on first use and hands out that same instance
/// afterwards.
///
/// Construction runs under a mutex, so concurrent first callers wait for a
/// single build instead of racing. A failed build is not remembered; the
/// next caller tries again. Options passed after the first success are
/// ignored.
pub struct LazyCache {
    factory: NewCacheFn,
    instance: Mutex<Option<Arc<Cache>>>,
}

impl LazyCache {
    pub fn new(factory: NewCacheFn) -> Self {
        Self {
            factory,
            instance: Mutex::new(None),
        }
    }

    /// Lazily build a live cache with [`Cache::new`].
    pub fn live() -> Self {
        Self::new(Box::new(|cancel: &CancelToken, options: Vec<CacheOption>| {
            Cache::new(cancel, options)
        }))
    }

    pub fn get(
        &self,
        cancel: &CancelToken,
        options: Vec<CacheOption>,
    ) -> Result<Arc<Cache>, CoreError> {
        let mut instance = self.instance.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cache) = instance.as_ref() {
            return Ok(Arc::clone(cache));
        }

        debug!("creating sku cache");
        let cache = Arc::new((self.factory)(cancel, options)?);
        *instance = Some(Arc::clone(&cache));
        Ok(cache)
    }

    pub fn is_initialized(&self) -> bool {
        self.instance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{with_client, with_location};
    use crate::client::SkuLister;
    use crate::sku::{wrap_records, DISKS};
    use crate::ClientError;
    use skucat_schema::RawSku;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    fn counting_factory(calls: Arc<AtomicUsize>) -> NewCacheFn {
        Box::new(move |_cancel: &CancelToken, options: Vec<CacheOption>| {
            calls.fetch_add(1, Ordering::SeqCst);
            // widen the race window for concurrent first use
            thread::sleep(std::time::Duration::from_millis(20));
            Cache::new_static(
                wrap_records(vec![RawSku {
                    name: Some("Premium_LRS".to_owned()),
                    resource_type: Some(DISKS.to_owned()),
                    ..RawSku::default()
                }]),
                options,
            )
        })
    }

    #[test]
    fn returns_same_instance() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = LazyCache::new(counting_factory(Arc::clone(&calls)));
        assert!(!lazy.is_initialized());

        let first = lazy
            .get(&CancelToken::new(), vec![with_location("eastus")])
            .unwrap();
        let second = lazy
            .get(&CancelToken::new(), vec![with_location("westus")])
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.location(), "eastus");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(lazy.is_initialized());
    }

    #[test]
    fn concurrent_first_use_builds_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = Arc::new(LazyCache::new(counting_factory(Arc::clone(&calls))));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = Arc::clone(&lazy);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    lazy.get(&CancelToken::new(), Vec::new()).unwrap()
                })
            })
            .collect();

        let caches: Vec<Arc<Cache>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for cache in &caches[1..] {
            assert!(Arc::ptr_eq(&caches[0], cache));
        }
    }

    struct FlakyLister {
        attempts: AtomicUsize,
    }

    impl SkuLister for FlakyLister {
        fn list(&self, _cancel: &CancelToken, _filter: &str) -> Result<Vec<RawSku>, ClientError> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ClientError::List("transient".into()));
            }
            Ok(Vec::new())
        }
    }

    #[test]
    fn failed_build_is_not_memoized() {
        let lister = Arc::new(FlakyLister {
            attempts: AtomicUsize::new(0),
        });
        let lazy = LazyCache::live();

        let err = lazy
            .get(&CancelToken::new(), vec![with_client(lister.clone())])
            .unwrap_err();
        assert!(matches!(err, CoreError::Client(_)));
        assert!(!lazy.is_initialized());

        let cache = lazy
            .get(&CancelToken::new(), vec![with_client(lister.clone())])
            .unwrap();
        assert!(cache.is_empty());
        assert_eq!(lister.attempts.load(Ordering::SeqCst), 2);
    }
}
