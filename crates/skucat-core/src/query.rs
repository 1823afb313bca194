//! Order-preserving filter/map combinators and reusable SKU predicates.

use crate::sku::Sku;

/// A boxed predicate so heterogeneous conditions can share one slice.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Predicate over catalog entries.
pub type FilterFn = Predicate<Sku>;

/// True when `item` satisfies every predicate. Stops at the first failure;
/// an empty predicate list accepts everything.
pub fn all<T>(item: &T, predicates: &[Predicate<T>]) -> bool {
    predicates.iter().all(|p| p(item))
}

/// Copy out the items satisfying all predicates, keeping their relative
/// order. The input is never modified and an empty input allocates nothing.
pub fn filter<T: Clone>(items: &[T], predicates: &[Predicate<T>]) -> Vec<T> {
    items
        .iter()
        .filter(|item| all(*item, predicates))
        .cloned()
        .collect()
}

/// Apply `f` to every item, producing a new vector of the same length and
/// order.
pub fn map<T, U>(items: &[T], f: impl FnMut(&T) -> U) -> Vec<U> {
    items.iter().map(f).collect()
}

/// Exact resource type match, e.g. `virtualMachines`, `disks`,
/// `availabilitySets`, `snapshots` or `hostGroups/hosts`.
pub fn resource_type_filter(resource_type: &str) -> FilterFn {
    let resource_type = resource_type.to_owned();
    Box::new(move |sku: &Sku| sku.is_resource_type(&resource_type))
}

/// Case-insensitive exact name match.
pub fn name_filter(name: &str) -> FilterFn {
    let name = name.to_owned();
    Box::new(move |sku: &Sku| sku.name().eq_ignore_ascii_case(&name))
}
