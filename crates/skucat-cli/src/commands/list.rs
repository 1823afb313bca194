use super::{print_rows, SkuRow, Source, EXIT_SUCCESS};
use skucat_core::{filter, resource_type_filter, Cache, FilterFn};

/// `list`: every SKU in the catalog, optionally narrowed to one resource type.
pub fn run(
    cache: &Cache,
    source: &Source,
    resource_type: Option<&str>,
    json: bool,
) -> Result<u8, String> {
    let predicates: Vec<FilterFn> = resource_type.map(resource_type_filter).into_iter().collect();
    let skus = filter(&cache.list(), &predicates);
    let rows: Vec<SkuRow> = skus
        .iter()
        .map(|sku| SkuRow::new(sku, source.location()))
        .collect();
    print_rows(&rows, json)?;
    Ok(EXIT_SUCCESS)
}

/// `vms`: virtual machine sizes only.
pub fn run_vms(cache: &Cache, source: &Source, json: bool) -> Result<u8, String> {
    let rows: Vec<SkuRow> = cache
        .virtual_machines()
        .iter()
        .map(|sku| SkuRow::new(sku, source.location()))
        .collect();
    print_rows(&rows, json)?;
    Ok(EXIT_SUCCESS)
}
