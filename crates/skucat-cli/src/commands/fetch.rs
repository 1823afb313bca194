use super::EXIT_SUCCESS;
use skucat_core::Cache;
use skucat_schema::ListingPage;

/// `fetch`: print the whole catalog as a single listing page, suitable for
/// `--snapshot`.
pub fn run(cache: &Cache) -> Result<u8, String> {
    let page = ListingPage::new(cache.list().iter().map(|sku| sku.raw().clone()).collect());
    println!("{}", page.to_json_pretty().map_err(|e| e.to_string())?);
    tracing::info!("wrote {} skus", page.value.len());
    Ok(EXIT_SUCCESS)
}
