use super::{colorize_availability, json_pretty, Source, EXIT_NOT_FOUND, EXIT_SUCCESS};
use skucat_core::Cache;

pub fn run(
    cache: &Cache,
    source: &Source,
    name: &str,
    resource_type: &str,
    json: bool,
) -> Result<u8, String> {
    let Some(sku) = cache.get(name, resource_type) else {
        eprintln!("no {resource_type} sku named '{name}'");
        return Ok(EXIT_NOT_FOUND);
    };

    if json {
        println!("{}", json_pretty(sku.raw())?);
        return Ok(EXIT_SUCCESS);
    }

    let raw = sku.raw();
    println!("name:          {}", sku.name());
    println!("resource_type: {}", sku.resource_type());
    println!("tier:          {}", raw.tier.as_deref().unwrap_or("-"));
    println!("size:          {}", raw.size.as_deref().unwrap_or("-"));
    println!("family:        {}", raw.family.as_deref().unwrap_or("-"));
    println!("location:      {}", sku.location());
    if let Some(location) = source.location() {
        let status = if sku.is_restricted(location) {
            colorize_availability("restricted")
        } else {
            match sku.availability_zones(location) {
                None => colorize_availability("unavailable"),
                Some(zones) if zones.is_empty() => colorize_availability("regional"),
                Some(zones) => colorize_availability(&zones.into_iter().collect::<Vec<_>>().join(",")),
            }
        };
        println!("zones:         {status} ({location})");
    }
    println!("capabilities:");
    for capability in sku.capabilities() {
        println!(
            "  {:<36} {}",
            capability.name,
            capability.value.unwrap_or("")
        );
    }
    Ok(EXIT_SUCCESS)
}
