use super::{json_pretty, Source, EXIT_SUCCESS};
use skucat_core::Cache;

/// `zones`: union of deployable virtual machine zones in the configured
/// location, optionally for a single size.
pub fn run(cache: &Cache, source: &Source, size: Option<&str>, json: bool) -> Result<u8, String> {
    if source.location().is_none() {
        return Err("zones requires --location".to_owned());
    }
    let zones = match size {
        Some(size) => cache.virtual_machine_availability_zones_for_size(size),
        None => cache.virtual_machine_availability_zones(),
    };
    if json {
        println!("{}", json_pretty(&zones)?);
    } else if zones.is_empty() {
        println!("no availability zones");
    } else {
        for zone in &zones {
            println!("{zone}");
        }
    }
    Ok(EXIT_SUCCESS)
}
