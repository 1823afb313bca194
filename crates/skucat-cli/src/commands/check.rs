use super::{json_pretty, Source, EXIT_NOT_FOUND, EXIT_SUCCESS};
use serde::Serialize;
use skucat_core::{Cache, Sku};

/// One requirement a SKU must meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Boolean capability reported as `True`.
    Supported(String),
    /// Integer capability at least this large.
    Minimum { name: String, value: i64 },
}

impl Requirement {
    /// Parse a `--min` argument of the form `NAME=VALUE`.
    pub fn parse_minimum(arg: &str) -> Result<Self, String> {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))?;
        let value = value
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid minimum for '{name}': {e}"))?;
        Ok(Self::Minimum {
            name: name.trim().to_owned(),
            value,
        })
    }

    fn describe(&self) -> String {
        match self {
            Self::Supported(name) => name.clone(),
            Self::Minimum { name, value } => format!("{name} >= {value}"),
        }
    }

    fn evaluate(&self, sku: &Sku) -> Result<bool, String> {
        match self {
            Self::Supported(name) => Ok(sku.has_capability(name)),
            Self::Minimum { name, value } => sku
                .has_capability_with_capacity(name, *value)
                .map_err(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Outcome {
    requirement: String,
    satisfied: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<bool>,
    checks: Vec<Outcome>,
    satisfied: bool,
}

/// `check`: exit 0 when every requirement holds (and, with `--location`, the
/// SKU is available there), 2 otherwise.
pub fn run(
    cache: &Cache,
    source: &Source,
    name: &str,
    resource_type: &str,
    requirements: &[Requirement],
    json: bool,
) -> Result<u8, String> {
    let Some(sku) = cache.get(name, resource_type) else {
        eprintln!("no {resource_type} sku named '{name}'");
        return Ok(EXIT_NOT_FOUND);
    };

    let checks = requirements
        .iter()
        .map(|req| {
            Ok(Outcome {
                requirement: req.describe(),
                satisfied: req.evaluate(&sku)?,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;
    let available = source.location().map(|l| sku.is_available(l));
    let satisfied = checks.iter().all(|c| c.satisfied) && available.unwrap_or(true);

    let report = Report {
        name: sku.name().to_owned(),
        available,
        checks,
        satisfied,
    };

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        if let (Some(location), Some(available)) = (source.location(), report.available) {
            let mark = if available { "ok" } else { "FAIL" };
            println!("{mark:<5} available in {location}");
        }
        for outcome in &report.checks {
            let mark = if outcome.satisfied { "ok" } else { "FAIL" };
            println!("{mark:<5} {}", outcome.requirement);
        }
    }

    Ok(if report.satisfied {
        EXIT_SUCCESS
    } else {
        EXIT_NOT_FOUND
    })
}
