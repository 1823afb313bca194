mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::check::Requirement;
use commands::{Source, EXIT_FAILURE};
use skucat_core::{CancelToken, VIRTUAL_MACHINES};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "skucat",
    version,
    about = "Query compute SKU capabilities and availability zones"
)]
struct Cli {
    /// Read the catalog from a listing file instead of the remote endpoint.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Remote endpoint config file (default: ~/.config/skucat/arm.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subscription ID (overrides config file).
    #[arg(long, global = true)]
    subscription: Option<String>,

    /// Management endpoint base URL (overrides config file).
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Bearer token for the remote endpoint (overrides config file).
    #[arg(long, global = true)]
    token: Option<String>,

    /// Restrict the catalog to one location (e.g. eastus).
    #[arg(short, long, global = true)]
    location: Option<String>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every SKU in the catalog.
    List {
        /// Only SKUs of this resource type (e.g. virtualMachines, disks).
        #[arg(long)]
        resource_type: Option<String>,
    },
    /// List virtual machine sizes.
    Vms,
    /// Show one SKU.
    Get {
        /// SKU name, case-insensitive.
        name: String,
        #[arg(long, default_value = VIRTUAL_MACHINES)]
        resource_type: String,
    },
    /// Print deployable virtual machine availability zones in --location.
    Zones {
        /// Only this VM size.
        #[arg(long)]
        size: Option<String>,
    },
    /// Check a SKU against capability requirements.
    Check {
        /// SKU name, case-insensitive.
        name: String,
        #[arg(long, default_value = VIRTUAL_MACHINES)]
        resource_type: String,
        /// Boolean capability that must be supported (repeatable).
        #[arg(long = "capability", value_name = "NAME")]
        capabilities: Vec<String>,
        /// Numeric capability minimum, NAME=VALUE (repeatable).
        #[arg(long = "min", value_name = "NAME=VALUE")]
        minimums: Vec<String>,
    },
    /// Print the catalog as a listing document (usable with --snapshot).
    Fetch,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SKUCAT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: Cli) -> Result<u8, String> {
    if let Commands::Completions { shell } = cli.command {
        return commands::completions::run::<Cli>(shell);
    }

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    let _ = ctrlc::set_handler(move || {
        if handler_token.is_cancelled() {
            std::process::exit(i32::from(EXIT_FAILURE));
        }
        handler_token.cancel();
        eprintln!("\ninterrupt received, abandoning listing...");
    });

    let source = Source {
        snapshot: cli.snapshot,
        config: cli.config,
        subscription: cli.subscription,
        endpoint: cli.endpoint,
        token: cli.token,
        location: cli.location,
    };
    let json = cli.json;
    let cache = source.open(&cancel)?;

    match cli.command {
        Commands::List { resource_type } => {
            commands::list::run(&cache, &source, resource_type.as_deref(), json)
        }
        Commands::Vms => commands::list::run_vms(&cache, &source, json),
        Commands::Get {
            name,
            resource_type,
        } => commands::get::run(&cache, &source, &name, &resource_type, json),
        Commands::Zones { size } => commands::zones::run(&cache, &source, size.as_deref(), json),
        Commands::Check {
            name,
            resource_type,
            capabilities,
            minimums,
        } => {
            let mut requirements: Vec<Requirement> =
                capabilities.into_iter().map(Requirement::Supported).collect();
            for arg in &minimums {
                requirements.push(Requirement::parse_minimum(arg)?);
            }
            commands::check::run(&cache, &source, &name, &resource_type, &requirements, json)
        }
        Commands::Fetch => commands::fetch::run(&cache),
        Commands::Completions { .. } => Ok(commands::EXIT_SUCCESS),
    }
}
