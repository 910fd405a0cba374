use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::Router;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use or_journey::config::OrJourneyConfig;
use or_journey::OrJourney;
use runtime::{AppConfig, CliArgs};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Name of the timeline module's entry in the `modules` config bag.
const OR_JOURNEY_MODULE: &str = "or_journey";

/// OR Journey Server - read-only timeline of a patient's surgical operations
#[derive(Parser)]
#[command(name = "or-journey-server")]
#[command(about = "OR Journey Server - patient operation timelines over HTTP")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// JSON dataset to serve instead of the built-in one
    #[arg(long, value_name = "PATH")]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration and dataset
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity / dataset)
    config.apply_cli_overrides(&args);
    if let Some(dataset) = &cli.dataset {
        config.set_module_value(
            OR_JOURNEY_MODULE,
            "dataset_path",
            serde_json::Value::String(dataset.to_string_lossy().to_string()),
        )?;
    }

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "OR Journey Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

fn init_module(config: &AppConfig) -> Result<OrJourney> {
    let module_cfg: OrJourneyConfig = config.module_config(OR_JOURNEY_MODULE)?;
    OrJourney::init(&module_cfg).context("Failed to initialize or_journey module")
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");
    let module = init_module(&config)?;

    let ingress = ApiIngress::new(ApiIngressConfig::from_app_config(&config))
        .with_openapi(module.openapi()?);
    let routes = module.register_rest(Router::new())?;

    let shutdown = async {
        if let Err(e) = runtime::wait_for_shutdown().await {
            tracing::error!(error = %e, "Signal handler failed; shutting down");
        }
    };

    ingress.serve(routes, shutdown).await
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    let module = init_module(&config)?;

    println!("Configuration check passed");
    println!("Home dir: {}", config.server.home_dir);
    println!("Dataset: {}", module.summary());

    let issues = module.integrity_issues();
    if issues.is_empty() {
        println!("Integrity: ok");
    } else {
        println!("Integrity: {} issue(s)", issues.len());
        for issue in issues {
            println!("  - {issue}");
        }
    }
    Ok(())
}
