//! listing-diff command line entry point

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use listing_diff_lib::application::{render_text, ComparisonError, ComparisonService, ComparisonView};
use listing_diff_lib::domain::{ComparisonPolicy, PayloadShape};
use listing_diff_lib::infrastructure::{logging, AppConfig, ConfigManager, HttpClient};

/// Compare product listing pages side by side.
///
/// The first URL is the reference listing; every other URL is compared against it.
#[derive(Parser, Debug)]
#[command(name = "listing-diff")]
#[command(version)]
#[command(about = "Compare e-commerce product listing pages side by side")]
struct Cli {
    /// Listing URLs to compare (2 to 6; blank entries are ignored).
    #[arg(required = true)]
    urls: Vec<String>,

    /// Path to configuration file.
    #[arg(short, long, env = "LISTING_DIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Payload shape the listing URLs return.
    #[arg(long)]
    shape: Option<ShapeArg>,

    /// How uniqueness is decided for comparison sources.
    #[arg(long)]
    policy: Option<PolicyArg>,

    /// Print the comparison as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShapeArg {
    Json,
    Html,
}

impl From<ShapeArg> for PayloadShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Json => PayloadShape::Json,
            ShapeArg::Html => PayloadShape::Html,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    ReferenceAnchored,
    Symmetric,
}

impl From<PolicyArg> for ComparisonPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::ReferenceAnchored => ComparisonPolicy::ReferenceAnchored,
            PolicyArg::Symmetric => ComparisonPolicy::Symmetric,
        }
    }
}

impl Cli {
    /// Command line flags win over the config file
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(shape) = self.shape {
            config.extraction.shape = shape.into();
        }
        if let Some(policy) = self.policy {
            config.comparison.policy = policy.into();
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

async fn load_config(cli: &Cli) -> Result<AppConfig> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config().await?;
    cli.apply_overrides(&mut config);
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli).await?;
    logging::init_logging_with_config(&config.logging).context("Failed to initialize logging")?;
    logging::log_system_info();

    let fetcher = Arc::new(HttpClient::new(config.fetch.clone())?);
    let service = ComparisonService::from_config(fetcher, &config)?;
    info!(
        "Comparing {} inputs as {} payloads",
        cli.urls.len(),
        config.extraction.shape
    );

    let report = service.run(cli.urls.as_slice()).await?;
    let view = ComparisonView::build(&report);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("Failed to serialize comparison")?
        );
    } else {
        print!("{}", render_text(&view));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Run failures already carry their cause in the message
            if e.downcast_ref::<ComparisonError>().is_some() {
                eprintln!("Error: {e}");
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
