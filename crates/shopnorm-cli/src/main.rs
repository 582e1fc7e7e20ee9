mod batch;
mod report;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use shopnorm_core::AppConfig;
use shopnorm_normalizer::{normalize_product_with, PlatformTable};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopnorm")]
#[command(about = "Normalize scraped e-commerce product payloads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Detect the platform and external id of a product URL
    Detect {
        /// Product page URL
        url: String,
    },
    /// Parse a display price such as "1.499,99 €"
    Price {
        /// Price text as shown on the product page
        text: String,
    },
    /// Normalize one scraped payload into a canonical product
    Normalize {
        /// Product page URL the payload was scraped from
        #[arg(long)]
        url: String,

        /// JSON payload file; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Normalize a JSON Lines file of `{"url": ..., "raw": {...}}` records
    Batch {
        /// JSON Lines input file
        #[arg(long)]
        input: PathBuf,

        /// Payloads normalized in parallel (defaults to SHOPNORM_MAX_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Print the effective per-platform requirements table
    Requirements,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = shopnorm_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let table = Arc::new(load_platform_table(&config)?);
    tracing::debug!(
        env = %config.env,
        rules_path = ?config.rules_path,
        max_concurrency = config.max_concurrency,
        "configuration loaded"
    );

    match cli.command {
        Commands::Detect { url } => {
            let output = report::detect_report(&table, &url);
            println!("{}", report::render_json(&output, config.pretty_json)?);
        }
        Commands::Price { text } => {
            let output = report::price_report(&text);
            println!("{}", report::render_json(&output, config.pretty_json)?);
        }
        Commands::Normalize { url, input } => {
            let raw = report::read_payload(input.as_deref())?;
            let product = normalize_product_with(&table, &url, &raw);
            println!("{}", report::render_json(&product, config.pretty_json)?);
        }
        Commands::Batch { input, concurrency } => {
            let concurrency = concurrency.unwrap_or(config.max_concurrency);
            if concurrency == 0 {
                anyhow::bail!("--concurrency must be at least 1");
            }
            batch::run_batch(Arc::clone(&table), &input, concurrency).await?;
        }
        Commands::Requirements => {
            let output = report::requirements_report(&table);
            println!("{}", report::render_json(&output, config.pretty_json)?);
        }
    }

    Ok(())
}

/// The built-in table, with the configured rules file layered on top.
fn load_platform_table(config: &AppConfig) -> anyhow::Result<PlatformTable> {
    let Some(path) = config.rules_path.as_deref() else {
        return Ok(PlatformTable::builtin().clone());
    };
    let rules = shopnorm_core::load_rules(path)?;
    Ok(PlatformTable::with_overrides(&rules)?)
}
