//! img-harvest main entry point
//!
//! This is the command-line interface for the img-harvest image scraper.

use anyhow::Context;
use clap::Parser;
use img_harvest::config::{read_config_with_hash, validate, Config};
use img_harvest::crawler::run_scrape;
use img_harvest::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// img-harvest: a sitemap-driven image scraper
///
/// Reads a site's XML sitemap, fetches every listed page concurrently and
/// records the images and meta description found on each one.
#[derive(Parser, Debug)]
#[command(name = "img-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A sitemap-driven image scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Sitemap URL, overrides the configuration
    #[arg(long, value_name = "URL")]
    sitemap: Option<String>,

    /// Maximum concurrent page fetches, overrides the configuration
    #[arg(short, long, value_name = "N")]
    concurrency: Option<u32>,

    /// Per-request timeout in seconds, overrides the configuration
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Report file path, overrides the configuration
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_scrape(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("img_harvest=info,warn"),
            1 => EnvFilter::new("img_harvest=debug,info"),
            2 => EnvFilter::new("img_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (if any), applies CLI overrides and validates
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = read_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(sitemap) = &cli.sitemap {
        config.sitemap.url = sitemap.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.scraper.concurrency = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.scraper.request_timeout_secs = timeout;
    }
    if let Some(output) = &cli.output {
        config.output.report_path = output.clone();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== img-harvest Dry Run ===\n");

    println!("Sitemap:");
    println!("  URL: {}", config.sitemap.url);

    println!("\nScraper Configuration:");
    println!("  Concurrency: {}", config.scraper.concurrency);
    println!(
        "  Request timeout: {}s",
        config.scraper.request_timeout_secs
    );

    println!("\nUser Agents ({}):", config.user_agent.pool.len());
    for agent in &config.user_agent.pool {
        println!("  - {}", agent);
    }

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Starting scrape of {}", config.sitemap.url);

    let stats = run_scrape(config).await.context("Scrape failed")?;

    print_statistics(&stats);
    println!(
        "\nImage extraction completed. Results saved to {}",
        config.output.report_path
    );

    Ok(())
}
