//! Shelfdiff main entry point
//!
//! Command-line interface for the shelfdiff catalog scraper and price
//! reconciler.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use shelfdiff::config::{load_config_with_hash, Config, RetailerConfig};
use shelfdiff::reconcile;
use shelfdiff::render::WebDriverRenderer;
use shelfdiff::scrape::collect_bundles;
use shelfdiff::store::{self, JsonlSink};
use shelfdiff::PaginationController;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

/// Shelfdiff: a storefront catalog scraper and price reconciler
///
/// Shelfdiff walks paginated retailer listings through a WebDriver session,
/// persists per-page price snapshots, and reconciles retailer catalogs
/// against a reference catalog.
#[derive(Parser, Debug)]
#[command(name = "shelfdiff")]
#[command(version = "1.0.0")]
#[command(about = "Storefront catalog scraper and price reconciler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run pagination scrapes for configured retailers
    Scrape {
        /// Retailers to scrape (default: all configured)
        #[arg(short, long = "retailer")]
        retailers: Vec<String>,

        /// Which configured listing to walk
        #[arg(short, long, value_enum, default_value_t = Operation::Full)]
        operation: Operation,
    },

    /// Collect the bundle gallery
    Bundles,

    /// Reconcile retailer snapshots against the reference catalog
    Reconcile {
        /// Override the configured reference catalog path
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Snapshot page files to compare (default: latest run per retailer)
        #[arg(short, long = "snapshot")]
        snapshots: Vec<PathBuf>,
    },

    /// Validate config and show what would be scraped without scraping
    Plan,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Operation {
    Full,
    Sale,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::Full => "full",
            Operation::Sale => "sale",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Commands::Scrape {
            retailers,
            operation,
        } => handle_scrape(config, retailers, operation).await,
        Commands::Bundles => handle_bundles(&config).await,
        Commands::Reconcile {
            reference,
            snapshots,
        } => handle_reconcile(&config, reference, snapshots),
        Commands::Plan => handle_plan(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelfdiff=info,warn"),
            1 => EnvFilter::new("shelfdiff=debug,info"),
            2 => EnvFilter::new("shelfdiff=trace,debug"),
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

/// Installs a Ctrl-C handler that requests a stop at the next page boundary.
fn install_interrupt_flag() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after in-flight pages");
            flag.store(true, Ordering::Relaxed);
        }
    });
    cancel
}

/// Handles the `scrape` subcommand: one pagination run per retailer, all
/// retailers concurrently with independent browser sessions.
async fn handle_scrape(
    config: Config,
    retailers: Vec<String>,
    operation: Operation,
) -> anyhow::Result<()> {
    let selected: Vec<RetailerConfig> = if retailers.is_empty() {
        config.retailer.clone()
    } else {
        retailers
            .iter()
            .map(|name| config.retailer(name).map(RetailerConfig::clone))
            .collect::<shelfdiff::Result<_>>()?
    };
    if selected.is_empty() {
        anyhow::bail!("no retailers configured");
    }

    let cancel = install_interrupt_flag();
    let delay = config.settle_delay();
    let webdriver_url = config.scraper.webdriver_url.clone();
    let snapshot_dir = PathBuf::from(&config.output.snapshot_dir);

    let mut tasks = JoinSet::new();
    for retailer in selected {
        let plan = retailer.listing_plan(operation.as_str(), delay)?;
        let webdriver_url = webdriver_url.clone();
        let snapshot_dir = snapshot_dir.clone();
        let cancel = cancel.clone();
        let name = retailer.name.clone();

        tasks.spawn(async move {
            let result = async {
                let renderer = WebDriverRenderer::connect(&webdriver_url).await?;
                let mut sink =
                    JsonlSink::create(&snapshot_dir, &plan.retailer, operation.as_str())?;
                let run = PaginationController::new(&renderer, &mut sink, plan)
                    .with_cancel_flag(cancel)
                    .run()
                    .await;
                if let Err(e) = renderer.quit().await {
                    tracing::warn!("Failed to close browser session: {}", e);
                }
                run
            }
            .await;
            (name, result)
        });
    }

    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        let (name, result) = joined?;
        match result {
            Ok(snapshot) => {
                println!(
                    "✓ {}: {} items captured",
                    snapshot.retailer,
                    snapshot.entries.len()
                );
            }
            Err(e) => {
                tracing::error!("Scrape of {} failed: {}", name, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} retailer run(s) failed");
    }
    Ok(())
}

/// Handles the `bundles` subcommand.
async fn handle_bundles(config: &Config) -> anyhow::Result<()> {
    let plan = config.gallery_plan()?;

    let renderer = WebDriverRenderer::connect(&config.scraper.webdriver_url).await?;
    let result = collect_bundles(&renderer, &plan).await;
    if let Err(e) = renderer.quit().await {
        tracing::warn!("Failed to close browser session: {}", e);
    }
    let bundles = result?;

    let path = Path::new(&config.output.bundles_path);
    store::write_document(path, &bundles)?;

    println!("✓ {} bundles written to: {}", bundles.len(), path.display());
    for bundle in &bundles {
        println!("  - {} ({} games)", bundle.name, bundle.games.len());
    }
    Ok(())
}

/// Handles the `reconcile` subcommand.
fn handle_reconcile(
    config: &Config,
    reference: Option<PathBuf>,
    snapshots: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let reference_path =
        reference.unwrap_or_else(|| PathBuf::from(&config.reconcile.reference_path));
    let reference = reconcile::load_reference(&reference_path)?;

    let paths = if snapshots.is_empty() {
        latest_snapshots(Path::new(&config.output.snapshot_dir))?
    } else {
        snapshots
    };
    if paths.is_empty() {
        anyhow::bail!(
            "no snapshots found under {}",
            config.output.snapshot_dir
        );
    }

    let mut labeled = Vec::new();
    for path in &paths {
        labeled.push(reconcile::load_snapshot(path)?);
    }

    let report = reconcile::reconcile(&reference, &labeled);
    let report_path = Path::new(&config.output.report_path);
    store::write_document(report_path, &report)?;

    reconcile::print_report(&report);
    println!("✓ Report written to: {}", report_path.display());
    Ok(())
}

/// Finds the most recent page file in each retailer directory.
fn latest_snapshots(snapshot_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut latest = Vec::new();
    let entries = std::fs::read_dir(snapshot_dir)
        .with_context(|| format!("cannot read snapshot dir {}", snapshot_dir.display()))?;
    for entry in entries {
        let dir = entry?.path();
        if !dir.is_dir() {
            continue;
        }
        let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
        for file in std::fs::read_dir(&dir)? {
            let path = file?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
                continue;
            }
            let modified = path.metadata()?.modified()?;
            if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
                newest = Some((modified, path));
            }
        }
        if let Some((_, path)) = newest {
            latest.push(path);
        }
    }
    latest.sort();
    Ok(latest)
}

/// Handles the `plan` subcommand: validates config and shows what would run.
fn handle_plan(config: &Config) -> anyhow::Result<()> {
    println!("=== Shelfdiff Plan ===\n");

    println!("Scraper Configuration:");
    println!("  WebDriver: {}", config.scraper.webdriver_url);
    println!(
        "  Settle delay: {}ms (+0..{}ms jitter)",
        config.scraper.settle_delay_ms, config.scraper.settle_jitter_ms
    );

    println!("\nOutput:");
    println!("  Snapshots: {}", config.output.snapshot_dir);
    println!("  Report: {}", config.output.report_path);
    println!("  Bundles: {}", config.output.bundles_path);

    println!("\nReference catalog: {}", config.reconcile.reference_path);

    println!("\nRetailers ({}):", config.retailer.len());
    for retailer in &config.retailer {
        println!("  - {} ({:?}, {:?})", retailer.name, retailer.shape, retailer.termination);
        for (operation, url) in &retailer.operations {
            println!("    * {}: {}", operation, url);
        }
    }

    match &config.bundles {
        Some(bundles) => println!("\nBundle gallery: {}", bundles.url),
        None => println!("\nBundle gallery: not configured"),
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
