//! pdf-scout main entry point
//!
//! This is the command-line interface for the pdf-scout crawler.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use pdf_scout::config::{
    load_config_with_hash, validate, validate_seed_url, Config, CrawlMode,
};
use pdf_scout::crawler::{crawl, ShutdownSignal};
use pdf_scout::output::{
    export_book_csv, export_site_csv, generate_markdown_summary, print_summary,
    write_sitemap_urls,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// pdf-scout: a polite PDF discovery crawler
///
/// pdf-scout walks a website breadth-first from a seed URL while respecting
/// robots.txt and rate limits, and catalogs every PDF it finds to CSV.
#[derive(Parser, Debug)]
#[command(name = "pdf-scout")]
#[command(version)]
#[command(about = "A polite PDF discovery crawler", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site for PDF documents
    Crawl(CrawlArgs),

    /// Validate a configuration file and print the effective settings
    CheckConfig {
        /// Path to TOML configuration file; defaults are checked when omitted
        #[arg(value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct CrawlArgs {
    /// Seed URL
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to fetch
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Maximum link depth from the seed
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Follow links that leave the seed's site
    #[arg(long)]
    follow_external: bool,

    /// CSV file to write
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Delay between requests to one host
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Catalog every PDF (site) or score PDFs as books (book)
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Do not seed the crawl from sitemaps
    #[arg(long)]
    no_sitemap: bool,

    /// File listing every URL found in sitemaps
    #[arg(long, value_name = "FILE")]
    sitemap_output: Option<PathBuf>,

    /// Also write a markdown report
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Leave books scoring below this out of the book catalog
    #[arg(long, value_name = "X")]
    min_confidence: Option<f64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Site,
    Book,
}

impl From<ModeArg> for CrawlMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Site => CrawlMode::Site,
            ModeArg::Book => CrawlMode::Book,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl(args) => handle_crawl(args).await,
        Command::CheckConfig { config } => handle_check_config(config.as_deref()),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pdf_scout=info,warn"),
            1 => EnvFilter::new("pdf_scout=debug,info"),
            2 => EnvFilter::new("pdf_scout=trace,debug"),
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

/// Loads the configuration file, or the defaults when none is given
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Applies command-line overrides on top of the file configuration
fn apply_overrides(config: &mut Config, args: &CrawlArgs) {
    if let Some(max_pages) = args.max_pages {
        config.crawler.max_pages_per_site = max_pages;
    }
    if let Some(max_depth) = args.max_depth {
        config.crawler.max_crawl_depth = max_depth;
    }
    if args.follow_external {
        config.crawler.follow_external_links = true;
    }
    if let Some(delay) = args.delay {
        config.crawler.request_delay_seconds = delay;
    }
    if let Some(mode) = args.mode {
        config.crawler.mode = mode.into();
    }
    if args.no_sitemap {
        config.crawler.use_sitemaps = false;
    }
    if let Some(min_confidence) = args.min_confidence {
        config.output.min_confidence = min_confidence;
    }
    if let Some(output) = &args.output {
        let output = output.display().to_string();
        match config.crawler.mode {
            CrawlMode::Site => config.output.csv_path = output,
            CrawlMode::Book => config.output.book_csv_path = output,
        }
    }
    if let Some(path) = &args.sitemap_output {
        config.output.sitemap_urls_path = path.display().to_string();
    }
    if let Some(path) = &args.summary {
        config.output.summary_path = Some(path.display().to_string());
    }
}

/// Handles `check-config`: validates and prints the effective configuration
fn handle_check_config(path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_configuration(path)?;
    validate(&config).context("Invalid configuration")?;

    println!("=== pdf-scout Configuration ===\n");

    println!("Crawler:");
    println!("  Mode: {:?}", config.crawler.mode);
    println!("  Max pages: {}", config.crawler.max_pages_per_site);
    println!("  Max depth: {}", config.crawler.max_crawl_depth);
    println!("  Request delay: {}s", config.crawler.request_delay_seconds);
    println!("  Max crawl delay: {}s", config.crawler.max_crawl_delay_seconds);
    println!("  Request timeout: {}s", config.crawler.request_timeout_seconds);
    println!("  Follow external links: {}", config.crawler.follow_external_links);
    println!("  Use sitemaps: {}", config.crawler.use_sitemaps);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nPDF:");
    println!(
        "  Size limits: {} KB - {} MB",
        config.pdf.min_pdf_size_kb, config.pdf.max_pdf_size_mb
    );
    println!("  Book size: {} MB", config.pdf.min_book_size_mb);
    println!("  Book patterns: {}", config.pdf.book_patterns.len());
    println!("  Query patterns: {}", config.pdf.pdf_query_patterns.len());
    println!("  Probe PDF links: {}", config.pdf.probe_pdf_links);

    println!("\nOutput:");
    println!("  Site CSV: {}", config.output.csv_path);
    println!("  Book CSV: {}", config.output.book_csv_path);
    println!("  Sitemap URLs: {}", config.output.sitemap_urls_path);
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let mut config = load_configuration(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    validate(&config).context("Invalid configuration")?;
    validate_seed_url(&args.url)?;

    let shutdown = ShutdownSignal::new();
    let handle = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing up");
            handle.trigger();
        }
    });

    let output = config.output.clone();
    let mode = config.crawler.mode;

    let outcome = match crawl(config, &args.url, shutdown).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let records = outcome.store.records();
    match mode {
        CrawlMode::Site => {
            export_site_csv(records, Path::new(&output.csv_path))?;
        }
        CrawlMode::Book => {
            export_book_csv(
                records,
                output.min_confidence,
                Path::new(&output.book_csv_path),
            )?;
        }
    }

    if !outcome.sitemap_urls.is_empty() {
        write_sitemap_urls(&outcome.sitemap_urls, Path::new(&output.sitemap_urls_path))?;
    }

    let summary = outcome
        .store
        .summary(&outcome.stats, output.top_k, outcome.interrupted);
    if let Some(path) = &output.summary_path {
        generate_markdown_summary(&summary, Path::new(path))?;
    }
    print_summary(&summary);

    Ok(())
}
