//! Sitemap crawler main entry point
//!
//! This is the command-line interface: crawl a site once and print its
//! sitemap, or run the sitemap HTTP server.

use clap::{Parser, Subcommand};
use sitemap_crawler::config::{load_config_or_default, Config};
use sitemap_crawler::crawler::HttpFetcherFactory;
use sitemap_crawler::server::{self, AppState};
use sitemap_crawler::{parse_base_url, SitemapFormat, SitemapService};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Same-site web crawler that emits sitemaps
///
/// The crawler stays on the base URL's host and path, skips paths disallowed
/// by robots.txt, and renders every page it finds as plaintext or XML.
#[derive(Parser, Debug)]
#[command(name = "sitemap-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A same-site crawler that emits sitemaps", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and print its sitemap to stdout
    Crawl {
        /// Base URL of the site to crawl
        url: String,

        /// Output format: plaintext or xml
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Run the sitemap HTTP server
    Serve {
        /// Address to listen on (overrides the config file and LISTEN_ADDR)
        #[arg(short, long)]
        listen: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Crawl { url, format } => handle_crawl(config, &url, format.as_deref()).await,
        Command::Serve { listen } => handle_serve(config, listen).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_crawler=info,warn"),
            1 => EnvFilter::new("sitemap_crawler=debug,info"),
            2 => EnvFilter::new("sitemap_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout carries only the sitemap
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn build_service(config: &Config) -> Result<SitemapService, Box<dyn std::error::Error>> {
    let factory = HttpFetcherFactory::new(&config.fetcher)?;
    Ok(SitemapService::new(Arc::new(factory), config.crawler.clone()))
}

/// Cancels `cancel` on Ctrl-C
fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, shutting down");
            cancel.cancel();
        }
    });
}

/// Handles the crawl subcommand
async fn handle_crawl(
    config: Config,
    raw_url: &str,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Validate everything before any network activity
    let format: SitemapFormat = format.unwrap_or(config.sitemap.format.as_str()).parse()?;
    let base_url = parse_base_url(raw_url)?;
    let service = build_service(&config)?;

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    tracing::info!(
        "Crawling {} with {} workers (deadline {}s)",
        base_url,
        config.crawler.workers,
        config.crawler.timeout_secs
    );

    match service.generate_sitemap(&cancel, base_url, format).await {
        Ok(sitemap) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&sitemap)?;
            stdout.flush()?;
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the serve subcommand
async fn handle_serve(
    config: Config,
    listen: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let default_format: SitemapFormat = config.sitemap.format.parse()?;
    let service = build_service(&config)?;
    let listen_addr = listen.unwrap_or_else(|| config.server.listen_addr.clone());

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;

    let shutdown = CancellationToken::new();
    cancel_on_ctrl_c(shutdown.clone());

    let state = AppState::new(Arc::new(service), default_format);
    if let Err(e) = server::serve(listener, state, shutdown).await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
