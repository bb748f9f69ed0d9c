mod export;
mod models;
mod scrapers;
mod signal;

use std::path::PathBuf;

use clap::Parser;
use models::ScrapeStatus;
use scrapers::types::ScrapeConfig;
use scrapers::{ListingSource, Yad2BrowserScraper};
use tracing::{error, info, warn, Level};
use tracing_subscriber;

const DEFAULT_URL: &str =
    "https://www.yad2.co.il/realestate/forsale?propertyGroup=apartments&property=1&rooms=4-4&price=-1-4220000&page=2";

/// Interactive yad2 listing scraper with human-in-the-loop captcha handling
#[derive(Parser, Debug)]
#[command(name = "listing-scout", version)]
struct Args {
    /// Listing search URL to scrape
    #[arg(default_value = DEFAULT_URL)]
    url: String,

    /// Output CSV path
    #[arg(default_value = "exports/yad2_listings.csv")]
    output: PathBuf,

    /// Signal file the dashboard writes to once a captcha is solved
    signal_file: Option<PathBuf>,

    /// Maximum number of result pages to scrape
    #[arg(default_value_t = 3)]
    max_pages: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();

    info!("🏠 Listing Scout - Interactive Yad2 Scraper");
    info!("==========================================");
    info!("");

    let status = match run(args).await {
        Ok(status) => status,
        Err(e) => {
            error!("Error during scraping: {:#}", e);
            println!("{}", serde_json::to_string(&ScrapeStatus::failure(e.to_string()))?);
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string(&status)?);
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<ScrapeStatus> {
    let config = ScrapeConfig {
        url: args.url,
        output_path: args.output,
        signal_path: args.signal_file,
        max_pages: args.max_pages,
    };
    let output_path = config.output_path.clone();
    let max_pages = config.max_pages;

    // Create browser scraper; the browser window stays visible so the
    // operator can solve captchas when asked to.
    let scraper = Yad2BrowserScraper::new(config)?;

    info!(
        "Starting {} scrape, up to {} pages...",
        scraper.source_name(),
        max_pages
    );
    let records = scraper.scrape().await?;

    if records.is_empty() {
        warn!("No listings found");
        return Ok(ScrapeStatus::failure("No listings found"));
    }

    export::write_csv(&records, &output_path).await?;
    info!(
        "✅ Successfully scraped {} listings to {}",
        records.len(),
        output_path.display()
    );

    Ok(ScrapeStatus::success(
        output_path.display().to_string(),
        records.len(),
    ))
}
