use crate::models::ListingRecord;
use anyhow::Result;
use async_trait::async_trait;
use scraper::ElementRef;

/// Common trait for all listing scrapers
/// This allows easy addition of new sources beyond yad2 in the future
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Run a full scrape and return the accumulated records
    async fn scrape(&self) -> Result<Vec<ListingRecord>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}

/// Strategy for resolving a listing card element to its detail-page link.
///
/// The walk is tied to one site's markup, so alternate layouts can plug in
/// their own resolver instead of patching the extractor.
pub trait UrlResolver: Send + Sync {
    /// Return the raw href for the card, or None if no link was found.
    fn resolve(&self, element: &ElementRef<'_>) -> Option<String>;
}
