use crate::models::ListingRecord;
use crate::scrapers::captcha::{self, SOLVED_TOKEN};
use crate::scrapers::extract::{ListingExtractor, LISTING_CONTAINER_SELECTOR};
use crate::scrapers::traits::ListingSource;
use crate::scrapers::types::{ScrapeConfig, TraversalCursor};
use crate::signal::SignalChannel;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Next-page control on yad2, aria-labeled in Hebrew ("go to next page").
const NEXT_PAGE_SELECTOR: &str = r#"a[aria-label="עבור לעמוד הבא"]"#;

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);
const LISTING_WAIT_TIMEOUT: Duration = Duration::from_secs(10);
/// Grace period for redirects after the operator solves a captcha.
const POST_SOLVE_DELAY: Duration = Duration::from_secs(3);

/// Interactive browser scraper for yad2 listing pages.
///
/// Chrome runs headful so the operator can solve captchas in the window;
/// the run suspends on the signal channel until the dashboard confirms.
pub struct Yad2BrowserScraper {
    browser: Browser,
    config: ScrapeConfig,
    signal: SignalChannel,
    extractor: ListingExtractor,
}

impl Yad2BrowserScraper {
    /// Launch Chrome and prepare a scraping session for `config`.
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        info!("Launching Chrome in interactive mode...");

        let options = LaunchOptions::default_builder()
            .headless(false)
            .sandbox(false)
            .window_size(Some((1920, 1080)))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let signal = SignalChannel::new(config.signal_path.clone());

        Ok(Self {
            browser,
            config,
            signal,
            extractor: ListingExtractor::new(),
        })
    }

    /// Drive the traversal: load the search page, then extract page by page
    /// until the next-page control disappears or the page limit is reached.
    fn run(&self) -> Result<Vec<ListingRecord>> {
        let page_url = Url::parse(&self.config.url)
            .with_context(|| format!("Invalid listing URL: {}", self.config.url))?;

        let tab = self.browser.new_tab()?;
        tab.set_default_timeout(NAVIGATION_TIMEOUT);
        tab.set_user_agent(USER_AGENT, None, None)
            .context("Failed to set user agent")?;

        info!("Navigating to {}...", self.config.url);
        tab.navigate_to(&self.config.url)
            .context("Failed to navigate to listing URL")?;
        tab.wait_until_navigated()
            .context("Initial page load failed")?;
        info!("Page loaded successfully");

        self.capture_screenshot(&tab, "page_loaded.png")?;
        self.handle_captcha(&tab)?;

        let mut records = Vec::new();
        let mut cursor = TraversalCursor::new(self.config.max_pages);
        let mut has_next_page = true;

        while has_next_page && cursor.within_limit() {
            info!("Scraping page {}...", cursor.current_page());

            if let Err(e) =
                tab.wait_for_element_with_custom_timeout(LISTING_CONTAINER_SELECTOR, LISTING_WAIT_TIMEOUT)
            {
                warn!("No listings found on page {}: {}", cursor.current_page(), e);
            }

            let page_records = self.extractor.extract(&self.page_html(&tab)?, &page_url);
            info!(
                "Extracted {} listings from page {}",
                page_records.len(),
                cursor.current_page()
            );
            records.extend(page_records);

            has_next_page = self.go_to_next_page(&tab);
            if has_next_page {
                cursor.advance();
                if let Err(e) = tab.wait_until_navigated() {
                    warn!("Error waiting for navigation: {}", e);
                }
                self.handle_captcha(&tab)?;
            }
        }

        Ok(records)
    }

    /// Resolve a captcha interstitial with the operator in the loop.
    ///
    /// Blocked pages wait on the signal channel, re-check after a short
    /// grace period, and loop again if still blocked. There is deliberately
    /// no retry cap: the run waits as long as the operator needs.
    fn handle_captcha(&self, tab: &Tab) -> Result<()> {
        if !captcha::detect_anomaly(&self.page_html(tab)?) {
            debug!("No captcha detected, proceeding with scraping");
            return Ok(());
        }

        loop {
            warn!("CAPTCHA detected! Please solve it in the browser window.");
            self.capture_screenshot(tab, "captcha.png")?;

            self.signal.wait_for(SOLVED_TOKEN);
            thread::sleep(POST_SOLVE_DELAY);

            if captcha::detect_anomaly(&self.page_html(tab)?) {
                warn!("Captcha still detected. Trying again...");
                continue;
            }

            info!("Captcha solved successfully!");
            self.capture_screenshot(tab, "after_captcha.png")?;
            return Ok(());
        }
    }

    /// Click through to the next page if its control is present.
    fn go_to_next_page(&self, tab: &Tab) -> bool {
        debug!("Checking for next page...");
        match tab.find_element(NEXT_PAGE_SELECTOR) {
            Ok(next_button) => {
                info!("Next page found, clicking...");
                if let Err(e) = next_button.click() {
                    warn!("Error clicking next page button: {}", e);
                }
                true
            }
            Err(_) => {
                info!("No next page found");
                false
            }
        }
    }

    fn page_html(&self, tab: &Tab) -> Result<String> {
        let result = tab
            .evaluate("document.documentElement.outerHTML", false)
            .context("Failed to capture page HTML")?;

        let html = result
            .value
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default();
        if html.is_empty() {
            warn!("Captured empty page HTML");
        }
        Ok(html)
    }

    fn capture_screenshot(&self, tab: &Tab, name: &str) -> Result<()> {
        let dir = self.config.artifact_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create artifact directory {}", dir.display()))?;

        let data = tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .context("Failed to capture screenshot")?;

        let path = dir.join(name);
        std::fs::write(&path, data)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved screenshot to {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl ListingSource for Yad2BrowserScraper {
    async fn scrape(&self) -> Result<Vec<ListingRecord>> {
        self.run()
    }

    fn source_name(&self) -> &'static str {
        "Yad2"
    }
}
