use crate::models::{ListingRecord, NOT_AVAILABLE};
use crate::scrapers::traits::UrlResolver;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Listing card container on yad2 result pages.
pub const LISTING_CONTAINER_SELECTOR: &str = "div.item-data-content_itemDataContentBox__gvAC2";

const PRICE_SELECTOR: &str = r#"span[data-testid="price"]"#;
const ADDRESS_SELECTOR: &str =
    ".item-data-content_itemInfoLine__AeoPP.item-data-content_first__oi7xM";
const DETAILS_SELECTOR: &str =
    ".item-data-content_itemInfoLine__AeoPP:not(.item-data-content_first__oi7xM)";
const TITLE_SELECTOR: &str = ".item-data-content_heading__tphH4";

/// Delimiter between rooms, floor and size in the details line.
const DETAILS_DELIMITER: char = '•';

/// Default [`UrlResolver`]: walk upward from the card through at most
/// `max_depth` levels (the card itself counts as the first), taking the
/// first href found either on the current element or on a descendant link.
pub struct AncestorLinkResolver {
    max_depth: usize,
    link_selector: Selector,
}

impl Default for AncestorLinkResolver {
    fn default() -> Self {
        Self {
            max_depth: 5,
            link_selector: Selector::parse("a[href]").unwrap(),
        }
    }
}

impl UrlResolver for AncestorLinkResolver {
    fn resolve(&self, element: &ElementRef<'_>) -> Option<String> {
        let mut current = Some(*element);
        for _ in 0..self.max_depth {
            let el = current?;
            if el.value().name() == "a" {
                if let Some(href) = el.value().attr("href") {
                    return Some(href.to_string());
                }
            }
            if let Some(link) = el.select(&self.link_selector).next() {
                if let Some(href) = link.value().attr("href") {
                    return Some(href.to_string());
                }
            }
            current = el.parent().and_then(ElementRef::wrap);
        }
        None
    }
}

/// Maps listing cards in a captured page to [`ListingRecord`]s.
///
/// Every lookup degrades to the "N/A" sentinel, so one malformed card never
/// discards the rest of the page.
pub struct ListingExtractor {
    container: Selector,
    price: Selector,
    address: Selector,
    details: Selector,
    title: Selector,
    resolver: Box<dyn UrlResolver>,
}

impl ListingExtractor {
    pub fn new() -> Self {
        Self::with_resolver(Box::new(AncestorLinkResolver::default()))
    }

    pub fn with_resolver(resolver: Box<dyn UrlResolver>) -> Self {
        Self {
            container: Selector::parse(LISTING_CONTAINER_SELECTOR).unwrap(),
            price: Selector::parse(PRICE_SELECTOR).unwrap(),
            address: Selector::parse(ADDRESS_SELECTOR).unwrap(),
            details: Selector::parse(DETAILS_SELECTOR).unwrap(),
            title: Selector::parse(TITLE_SELECTOR).unwrap(),
            resolver,
        }
    }

    /// Extract one record per listing card found in `html`. Relative hrefs
    /// are resolved against `page_url`.
    pub fn extract(&self, html: &str, page_url: &Url) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);
        let mut records = Vec::new();

        for element in document.select(&self.container) {
            let record = self.extract_card(&element, page_url);
            debug!("Extracted card: {:?}", record.title);
            records.push(record);
        }

        records
    }

    fn extract_card(&self, element: &ElementRef<'_>, page_url: &Url) -> ListingRecord {
        let details_line = selected_text(element, &self.details);
        let (rooms, floor, size) = match &details_line {
            Some(line) => split_details_line(line),
            None => (
                NOT_AVAILABLE.to_string(),
                NOT_AVAILABLE.to_string(),
                NOT_AVAILABLE.to_string(),
            ),
        };

        let url = self
            .resolver
            .resolve(element)
            .and_then(|href| absolute_url(page_url, &href))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        ListingRecord {
            title: text_or_na(element, &self.title),
            price: text_or_na(element, &self.price),
            address: text_or_na(element, &self.address),
            rooms,
            floor,
            size,
            url,
        }
    }
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a "rooms • floor • size" line, trimming each segment and assigning
/// positionally. Segments beyond the third are dropped; missing or empty
/// segments stay at the sentinel.
pub fn split_details_line(line: &str) -> (String, String, String) {
    let parts: Vec<&str> = line.split(DETAILS_DELIMITER).map(str::trim).collect();
    let pick = |idx: usize| {
        parts
            .get(idx)
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    (pick(0), pick(1), pick(2))
}

fn selected_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn text_or_na(element: &ElementRef<'_>, selector: &Selector) -> String {
    selected_text(element, selector).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn absolute_url(page_url: &Url, href: &str) -> Option<String> {
    match Url::parse(href) {
        Ok(url) => Some(String::from(url)),
        Err(_) => page_url.join(href).ok().map(String::from),
    }
}
