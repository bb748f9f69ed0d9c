use serde::{Deserialize, Serialize};

/// Sentinel used for any field that could not be found on the page
pub const NOT_AVAILABLE: &str = "N/A";

/// One listing card as extracted from a results page.
///
/// Every field is a plain string and falls back to [`NOT_AVAILABLE`] when the
/// page does not carry it. Records are never deduplicated; the same listing
/// appearing on two pages yields two records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingRecord {
    pub title: String,
    pub price: String,
    pub address: String,
    pub rooms: String,
    pub floor: String,
    pub size: String,
    pub url: String,
}

impl Default for ListingRecord {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            title: na(),
            price: na(),
            address: na(),
            rooms: na(),
            floor: na(),
            size: na(),
            url: na(),
        }
    }
}

/// Single-line status object printed to stdout when the run finishes,
/// consumed by the wrapping dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeStatus {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeStatus {
    pub fn success(path: String, count: usize) -> Self {
        Self {
            success: true,
            path: Some(path),
            count: Some(count),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            path: None,
            count: None,
            error: Some(error.into()),
        }
    }
}
