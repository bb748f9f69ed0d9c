use std::path::{Path, PathBuf};

/// Parameters for one scraping run
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Listing search URL to start from
    pub url: String,
    /// Destination CSV path
    pub output_path: PathBuf,
    /// Optional file used to receive signals from the operator dashboard
    pub signal_path: Option<PathBuf>,
    /// Maximum number of result pages to visit
    pub max_pages: u32,
}

impl ScrapeConfig {
    /// Directory for diagnostic screenshots, alongside the output file.
    pub fn artifact_dir(&self) -> PathBuf {
        self.output_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Bookkeeping for the page traversal.
///
/// The page number only ever moves forward, one page per advance.
#[derive(Debug, Clone, Copy)]
pub struct TraversalCursor {
    current_page: u32,
    max_pages: u32,
}

impl TraversalCursor {
    pub fn new(max_pages: u32) -> Self {
        Self {
            current_page: 1,
            max_pages,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn within_limit(&self) -> bool {
        self.current_page <= self.max_pages
    }

    pub fn advance(&mut self) {
        self.current_page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_starts_at_page_one() {
        let cursor = TraversalCursor::new(3);
        assert_eq!(cursor.current_page(), 1);
        assert!(cursor.within_limit());
    }

    #[test]
    fn single_page_limit_allows_exactly_one_pass() {
        let mut cursor = TraversalCursor::new(1);
        assert!(cursor.within_limit());
        cursor.advance();
        assert!(!cursor.within_limit());
    }

    #[test]
    fn advance_is_monotonic() {
        let mut cursor = TraversalCursor::new(5);
        for expected in 1..=5 {
            assert_eq!(cursor.current_page(), expected);
            assert!(cursor.within_limit());
            cursor.advance();
        }
        assert!(!cursor.within_limit());
    }

    #[test]
    fn artifact_dir_falls_back_to_current_dir() {
        let config = ScrapeConfig {
            url: "https://example.com".to_string(),
            output_path: PathBuf::from("listings.csv"),
            signal_path: None,
            max_pages: 3,
        };
        assert_eq!(config.artifact_dir(), PathBuf::from("."));

        let config = ScrapeConfig {
            output_path: PathBuf::from("exports/listings.csv"),
            ..config
        };
        assert_eq!(config.artifact_dir(), PathBuf::from("exports"));
    }
}
