use scraper::{Html, Selector};

/// Token the operator dashboard writes into the signal file once the
/// captcha has been solved in the browser window.
pub const SOLVED_TOKEN: &str = "captcha_solved";

/// Textual markers checked case-insensitively against the page text.
const TEXT_MARKERS: [&str; 4] = ["captcha", "robot", "human verification", "security check"];

/// Structural markers for known block/verification widgets.
const BLOCK_SELECTORS: [&str; 3] = [".security-error", ".captcha", ".recaptcha"];

/// Check a rendered page for captcha or bot-block indicators.
///
/// Read-only: inspects text content and a small set of selectors, never the
/// live page.
pub fn detect_anomaly(html: &str) -> bool {
    let document = Html::parse_document(html);

    let text = document
        .root_element()
        .text()
        .collect::<String>()
        .to_lowercase();
    if TEXT_MARKERS.iter().any(|marker| text.contains(marker)) {
        return true;
    }

    BLOCK_SELECTORS.iter().any(|raw| {
        let selector = Selector::parse(raw).unwrap();
        document.select(&selector).next().is_some()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_captcha_text_in_any_letter_case() {
        let html = "<html><body><p>Please complete the CAPTCHA to continue</p></body></html>";
        assert!(detect_anomaly(html));

        let html = "<html><body><p>are you a RoBoT?</p></body></html>";
        assert!(detect_anomaly(html));
    }

    #[test]
    fn detects_multi_word_markers() {
        let html = "<html><body><h1>Security Check</h1><p>Verify to proceed.</p></body></html>";
        assert!(detect_anomaly(html));

        let html = "<html><body><div>Human verification required</div></body></html>";
        assert!(detect_anomaly(html));
    }

    #[test]
    fn detects_block_widgets_by_selector() {
        let html = r#"<html><body><div class="g-recaptcha recaptcha"></div></body></html>"#;
        assert!(detect_anomaly(html));

        let html = r#"<html><body><div class="security-error">חלה שגיאה</div></body></html>"#;
        assert!(detect_anomaly(html));
    }

    #[test]
    fn ordinary_listing_content_is_clean() {
        let html = r#"<html><body>
            <div class="feed">
                <span data-testid="price">3,100,000 ₪</span>
                <div>4 חדרים • קומה 2 • 80 מ"ר</div>
            </div>
        </body></html>"#;
        assert!(!detect_anomaly(html));
    }
}
