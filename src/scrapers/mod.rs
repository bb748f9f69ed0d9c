pub mod captcha;
pub mod extract;
pub mod traits;
pub mod types;
pub mod yad2;

pub use traits::{ListingSource, UrlResolver};
pub use yad2::Yad2BrowserScraper;
