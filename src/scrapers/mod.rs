pub mod browser;
pub mod funda;
pub mod traits;

pub use browser::{BrowserOptions, BrowserSession};
pub use funda::FundaScraper;
pub use traits::ListingSource;
