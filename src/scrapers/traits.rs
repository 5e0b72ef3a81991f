use anyhow::Result;
use async_trait::async_trait;

/// Common trait for listing-page sources
/// This allows easy addition of new portals (Pararius, Jaap, etc) in the future
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the listing URLs currently visible on the search page
    async fn fetch_listing_urls(&self) -> Result<Vec<String>>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
