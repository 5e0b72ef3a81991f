use crate::models::SessionProfile;
use crate::scrapers::browser::{BrowserOptions, BrowserSession};
use crate::scrapers::traits::ListingSource;
use anyhow::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

pub const FUNDA_BASE_URL: &str = "https://www.funda.nl";

/// Marker element of one result row on the search page.
const RESULT_ROW_SELECTOR: &str = ".search-result-header";
/// The anchor inside a result row that carries the listing link.
const RESULT_LINK_SELECTOR: &str = r#"a[data-object-url-tracking="resultlist"]"#;

/// Fetches the current listing links from one Funda search page.
///
/// Opens a fresh session per fetch from the validated profile; only the first
/// loaded page of results is considered, there is no pagination.
pub struct FundaScraper {
    search_url: String,
    profile: SessionProfile,
    options: BrowserOptions,
}

impl FundaScraper {
    pub fn new(
        search_url: impl Into<String>,
        profile: SessionProfile,
        options: BrowserOptions,
    ) -> Self {
        Self {
            search_url: search_url.into(),
            profile,
            options,
        }
    }
}

#[async_trait]
impl ListingSource for FundaScraper {
    async fn fetch_listing_urls(&self) -> Result<Vec<String>> {
        info!("Opening Funda search page {}...", self.search_url);
        let session = BrowserSession::open(&self.profile, &self.options)?;
        session.goto(&self.search_url)?;

        // Give the result list a moment to render
        thread::sleep(Duration::from_secs(2));

        let html = session.html()?;
        drop(session);

        let urls = parse_listing_urls(&html);
        info!("Found {} listing links on the page", urls.len());

        Ok(urls)
    }

    fn source_name(&self) -> &'static str {
        "Funda"
    }
}

/// Extract listing URLs from search-page HTML, in page order.
///
/// Rows without the tracked anchor are skipped; an absent result marker yields
/// an empty list rather than an error. Duplicate occurrences are passed
/// through untouched; deciding what to do with them is the caller's job.
pub fn parse_listing_urls(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse(RESULT_ROW_SELECTOR).unwrap();
    let link_selector = Selector::parse(RESULT_LINK_SELECTOR).unwrap();

    let mut urls = Vec::new();
    for row in document.select(&row_selector) {
        let Some(anchor) = row.select(&link_selector).next() else {
            debug!("Result row without a listing link, skipping");
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            debug!("Listing link without an href, skipping");
            continue;
        };
        urls.push(absolute_url(href));
    }
    urls
}

/// Funda serves row links relative to the site root.
fn absolute_url(href: &str) -> String {
    if href.starts_with('/') {
        format!("{FUNDA_BASE_URL}{href}")
    } else {
        href.to_string()
    }
}
