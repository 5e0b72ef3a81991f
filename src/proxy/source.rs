use crate::models::{ProxyCandidate, SessionProfile};
use crate::proxy::MAX_CANDIDATES;
use crate::scrapers::browser::{BrowserOptions, BrowserSession};
use anyhow::Result;
use scraper::{Html, Selector};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Public listing of free SSL-capable proxies.
pub const PROXY_LIST_URL: &str = "https://www.sslproxies.org/";

/// Nudge the listing table's page-size control to 80 rows.
const PAGE_LENGTH_SCRIPT: &str = r#"
    const control = document.querySelector('select[name="proxylisttable_length"]');
    if (control) {
        control.value = '80';
        control.dispatchEvent(new Event('change', { bubbles: true }));
    }
"#;

/// Where proxy candidates come from.
pub trait CandidateSource {
    fn fetch_candidates(&self) -> Result<Vec<ProxyCandidate>>;
}

/// Scrapes the proxy listing page through its own short-lived session.
pub struct ProxyListScraper {
    options: BrowserOptions,
}

impl ProxyListScraper {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }
}

impl CandidateSource for ProxyListScraper {
    fn fetch_candidates(&self) -> Result<Vec<ProxyCandidate>> {
        info!("Fetching proxy candidates from {}...", PROXY_LIST_URL);

        let session = BrowserSession::open(&SessionProfile::direct(), &self.options)?;
        session.goto(PROXY_LIST_URL)?;

        // Let the table widget initialize before asking it to grow
        thread::sleep(Duration::from_secs(2));
        if let Err(error) = session.run_script(PAGE_LENGTH_SCRIPT) {
            debug!("Could not grow the proxy table, using the default page: {error:#}");
        }
        thread::sleep(Duration::from_secs(1));

        let html = session.html()?;
        drop(session);

        let candidates = parse_candidates(&html);
        info!("Got {} proxy candidates", candidates.len());

        Ok(candidates)
    }
}

/// Pull host/port pairs out of the listing table, preserving page order.
///
/// A row contributes its first two whitespace-separated text tokens; rows
/// without both tokens, or with a port that is not a number, are skipped.
/// At most 79 rows are considered.
pub fn parse_candidates(html: &str) -> Vec<ProxyCandidate> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("#proxylisttable tbody tr").unwrap();
    let row_selector_alt = Selector::parse("table tbody tr").unwrap();

    let mut rows: Vec<_> = document.select(&row_selector).collect();
    if rows.is_empty() {
        rows = document.select(&row_selector_alt).collect();
    }

    let mut candidates = Vec::new();
    for row in rows.iter().take(MAX_CANDIDATES) {
        let text = row.text().collect::<Vec<_>>().join(" ");
        let mut tokens = text.split_whitespace();
        let (Some(host), Some(port)) = (tokens.next(), tokens.next()) else {
            debug!("Skipping proxy row without host and port: {:?}", text.trim());
            continue;
        };
        let Ok(port) = port.parse::<u16>() else {
            debug!("Skipping proxy row with unparsable port: {:?}", port);
            continue;
        };
        candidates.push(ProxyCandidate::new(host, port));
    }
    candidates
}
