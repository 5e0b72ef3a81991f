mod config;
mod models;
mod notify;
mod proxy;
mod scrapers;
mod store;
mod watcher;

use crate::config::{Settings, DEFAULT_CONFIG_PATH};
use crate::models::SessionProfile;
use crate::notify::TelegramNotifier;
use crate::proxy::{BrowserProbe, ProxyListScraper, ProxyValidator, Validation};
use crate::scrapers::{BrowserOptions, FundaScraper};
use crate::store::SeenUrlStore;
use crate::watcher::FundaWatcher;
use anyhow::Context;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load(Path::new(DEFAULT_CONFIG_PATH))?;
    init_logging(&settings.log_path)?;

    info!("🏠 Funda Watch");
    info!("==============");
    info!("");

    let browser_options = BrowserOptions {
        binary: settings.browser.binary.clone(),
        headless: settings.browser.headless,
    };

    let profile = if settings.use_proxy {
        acquire_profile(&browser_options)?
    } else {
        info!("Proxy hunt disabled, browsing directly");
        SessionProfile::direct()
    };
    info!("Scanning as: {profile}");

    let scraper = FundaScraper::new(settings.search_url, profile, browser_options);
    let notifier = TelegramNotifier::new(settings.telegram.token)?;
    let store = SeenUrlStore::new(settings.store_path);

    let watcher = FundaWatcher::new(scraper, notifier, store, settings.telegram.chat_id);
    let report = watcher.run().await?;

    info!(
        "✅ {} listings on the page, {} new",
        report.scanned, report.fresh
    );

    Ok(())
}

/// Console plus file logging; the log file is truncated on every start.
fn init_logging(log_path: &Path) -> anyhow::Result<()> {
    let log_file = File::create(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();

    Ok(())
}

/// Hunt for a proxy that can reach Funda without being turned away.
///
/// When every candidate is rejected the run continues anyway, on the last
/// configuration tried (or directly if the list was empty), so the pass is
/// still made and its outcome lands in the log.
fn acquire_profile(options: &BrowserOptions) -> anyhow::Result<SessionProfile> {
    let validator = ProxyValidator::new(
        ProxyListScraper::new(options.clone()),
        BrowserProbe::new(options.clone()),
    );

    Ok(match validator.find_working_profile()? {
        Validation::Working(profile) => profile,
        Validation::Exhausted(last) => last.unwrap_or_else(SessionProfile::direct),
    })
}
