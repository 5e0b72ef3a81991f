use crate::notify::Notifier;
use crate::scrapers::ListingSource;
use crate::store::SeenUrlStore;
use anyhow::Result;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Tally of a single watch pass.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    /// Listings present on the result page.
    pub scanned: usize,
    /// Listings that were not in the store before this pass.
    pub fresh: usize,
}

/// One pass over the result page: every listing not yet in the store gets a
/// notification and is recorded so later passes stay quiet about it.
pub struct FundaWatcher<S, N> {
    source: S,
    notifier: N,
    store: SeenUrlStore,
    chat_id: String,
}

impl<S: ListingSource, N: Notifier> FundaWatcher<S, N> {
    pub fn new(source: S, notifier: N, store: SeenUrlStore, chat_id: impl Into<String>) -> Self {
        Self {
            source,
            notifier,
            store,
            chat_id: chat_id.into(),
        }
    }

    /// The store is read once, up front. Listings discovered during the pass
    /// are added to the in-memory set as they are recorded, so a URL that
    /// shows up twice on the same page is only announced once.
    ///
    /// Notification delivery is fire-and-forget: a failed send is logged and
    /// the listing is recorded anyway, so it will not be re-announced on the
    /// next pass.
    pub async fn run(&self) -> Result<RunReport> {
        let mut seen: HashSet<String> = self.store.load()?.into_iter().collect();
        info!(
            "Loaded {} previously seen listings, scanning {}",
            seen.len(),
            self.source.source_name()
        );

        let urls = self.source.fetch_listing_urls().await?;
        let scanned = urls.len();

        let mut fresh = 0;
        for url in urls {
            if seen.contains(&url) {
                debug!("Already seen {url}");
                continue;
            }

            info!("New listing: {url}");
            if let Err(error) = self.notifier.notify(&self.chat_id, &url).await {
                warn!("Could not deliver notification for {url}: {error:#}");
            }
            self.store.append(&url)?;
            seen.insert(url);
            fresh += 1;
        }

        Ok(RunReport { scanned, fresh })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    struct FixedListings(Vec<&'static str>);

    #[async_trait]
    impl ListingSource for FixedListings {
        async fn fetch_listing_urls(&self) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|u| u.to_string()).collect())
        }

        fn source_name(&self) -> &'static str {
            "Fixed"
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        sent: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, _chat_id: &str, url: &str) -> Result<()> {
            self.sent.lock().unwrap().push(url.to_string());
            if self.fail {
                anyhow::bail!("telegram said no")
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn only_unseen_listings_are_announced_and_recorded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.csv");
        let store = SeenUrlStore::new(&path);
        store.append("https://funda.nl/a").unwrap();

        let notifier = RecordingNotifier::default();
        let watcher = FundaWatcher::new(
            FixedListings(vec!["https://funda.nl/a", "https://funda.nl/b"]),
            notifier.clone(),
            SeenUrlStore::new(&path),
            "42",
        );

        let report = watcher.run().await.unwrap();
        assert_eq!(report.scanned, 2);
        assert_eq!(report.fresh, 1);

        assert_eq!(
            *notifier.sent.lock().unwrap(),
            vec!["https://funda.nl/b".to_string()]
        );
        assert_eq!(
            store.load().unwrap(),
            vec![
                "https://funda.nl/a".to_string(),
                "https://funda.nl/b".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_on_one_page_is_announced_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.csv");

        let notifier = RecordingNotifier::default();
        let watcher = FundaWatcher::new(
            FixedListings(vec![
                "https://funda.nl/x",
                "https://funda.nl/x",
                "https://funda.nl/y",
            ]),
            notifier.clone(),
            SeenUrlStore::new(&path),
            "42",
        );

        let report = watcher.run().await.unwrap();
        assert_eq!(report.scanned, 3);
        assert_eq!(report.fresh, 2);

        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
        assert_eq!(
            SeenUrlStore::new(&path).load().unwrap(),
            vec![
                "https://funda.nl/x".to_string(),
                "https://funda.nl/y".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn failed_notification_still_records_the_listing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.csv");

        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        let watcher = FundaWatcher::new(
            FixedListings(vec!["https://funda.nl/a"]),
            notifier.clone(),
            SeenUrlStore::new(&path),
            "42",
        );

        let report = watcher.run().await.unwrap();
        assert_eq!(report.fresh, 1);
        assert_eq!(
            SeenUrlStore::new(&path).load().unwrap(),
            vec!["https://funda.nl/a".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_page_leaves_the_store_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.csv");
        SeenUrlStore::new(&path).append("https://funda.nl/a").unwrap();

        let notifier = RecordingNotifier::default();
        let watcher = FundaWatcher::new(
            FixedListings(vec![]),
            notifier.clone(),
            SeenUrlStore::new(&path),
            "42",
        );

        let report = watcher.run().await.unwrap();
        assert_eq!(report.scanned, 0);
        assert_eq!(report.fresh, 0);
        assert!(notifier.sent.lock().unwrap().is_empty());
        assert_eq!(
            SeenUrlStore::new(&path).load().unwrap(),
            vec!["https://funda.nl/a".to_string()]
        );
    }
}
