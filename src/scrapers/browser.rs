use crate::models::SessionProfile;
use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Launch knobs that do not vary between session attempts.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Chrome binary to run; `None` lets headless_chrome locate one.
    pub binary: Option<PathBuf>,
    pub headless: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            binary: None,
            headless: true,
        }
    }
}

/// One headless Chrome process with a single tab.
///
/// Sessions are built from an immutable profile and owned exclusively by the
/// component that opened them; the Chrome process is torn down when the value
/// is dropped, on every exit path.
pub struct BrowserSession {
    tab: Arc<Tab>,
    _browser: Browser,
}

impl BrowserSession {
    /// Launch Chrome configured for the given profile.
    pub fn open(profile: &SessionProfile, options: &BrowserOptions) -> Result<Self> {
        debug!("Launching headless Chrome ({})...", profile);

        let user_agent_arg = format!("--user-agent={}", profile.user_agent);
        let proxy_address = profile.proxy.as_ref().map(|candidate| candidate.address());

        let mut launch = LaunchOptions::default_builder();
        launch
            .headless(options.headless)
            .args(vec![OsStr::new(user_agent_arg.as_str())]);
        if let Some(binary) = &options.binary {
            launch.path(Some(binary.clone()));
        }
        if let Some(address) = proxy_address.as_deref() {
            // A single proxy switch covers both HTTP and SSL traffic.
            launch.proxy_server(Some(address));
        }

        let browser = Browser::new(
            launch
                .build()
                .context("Failed to build launch options")?,
        )
        .context("Failed to launch Chrome browser")?;

        let tab = browser.new_tab().context("Failed to open a browser tab")?;

        Ok(Self {
            tab,
            _browser: browser,
        })
    }

    /// Navigate and block until the page has loaded.
    pub fn goto(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to navigate to {url}"))?;
        self.tab
            .wait_until_navigated()
            .with_context(|| format!("Page did not finish loading: {url}"))?;
        Ok(())
    }

    /// The full HTML of the current page.
    pub fn html(&self) -> Result<String> {
        self.tab.get_content().context("Failed to read page HTML")
    }

    /// The current page title.
    pub fn title(&self) -> Result<String> {
        self.tab.get_title().context("Failed to read page title")
    }

    /// Poll for an element and return its text, giving up after `timeout`.
    pub fn wait_for_text(&self, selector: &str, timeout: Duration) -> Result<String> {
        let element = self
            .tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .with_context(|| format!("Timed out waiting for element {selector}"))?;
        element
            .get_inner_text()
            .with_context(|| format!("Failed to read text of element {selector}"))
    }

    /// Run a page-side script for its effect, ignoring the result value.
    pub fn run_script(&self, script: &str) -> Result<()> {
        self.tab
            .evaluate(script, false)
            .context("Failed to evaluate script in page")?;
        Ok(())
    }
}
