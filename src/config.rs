use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the settings file, next to the binary.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Everything the caller supplies for one run.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// The Funda search page to scan for listings.
    pub search_url: String,
    /// Whether to hunt for a working proxy before scanning.
    #[serde(default = "default_use_proxy")]
    pub use_proxy: bool,
    /// Flat file recording every listing URL already notified.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Log file, truncated at startup.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub browser: BrowserSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSettings {
    /// Bot token issued by BotFather.
    pub token: String,
    /// Chat that receives one message per new listing.
    pub chat_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// Chrome binary to launch; `None` lets the launcher find one on PATH.
    #[serde(default)]
    pub binary: Option<PathBuf>,
    #[serde(default = "default_headless")]
    pub headless: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            binary: None,
            headless: true,
        }
    }
}

fn default_use_proxy() -> bool {
    true
}

fn default_store_path() -> PathBuf {
    PathBuf::from("db.csv")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("log.log")
}

fn default_headless() -> bool {
    true
}

impl Settings {
    /// Read and parse the settings file.
    ///
    /// There is no fallback configuration: without a bot token the watcher has
    /// nowhere to send listings, so a missing or malformed file is a startup
    /// error.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Settings = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_settings_parse() {
        let raw = r#"
search_url = "https://www.funda.nl/koop/amsterdam/"
use_proxy = false
store_path = "seen.txt"
log_path = "watch.log"

[telegram]
token = "123:abc"
chat_id = "-100200300"

[browser]
binary = "/usr/bin/chromium"
headless = false
"#;
        let settings: Settings = toml::from_str(raw).unwrap();
        assert_eq!(settings.search_url, "https://www.funda.nl/koop/amsterdam/");
        assert!(!settings.use_proxy);
        assert_eq!(settings.store_path, PathBuf::from("seen.txt"));
        assert_eq!(settings.log_path, PathBuf::from("watch.log"));
        assert_eq!(settings.telegram.token, "123:abc");
        assert_eq!(settings.telegram.chat_id, "-100200300");
        assert_eq!(
            settings.browser.binary,
            Some(PathBuf::from("/usr/bin/chromium"))
        );
        assert!(!settings.browser.headless);
    }

    #[test]
    fn minimal_settings_fall_back_to_defaults() {
        let raw = r#"
search_url = "https://www.funda.nl/koop/utrecht/"

[telegram]
token = "123:abc"
chat_id = "42"
"#;
        let settings: Settings = toml::from_str(raw).unwrap();
        assert!(settings.use_proxy);
        assert_eq!(settings.store_path, PathBuf::from("db.csv"));
        assert_eq!(settings.log_path, PathBuf::from("log.log"));
        assert_eq!(settings.browser.binary, None);
        assert!(settings.browser.headless);
    }

    #[test]
    fn missing_token_is_an_error() {
        let raw = r#"
search_url = "https://www.funda.nl/koop/utrecht/"

[telegram]
chat_id = "42"
"#;
        assert!(toml::from_str::<Settings>(raw).is_err());
    }
}
