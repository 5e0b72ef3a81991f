use rand::seq::SliceRandom;
use std::fmt;

/// The fixed pool of browser signatures a session can identify as.
pub const USER_AGENTS: [&str; 8] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.113 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.101 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.113 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.113 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/603.3.8 (KHTML, like Gecko) Version/10.1.2 Safari/603.3.8",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.101 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.101 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; WOW64; rv:55.0) Gecko/20100101 Firefox/55.0",
];

/// An untested proxy host/port pair scraped from a public listing page.
///
/// Candidates live for a single run: they are produced in page order and
/// discarded once a working one has been found (or all have been rejected).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCandidate {
    pub host: String,
    pub port: u16,
}

impl ProxyCandidate {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The `host:port` form Chrome expects for its proxy switch.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ProxyCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address())
    }
}

/// Immutable description of how one browser session should present itself.
///
/// A fresh profile is built for every session attempt, so proxy rotation can
/// never alias state between attempts. The proxy, when set, carries both HTTP
/// and SSL traffic.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionProfile {
    pub user_agent: String,
    pub proxy: Option<ProxyCandidate>,
}

impl SessionProfile {
    /// An unproxied profile with a freshly randomized user agent.
    pub fn direct() -> Self {
        Self {
            user_agent: random_user_agent(),
            proxy: None,
        }
    }

    /// A profile that routes all traffic through the given candidate.
    pub fn through(candidate: &ProxyCandidate) -> Self {
        Self {
            user_agent: random_user_agent(),
            proxy: Some(candidate.clone()),
        }
    }
}

impl fmt::Display for SessionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.proxy {
            Some(proxy) => write!(f, "proxied via {}", proxy),
            None => write!(f, "direct"),
        }
    }
}

/// Pick one signature uniformly from the pool.
fn random_user_agent() -> String {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
        .to_string()
}
