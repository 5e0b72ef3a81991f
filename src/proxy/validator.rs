use crate::models::SessionProfile;
use crate::proxy::source::CandidateSource;
use crate::proxy::MAX_CANDIDATES;
use crate::scrapers::browser::{BrowserOptions, BrowserSession};
use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

/// Page that echoes back the caller's apparent IP address.
const IP_ECHO_URL: &str = "https://duckduckgo.com/?q=my+ip&t=hb&ia=answer";
/// Element that carries the echoed address once the answer renders.
const IP_ECHO_RESULT_SELECTOR: &str = ".zci__body";
const IP_ECHO_TIMEOUT: Duration = Duration::from_secs(10);

/// Site the proxy ultimately has to reach without being turned away.
const TARGET_URL: &str = "https://www.funda.nl";

/// What a probe observed while driving one candidate profile.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// IP reported by the echo page. Diagnostic only, never a control input.
    pub exit_ip: String,
    /// Title of the target site as served through the candidate.
    pub target_title: String,
}

/// Runs the two-page check against a candidate profile.
pub trait ProxyProbe {
    fn probe(&self, profile: &SessionProfile) -> Result<ProbeReport>;
}

/// Browser-backed probe: the IP-echo page first, then the target site itself.
///
/// The probing session lives inside `probe` and is dropped on every exit
/// path, including errors.
pub struct BrowserProbe {
    options: BrowserOptions,
}

impl BrowserProbe {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }
}

impl ProxyProbe for BrowserProbe {
    fn probe(&self, profile: &SessionProfile) -> Result<ProbeReport> {
        let session = BrowserSession::open(profile, &self.options)?;

        session.goto(IP_ECHO_URL)?;
        let exit_ip = session.wait_for_text(IP_ECHO_RESULT_SELECTOR, IP_ECHO_TIMEOUT)?;

        session.goto(TARGET_URL)?;
        let target_title = session.title()?;

        Ok(ProbeReport {
            exit_ip: exit_ip.trim().to_string(),
            target_title,
        })
    }
}

/// Outcome of the rotation loop.
#[derive(Debug)]
pub enum Validation {
    /// A candidate passed both probes; use this profile for the real fetch.
    Working(SessionProfile),
    /// Every candidate was rejected. The last profile tried is handed back so
    /// the caller can still make its pass, most likely without a usable proxy.
    Exhausted(Option<SessionProfile>),
}

/// Walks the candidate list until one proxy reaches the target site without
/// being turned away, or the list runs out.
///
/// Candidates are fetched lazily, on the first (and only) validation pass.
/// Each attempt gets a fresh profile with a new random user agent. A probe
/// that fails outright (navigation error, echo element never appearing)
/// propagates and ends the run; only a recognizable block page advances the
/// rotation.
pub struct ProxyValidator<S, P> {
    source: S,
    probe: P,
}

impl<S: CandidateSource, P: ProxyProbe> ProxyValidator<S, P> {
    pub fn new(source: S, probe: P) -> Self {
        Self { source, probe }
    }

    pub fn find_working_profile(&self) -> Result<Validation> {
        let candidates = self.source.fetch_candidates()?;

        let mut last_profile = None;
        for (index, candidate) in candidates.iter().take(MAX_CANDIDATES).enumerate() {
            info!("Trying proxy candidate {}: {}", index, candidate);
            let profile = SessionProfile::through(candidate);

            let report = self.probe.probe(&profile)?;
            if title_indicates_block(&report.target_title) {
                info!(
                    "Candidate {} rejected, target title was {:?}",
                    candidate, report.target_title
                );
                last_profile = Some(profile);
                continue;
            }

            info!("Now working from {}", report.exit_ip);
            return Ok(Validation::Working(profile));
        }

        warn!(
            "Exhausted all proxy candidates after at most {} attempts; continuing with the last configuration",
            MAX_CANDIDATES
        );
        Ok(Validation::Exhausted(last_profile))
    }
}

/// A landing title containing `blocked` (exact case) or `error` (any case)
/// means the target recognized the proxy and turned it away.
pub fn title_indicates_block(title: &str) -> bool {
    title.contains("blocked") || title.to_lowercase().contains("error")
}
