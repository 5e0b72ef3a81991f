pub mod source;
pub mod validator;

/// Upper bound on proxy candidates considered in one run, both when parsing
/// the listing table and when rotating through attempts.
pub const MAX_CANDIDATES: usize = 79;

pub use source::{CandidateSource, ProxyListScraper};
pub use validator::{BrowserProbe, ProxyProbe, ProxyValidator, Validation};
