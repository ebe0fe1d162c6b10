use thiserror::Error;

/// Per-candidate failures. Their display strings are what ends up in
/// `FeedCandidate::error`; none of them stops a domain or a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("{0}")]
    Transport(String),

    #[error("Invalid XML")]
    InvalidXml,

    #[error("HTTP {0}")]
    NonSuccessStatus(u16),
}

/// Failures that take out a whole domain. Logged and skipped by the run driver.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    #[error("Scanner error: {0}")]
    Scanner(#[from] feedscout_scanner::ScanError),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
