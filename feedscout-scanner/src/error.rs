use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// Network, DNS and timeout failures. A single failed attempt is terminal
    /// for the URL, so the variants are not distinguished beyond the message.
    #[error("{0}")]
    Transport(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}

impl ScanError {
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection failed"
        } else if err.is_redirect() {
            "too many redirects"
        } else if err.is_body() || err.is_decode() {
            "failed to read body"
        } else {
            "request failed"
        };
        ScanError::Transport(format!("{}: {}", kind, err))
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
