use crate::error::{Result, ScanError};
use crate::response::FetchResponse;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Identifies as a desktop browser; some sites refuse obvious bots.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Full Chrome identity used by the quick URL checker.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub timeout: Duration,
    /// Applied after every attempt, successful or not.
    pub request_delay: Duration,
    /// `None` disables redirect following.
    pub max_redirects: Option<usize>,
    pub accept_invalid_certs: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            request_delay: Duration::from_millis(500),
            max_redirects: Some(10),
            accept_invalid_certs: false,
        }
    }
}

impl FetcherConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: Option<usize>) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

/// Sequential HTTP prober. No retries: one failed attempt is final for a URL.
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let redirect = match config.max_redirects {
            Some(hops) => reqwest::redirect::Policy::limited(hops),
            None => reqwest::redirect::Policy::none(),
        };

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .cookie_store(true)
            .redirect(redirect)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ScanError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// GET `url` and read the whole body, then wait out the request delay.
    pub async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let outcome = self.get(url, None).await;
        self.pause().await;
        outcome
    }

    /// Like [`Fetcher::fetch`] but stops reading after `limit` bytes.
    pub async fn fetch_prefix(&self, url: &str, limit: usize) -> Result<FetchResponse> {
        let outcome = self.get(url, Some(limit)).await;
        self.pause().await;
        outcome
    }

    async fn get(&self, url: &str, limit: Option<usize>) -> Result<FetchResponse> {
        let parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
        debug!("GET {}", parsed);

        let mut response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| ScanError::from_reqwest(&e))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = header_value(&response, CONTENT_TYPE.as_str());
        let location = header_value(&response, LOCATION.as_str());

        let body = match limit {
            None => response.text().await.map_err(|e| ScanError::from_reqwest(&e))?,
            Some(limit) => {
                let mut bytes: Vec<u8> = Vec::with_capacity(limit);
                while bytes.len() < limit {
                    match response.chunk().await.map_err(|e| ScanError::from_reqwest(&e))? {
                        Some(chunk) => bytes.extend_from_slice(&chunk),
                        None => break,
                    }
                }
                bytes.truncate(limit);
                String::from_utf8_lossy(&bytes).into_owned()
            }
        };

        debug!("{} -> {}", final_url, status_code);

        Ok(FetchResponse {
            url: final_url,
            status_code,
            content_type,
            location,
            body,
        })
    }

    async fn pause(&self) {
        if !self.config.request_delay.is_zero() {
            tokio::time::sleep(self.config.request_delay).await;
        }
    }
}

fn header_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
