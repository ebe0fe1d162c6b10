pub mod error;
pub mod fetcher;
pub mod response;

pub use error::ScanError;
pub use fetcher::{BROWSER_USER_AGENT, CHROME_USER_AGENT, Fetcher, FetcherConfig};
pub use response::FetchResponse;
