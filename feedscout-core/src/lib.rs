pub mod analyze;
pub mod check;
pub mod classify;
pub mod config;
pub mod discover;
pub mod error;
pub mod model;
pub mod report;
pub mod sitemap;
pub mod xml;

pub use config::{AnalyzerConfig, DiscoveryConfig, Vocabulary};
pub use discover::{DiscoveryProgressCallback, DiscoveryRun, FeedDiscovery, ProbePhase};
pub use error::{DiscoveryError, ProbeError};
pub use model::{FeedCandidate, FeedType};

pub fn print_banner() {
    println!(
        r#"
  ┌─┐┌─┐┌─┐┌┬┐┌─┐┌─┐┌─┐┬ ┬┌┬┐
  ├┤ ├┤ ├┤  ││└─┐│  │ ││ │ │
  └  └─┘└─┘─┴┘└─┘└─┘└─┘└─┘ ┴
  XML listing feed discovery  v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
