//! Error taxonomy for the scan pipeline
//!
//! Only configuration-time variants ever reach `main`. Transport failures
//! during discovery and probing are converted into values at the call site
//! and logged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// Seed URL is malformed or uses an unsupported scheme
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    /// Network failure while fetching the seed for parameter discovery
    #[error("discovery request to {url} failed: {source}")]
    DiscoveryTransport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Network failure during one resolution step
    #[error("probe request to {url} failed: {source}")]
    ProbeTransport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Results sink could not be opened or written
    #[error("results sink {path}: {source}")]
    OutputSink {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no valid seed URLs to scan")]
    NoSeeds,
}
