//! Seed URL validation and list normalisation

use crate::error::ScanError;
use url::Url;

/// An absolute http/https URL with a host, accepted for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUrl(Url);

impl SeedUrl {
    pub fn parse(raw: &str) -> Result<Self, ScanError> {
        let invalid = |reason: &str| ScanError::InvalidSeedUrl {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("unsupported scheme"));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host"));
        }

        Ok(Self(url))
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl std::fmt::Display for SeedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Prefix list entries that carry no scheme with `http://`
pub fn with_default_scheme(entry: &str) -> String {
    if entry.starts_with("http://") || entry.starts_with("https://") {
        entry.to_string()
    } else {
        format!("http://{}", entry)
    }
}
