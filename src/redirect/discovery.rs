//! Parameter discovery for a single seed URL
//!
//! Combines names already present in the seed with names mined from the seed
//! page and well-known redirect names the live target reacts to. Transport
//! failures only reduce what is found; discovery never fails.

use crate::core::scope::Scope;
use crate::error::ScanError;
use crate::http::client::HttpClient;
use crate::payload::injector::inject_query_param;
use crate::redirect::html::extract_param_names;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Common redirect parameter names, most frequent first
pub const COMMON_REDIRECT_PARAMS: &[&str] = &[
    "redirect", "redirect_uri", "redirect_url", "redirecturi", "redirecturl",
    "redir", "redirurl", "return", "returnurl", "return_url", "returnto",
    "return_to", "destination", "next", "checkout_url", "continue", "continueurl",
    "url", "goto", "go", "exit", "target", "link", "out", "to", "view", "path",
    "Navigation", "jump", "jumpurl", "returnUri", "retURL", "forward", "dest",
    "dir", "callback", "oauth_callback", "uri", "location", "back", "backurl",
    "from_url", "go_to", "login_url", "loginto", "logout", "logouturl",
    "referrer", "ref", "referer", "page", "page_url", "address", "origin",
    "site", "source", "u", "endpoint", "success_url", "cancel_url",
    "docurl", "document", "load", "window", "data", "channel", "successUrl",
    "cancelUrl", "failUrl", "return_path", "backto",
];

/// How many of the common names are probed against the live target
pub const LIVE_PROBE_LIMIT: usize = 15;

/// Destination injected while probing; its host must show up in `Location`
pub const CANARY_DESTINATION: &str = "https://example.com";
const CANARY_HOST: &str = "example.com";

/// Path segment names treated as REST-style redirect parameters
const PATH_PARAM_NAMES: &[&str] = &["redirect", "return", "next", "url", "goto", "continue"];

/// `/<key>/<value>` pairs, consumed two segments at a time
const PATH_PAIR_PATTERN: &str = r"/([^/]+)/([^/]+)";

#[derive(Debug, Clone)]
pub struct ParameterDiscovery {
    live_probe_limit: usize,
    /// Same-boundary redirects followed while fetching the seed page
    max_redirects: u32,
}

impl ParameterDiscovery {
    pub fn new() -> Self {
        Self {
            live_probe_limit: LIVE_PROBE_LIMIT,
            max_redirects: 5,
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Parameter names of the seed itself: query keys, then REST-style path keys
    pub fn existing_params(url: &Url) -> Vec<String> {
        let mut params: Vec<String> = url.query_pairs().map(|(k, _)| k.to_string()).collect();

        if let Ok(re) = Regex::new(PATH_PAIR_PATTERN) {
            for caps in re.captures_iter(url.path()) {
                if let Some(key) = caps.get(1) {
                    if PATH_PARAM_NAMES.contains(&key.as_str().to_lowercase().as_str()) {
                        params.push(key.as_str().to_string());
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        params.retain(|p| seen.insert(p.clone()));
        params
    }

    /// Full parameter set for a seed; `live` enables the network steps
    pub async fn discover(&self, client: &HttpClient, url: &Url, live: bool) -> Vec<String> {
        let existing = Self::existing_params(url);
        if !live {
            return existing;
        }

        let mut found = match self.mine_page(client, url).await {
            Ok(names) => names,
            Err(e) => {
                tracing::debug!("{}", e);
                Vec::new()
            }
        };
        found.extend(self.probe_common_params(client, url, &existing).await);

        let mut seen: HashSet<String> = existing.iter().cloned().collect();
        let discovered: Vec<String> = found
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .collect();

        if !discovered.is_empty() {
            tracing::debug!(
                "Discovered potential redirect parameters on {}: {}",
                url,
                discovered.join(", ")
            );
        }

        existing.into_iter().chain(discovered).collect()
    }

    /// Redirect-like names referenced by the seed page, reached through
    /// same-boundary redirects within the budget
    async fn mine_page(&self, client: &HttpClient, url: &Url) -> Result<Vec<String>, ScanError> {
        let scope = Scope::new(url);
        let mut current = url.clone();
        let mut remaining = self.max_redirects;

        loop {
            let resp = client
                .get(current.clone())
                .await
                .map_err(|source| ScanError::DiscoveryTransport {
                    url: current.to_string(),
                    source,
                })?;

            if resp.is_redirect() && remaining > 0 {
                let next = resp.location().and_then(|loc| current.join(loc).ok());

                if let Some(next) = next.filter(|n| scope.is_in_scope(n)) {
                    tracing::debug!("Seed page {} redirects to {}", current, next);
                    remaining -= 1;
                    current = next;
                    continue;
                }
            }

            if resp.status != 200 {
                return Ok(Vec::new());
            }

            return Ok(extract_param_names(&resp.body_text()));
        }
    }

    /// Well-known names whose canary value comes back in a redirect
    async fn probe_common_params(
        &self,
        client: &HttpClient,
        url: &Url,
        existing: &[String],
    ) -> Vec<String> {
        let mut live = Vec::new();

        for name in COMMON_REDIRECT_PARAMS.iter().take(self.live_probe_limit) {
            if existing.iter().any(|e| e == name) {
                continue;
            }

            let probe_url = inject_query_param(url, name, CANARY_DESTINATION);

            match client.get(probe_url.clone()).await {
                Ok(resp) => {
                    let reflected = resp.is_redirect()
                        && resp.location().map_or(false, |loc| loc.contains(CANARY_HOST));
                    if reflected {
                        tracing::debug!("Parameter '{}' redirects to the canary", name);
                        live.push(name.to_string());
                    }
                }
                Err(e) => {
                    tracing::debug!("Parameter probe {} failed: {}", probe_url, e);
                }
            }
        }

        live
    }
}

impl Default for ParameterDiscovery {
    fn default() -> Self {
        Self::new()
    }
}
