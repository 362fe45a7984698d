//! Per-seed scan loop: parameter x payload x encoding

use crate::core::rate_limit::RateLimiter;
use crate::core::seed::SeedUrl;
use crate::http::client::HttpClient;
use crate::payload::catalog::PayloadCatalog;
use crate::redirect::discovery::ParameterDiscovery;
use crate::redirect::resolver::{RedirectResolver, Resolution};
use crate::redirect::RedirectConfig;
use crate::reporting::model::Finding;
use crate::reporting::reporter::Reporter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct RedirectScanner {
    client: Arc<HttpClient>,
    catalog: PayloadCatalog,
    config: RedirectConfig,
    discovery: ParameterDiscovery,
    reporter: Arc<Reporter>,
    cancelled: AtomicBool,
}

impl RedirectScanner {
    pub fn new(
        client: Arc<HttpClient>,
        catalog: PayloadCatalog,
        config: RedirectConfig,
        reporter: Arc<Reporter>,
    ) -> Self {
        let discovery = ParameterDiscovery::new().with_max_redirects(config.max_redirects);

        Self {
            client,
            catalog,
            config,
            discovery,
            reporter,
            cancelled: AtomicBool::new(false),
        }
    }

    /// Stop issuing new probes; the probe in flight completes
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn payload_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Scan one seed and return the number of findings recorded for it
    pub async fn scan(&self, seed: &SeedUrl) -> usize {
        let params = self
            .discovery
            .discover(&self.client, seed.url(), self.config.discover)
            .await;

        if params.is_empty() {
            tracing::info!("No parameters found for {}", seed);
            return 0;
        }

        tracing::info!("Testing {} parameter(s) on {}: {}", params.len(), seed, params.join(", "));

        let resolver = RedirectResolver::new(&self.client, self.config.max_redirects);
        let mut limiter = RateLimiter::new(self.config.delay);
        let mut found = 0;

        for param in &params {
            for payload in self.catalog.payloads() {
                for &technique in &self.config.techniques {
                    if self.is_cancelled() {
                        tracing::debug!("Scan of {} cancelled", seed);
                        return found;
                    }

                    limiter.wait().await;

                    match resolver.resolve(seed.url(), param, payload, technique).await {
                        Resolution::Escaped(escape) => {
                            let finding =
                                Finding::open_redirect(seed, param, payload, technique, escape);
                            self.reporter.record(finding);
                            found += 1;
                        }
                        Resolution::Exhausted { hops } => {
                            tracing::debug!(
                                "Redirect budget exhausted after {} hop(s): {} {}={} ({})",
                                hops,
                                seed,
                                param,
                                payload,
                                technique
                            );
                        }
                        Resolution::NoRedirect | Resolution::TransportError(_) => {}
                    }
                }
            }
        }

        found
    }
}
