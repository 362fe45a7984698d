//! Hopper core engine
//!
//! Validates seeds, owns the shared client and reporter, and fans seed scans
//! out over a bounded worker pool.

use crate::core::context::Context;
use crate::core::seed::SeedUrl;
use crate::error::ScanError;
use crate::http::client::HttpClient;
use crate::redirect::RedirectScanner;
use crate::reporting::json;
use crate::reporting::reporter::Reporter;
use crate::reporting::sink::ResultsSink;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome of a run, shown by `main`
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub seeds: usize,
    pub findings: usize,
    pub elapsed: Duration,
    pub interrupted: bool,
}

pub struct Engine {
    ctx: Context,
}

impl Engine {
    pub fn new(ctx: Context) -> anyhow::Result<Self> {
        Ok(Self { ctx })
    }

    /// Run until every seed is scanned or Ctrl+C is received
    pub async fn run(self) -> anyhow::Result<RunSummary> {
        let shutdown = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::warn!("Received Ctrl+C, finishing in-flight requests"),
                Err(e) => {
                    tracing::warn!("Cannot listen for Ctrl+C: {}", e);
                    std::future::pending::<()>().await
                }
            }
        };

        self.run_until(shutdown).await
    }

    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        let ctx = self.ctx;

        let seeds = validate_seeds(&ctx.seeds)?;

        // -------------------------------------------------
        // Shared state: client, reporter, scanner
        // -------------------------------------------------
        let sink = match ctx.output_file {
            Some(ref path) => Some(ResultsSink::create(path)?),
            None => None,
        };

        let client = Arc::new(HttpClient::new(&ctx.client)?);
        let reporter = Arc::new(Reporter::new(sink));
        let scanner = Arc::new(RedirectScanner::new(
            client,
            ctx.catalog,
            ctx.redirect,
            reporter.clone(),
        ));

        tracing::info!(
            "Scanning {} URL(s) with {} payload(s), {} worker(s)",
            seeds.len(),
            scanner.payload_count(),
            ctx.threads
        );

        // -------------------------------------------------
        // Dispatch
        // -------------------------------------------------
        let semaphore = Arc::new(Semaphore::new(ctx.threads));
        let mut tasks = JoinSet::new();
        let mut interrupted = false;
        let mut dispatched = 0;

        tokio::pin!(shutdown);

        for seed in seeds {
            let permit = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    interrupted = true;
                    scanner.cancel();
                    break;
                }
                permit = semaphore.clone().acquire_owned() => permit?,
            };

            let scanner = scanner.clone();
            dispatched += 1;

            tasks.spawn(async move {
                let _permit = permit;
                scanner.scan(&seed).await
            });
        }

        // -------------------------------------------------
        // Drain
        // -------------------------------------------------
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown, if !interrupted => {
                    interrupted = true;
                    scanner.cancel();
                }
                joined = tasks.join_next() => match joined {
                    Some(Ok(_)) => {}
                    Some(Err(e)) => tracing::error!("Seed scan task failed: {}", e),
                    None => break,
                },
            }
        }

        reporter.finish();

        if let Some(ref path) = ctx.json_file {
            match json::render(&reporter.findings()) {
                Ok(report) => match std::fs::write(path, report) {
                    Ok(()) => tracing::info!("JSON report written to {}", path),
                    Err(e) => tracing::error!("Failed to write JSON report {}: {}", path, e),
                },
                Err(e) => tracing::error!("Failed to render JSON report: {}", e),
            }
        }

        Ok(RunSummary {
            seeds: dispatched,
            findings: reporter.count(),
            elapsed: started.elapsed(),
            interrupted,
        })
    }
}

/// Keep the seeds that parse; no valid seed at all aborts the run
fn validate_seeds(raw: &[String]) -> Result<Vec<SeedUrl>, ScanError> {
    let mut seeds = Vec::new();

    for entry in raw {
        match SeedUrl::parse(entry) {
            Ok(seed) => seeds.push(seed),
            Err(e) => tracing::warn!("Skipping {}", e),
        }
    }

    if seeds.is_empty() {
        return Err(ScanError::NoSeeds);
    }

    Ok(seeds)
}
