//! Owned runtime configuration built from the command line

use crate::cli::args::Cli;
use crate::core::seed::with_default_scheme;
use crate::http::client::{ClientConfig, DEFAULT_USER_AGENT};
use crate::payload::catalog::PayloadCatalog;
use crate::payload::loader::read_entries;
use crate::redirect::RedirectConfig;
use anyhow::{bail, Context as _};
use std::collections::HashMap;
use std::time::Duration;

pub struct Context {
    /// Candidate seed URLs, not yet validated
    pub seeds: Vec<String>,
    pub catalog: PayloadCatalog,
    pub client: ClientConfig,
    pub redirect: RedirectConfig,
    pub threads: usize,
    pub output_file: Option<String>,
    pub json_file: Option<String>,
    pub quiet: bool,
}

impl Context {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let seeds = match (&cli.url, &cli.list) {
            (Some(url), _) => vec![url.clone()],
            (None, Some(list)) => read_entries(list)
                .with_context(|| format!("Failed to read URL list {}", list))?
                .iter()
                .map(|entry| with_default_scheme(entry))
                .collect(),
            (None, None) => bail!("Either --url or --list is required"),
        };

        let mut catalog = PayloadCatalog::builtin();
        if let Some(ref path) = cli.payload {
            let custom = read_entries(path)
                .with_context(|| format!("Failed to read payload file {}", path))?;
            tracing::info!("Loaded {} custom payload(s) from {}", custom.len(), path);
            catalog.extend(custom);
        }

        if cli.threads == 0 {
            bail!("--threads must be at least 1");
        }

        let delay = Duration::try_from_secs_f64(cli.delay)
            .with_context(|| format!("Invalid --delay value {}", cli.delay))?;

        // Parse custom headers
        let mut headers = HashMap::new();
        for header in &cli.headers {
            match header.split_once(':') {
                Some((key, value)) => {
                    headers.insert(key.trim().to_string(), value.trim().to_string());
                }
                None => tracing::warn!("Ignoring malformed header '{}'", header),
            }
        }

        let client = ClientConfig {
            timeout: Duration::from_secs(cli.timeout),
            proxy: cli.proxy,
            user_agent: cli
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            headers,
            cookies: cli.cookie,
        };

        let redirect = RedirectConfig::default()
            .with_max_redirects(cli.follow_redirects)
            .with_delay(delay)
            .with_techniques(cli.technique)
            .with_discovery(!cli.no_discovery);

        Ok(Self {
            seeds,
            catalog,
            client,
            redirect,
            threads: cli.threads,
            output_file: cli.output,
            json_file: cli.json,
            quiet: cli.quiet,
        })
    }
}
