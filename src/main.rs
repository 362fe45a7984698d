mod cli;
mod core;
mod error;
mod http;
mod payload;
mod redirect;
mod reporting;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use crate::cli::args::Cli;
use crate::core::context::Context;
use crate::core::engine::Engine;
use std::env;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const BANNER: &str = r#"
 ██╗  ██╗ ██████╗ ██████╗ ██████╗ ███████╗██████╗
 ██║  ██║██╔═══██╗██╔══██╗██╔══██╗██╔════╝██╔══██╗
 ███████║██║   ██║██████╔╝██████╔╝█████╗  ██████╔╝
 ██╔══██║██║   ██║██╔═══╝ ██╔═══╝ ██╔══╝  ██╔══██╗
 ██║  ██║╚██████╔╝██║     ██║     ███████╗██║  ██║
 ╚═╝  ╚═╝ ╚═════╝ ╚═╝     ╚═╝     ╚══════╝╚═╝  ╚═╝
"#;

fn print_banner() {
    println!("{}", BANNER.cyan());
    println!(
        "  {} v{}\n",
        "Open redirect vulnerability scanner".bold(),
        env!("CARGO_PKG_VERSION")
    );
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Console on stderr (stdout carries findings only) plus an appending log file
fn init_tracing(cli: &Cli) {
    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter(cli.log_level()));

    let path = Path::new(&cli.log_file);
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("hopper_scan.log");

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir);

    let (file_layer, file_error) = match appender {
        Ok(appender) => {
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(appender)
                .with_filter(env_filter(cli.file_log_level()));
            (Some(layer), None)
        }
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("Cannot open log file {}: {}", cli.log_file, e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let show_help = args.iter().any(|a| a == "--help" || a == "-h");
    let no_banner = args.iter().any(|a| a == "--no-banner");

    // Banner first, then clap's help
    if show_help && !no_banner {
        print_banner();
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    let cli = Cli::parse();

    if !cli.no_banner && !cli.quiet {
        print_banner();
    }

    init_tracing(&cli);

    let ctx = Context::from_cli(cli)?;
    let quiet = ctx.quiet;

    let engine = Engine::new(ctx)?;
    let summary = engine.run().await?;

    if !quiet {
        println!("{}", reporting::text::summary(&summary));
    }

    Ok(())
}
