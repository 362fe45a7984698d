use crate::payload::encoder::EncodingTechnique;
use clap::{ArgGroup, Parser};

/// Hopper – open redirect scanner
#[derive(Parser, Debug)]
#[command(
    name = "hopper",
    version,
    about = "Hopper – open redirect vulnerability scanner",
    long_about = r#"
Hopper finds open redirects by injecting attacker-controlled destinations
into redirect-like parameters and following the target's response:

  • HTTP 3xx Location headers, followed hop by hop within a budget
  • <meta http-equiv="refresh"> tags in 200 responses
  • JavaScript location assignments in 200 responses

A finding is reported only when the final destination leaves the seed's
domain AND carries the injected payload, so existing cross-domain redirects
never show up.

PARAMETER DISCOVERY:
  • Query parameters and REST-style path keys already in the URL
  • Redirect-like names mined from forms, links and scripts of the page
  • Well-known redirect names the live target reacts to

BYPASS TECHNIQUES:
  plain, percent-encode-once, percent-encode-twice,
  backslash-substitution, tab-injection"#,
    after_help = r#"EXAMPLES:
  hopper -u "https://example.com/login?next=/home"
  hopper -l urls.txt -t 20 -o results.txt
  hopper -u https://example.com/sso --technique plain --technique tab-injection
  hopper -l urls.txt --proxy http://127.0.0.1:8080 --delay 0.5 --json report.json"#
)]
#[command(group(ArgGroup::new("targets").required(true).args(["url", "list"])))]
pub struct Cli {
    // ═══════════════════════════════════════════════════════════════════
    // TARGETS
    // ═══════════════════════════════════════════════════════════════════

    /// Single URL to scan
    #[arg(short, long, help_heading = "TARGETS")]
    pub url: Option<String>,

    /// File containing URLs to scan, one per line
    #[arg(short, long, help_heading = "TARGETS")]
    pub list: Option<String>,

    // ═══════════════════════════════════════════════════════════════════
    // PAYLOADS
    // ═══════════════════════════════════════════════════════════════════

    /// File with custom payloads, appended to the built-in list
    #[arg(short, long, help_heading = "PAYLOADS")]
    pub payload: Option<String>,

    /// Restrict bypass techniques (can be used multiple times)
    #[arg(long, value_enum, help_heading = "PAYLOADS")]
    pub technique: Vec<EncodingTechnique>,

    /// Only test parameters already present in the URL
    #[arg(long = "no-discovery", help_heading = "PAYLOADS")]
    pub no_discovery: bool,

    // ═══════════════════════════════════════════════════════════════════
    // REQUEST
    // ═══════════════════════════════════════════════════════════════════

    /// Proxy URL (e.g. http://127.0.0.1:8080)
    #[arg(long, help_heading = "REQUEST")]
    pub proxy: Option<String>,

    /// Custom User-Agent
    #[arg(long = "user-agent", help_heading = "REQUEST")]
    pub user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10, help_heading = "REQUEST")]
    pub timeout: u64,

    /// Maximum number of redirects to follow
    #[arg(long = "follow-redirects", default_value_t = 5, help_heading = "REQUEST")]
    pub follow_redirects: u32,

    /// Cookie string sent with every request
    #[arg(long, help_heading = "REQUEST")]
    pub cookie: Option<String>,

    /// HTTP headers (can be used multiple times)
    #[arg(long = "header", short = 'H', help_heading = "REQUEST")]
    pub headers: Vec<String>,

    // ═══════════════════════════════════════════════════════════════════
    // PERFORMANCE
    // ═══════════════════════════════════════════════════════════════════

    /// Number of URLs scanned concurrently
    #[arg(short, long, default_value_t = 10, help_heading = "PERFORMANCE")]
    pub threads: usize,

    /// Delay between requests to one URL, in seconds
    #[arg(long, default_value_t = 0.0, help_heading = "PERFORMANCE")]
    pub delay: f64,

    // ═══════════════════════════════════════════════════════════════════
    // OUTPUT
    // ═══════════════════════════════════════════════════════════════════

    /// Skip the banner display
    #[arg(long, help_heading = "OUTPUT")]
    pub no_banner: bool,

    /// Quiet mode (findings only)
    #[arg(short, long, help_heading = "OUTPUT", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output (debug level)
    #[arg(short, long, help_heading = "OUTPUT")]
    pub verbose: bool,

    /// Results file (plain text)
    #[arg(short, long, help_heading = "OUTPUT")]
    pub output: Option<String>,

    /// Write a JSON report at the end of the run
    #[arg(long, help_heading = "OUTPUT")]
    pub json: Option<String>,

    /// Log file receiving every log record (info level, debug with -v)
    #[arg(long = "log-file", default_value = "hopper_scan.log", help_heading = "OUTPUT")]
    pub log_file: String,
}

impl Cli {
    /// Default console filter for the selected verbosity
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            self.file_log_level()
        }
    }

    /// Default log file filter; `--quiet` only silences the console
    pub fn file_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["hopper", "-u", "https://app.test/?next=/"]).unwrap();

        assert_eq!(cli.threads, 10);
        assert_eq!(cli.timeout, 10);
        assert_eq!(cli.follow_redirects, 5);
        assert_eq!(cli.delay, 0.0);
        assert!(cli.technique.is_empty());
        assert_eq!(cli.log_level(), "info");
        assert_eq!(cli.log_file, "hopper_scan.log");
    }

    #[test]
    fn test_target_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["hopper"]).is_err());
        assert!(Cli::try_parse_from(["hopper", "-u", "https://a.test", "-l", "urls.txt"]).is_err());
    }

    #[test]
    fn test_repeatable_options() {
        let cli = Cli::try_parse_from([
            "hopper",
            "-l",
            "urls.txt",
            "--technique",
            "plain",
            "--technique",
            "tab-injection",
            "-H",
            "X-Api-Key: abc",
            "-H",
            "Accept: */*",
            "-q",
        ])
        .unwrap();

        assert_eq!(
            cli.technique,
            vec![EncodingTechnique::Plain, EncodingTechnique::TabInjection]
        );
        assert_eq!(cli.headers.len(), 2);
        assert_eq!(cli.log_level(), "error");
        assert_eq!(cli.file_log_level(), "info");
    }

    #[test]
    fn test_unknown_technique_rejected() {
        assert!(Cli::try_parse_from(["hopper", "-u", "https://a.test", "--technique", "rot13"]).is_err());
    }
}
