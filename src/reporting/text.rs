use crate::core::engine::RunSummary;
use crate::reporting::model::Finding;
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

// ==============================
// BOX CONFIGURATION
// ==============================

const BOX_WIDTH: usize = 70;
const INNER_WIDTH: usize = BOX_WIDTH - 2;

fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn top_border() -> String {
    format!("╔{}╗", "═".repeat(INNER_WIDTH))
}

fn middle_border() -> String {
    format!("╠{}╣", "═".repeat(INNER_WIDTH))
}

fn bottom_border() -> String {
    format!("╚{}╝", "═".repeat(INNER_WIDTH))
}

/// Left-aligned box line (emoji-safe)
fn box_line(content: &str) -> String {
    let safe_content = format!(" {} ", content);
    let padding = INNER_WIDTH.saturating_sub(visual_width(&safe_content));
    format!("║{}{}║", safe_content, " ".repeat(padding))
}

fn box_line_centered(content: &str) -> String {
    let safe_content = format!(" {} ", content);
    let width = visual_width(&safe_content);

    if width >= INNER_WIDTH {
        return box_line(content);
    }

    let remaining = INNER_WIDTH - width;
    let left = remaining / 2;
    let right = remaining - left;

    format!("║{}{}{}║", " ".repeat(left), safe_content, " ".repeat(right))
}

fn redirect_type(finding: &Finding) -> String {
    if finding.via_chain {
        format!("{} (found in redirect chain)", finding.redirect_kind)
    } else {
        finding.redirect_kind.to_string()
    }
}

// ==============================
// FINDING RECORDS
// ==============================

/// Record written to the results file
pub fn plain_record(finding: &Finding) -> String {
    format!(
        "[VULNERABLE] Open Redirect Found!\n\
         URL: {}\n\
         Parameter: {}\n\
         Payload: {}\n\
         Bypass Technique: {}\n\
         Redirect Type: {}\n\
         Redirects To: {}\n",
        finding.url,
        finding.parameter,
        finding.payload,
        finding.technique,
        redirect_type(finding),
        finding.destination,
    )
}

/// Highlighted block printed to stdout as soon as a finding is confirmed
pub fn console_block(finding: &Finding) -> String {
    let mut out = format!(
        "\n{}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}",
        "[VULNERABLE] Open Redirect Found!".red().bold(),
        "URL:".bold(),
        finding.url,
        "Parameter:".bold(),
        finding.parameter.yellow(),
        "Payload:".bold(),
        finding.payload,
        "Bypass Technique:".bold(),
        finding.technique,
        "Redirect Type:".bold(),
        redirect_type(finding),
        "Redirects To:".bold(),
        finding.destination.red(),
    );

    if finding.via_chain {
        for (idx, step) in finding.chain.iter().enumerate() {
            out.push_str(&format!(
                "\n    {} [{}] {} -> {}",
                format!("#{}", idx + 1).dimmed(),
                step.status,
                step.request_url,
                step.location,
            ));
        }
    }

    out
}

// ==============================
// RUN SUMMARY
// ==============================

pub fn summary(report: &RunSummary) -> String {
    let mut lines = vec![String::new(), top_border()];

    if report.interrupted {
        lines.push(box_line_centered("SCAN INTERRUPTED"));
    } else {
        lines.push(box_line_centered("SCAN COMPLETE"));
    }
    lines.push(middle_border());

    lines.push(box_line(&format!("Targets scanned: {}", report.seeds)));
    lines.push(box_line(&format!(
        "Elapsed:         {:.2}s",
        report.elapsed.as_secs_f64()
    )));

    if report.findings == 0 {
        lines.push(box_line("No open redirects detected"));
    } else {
        lines.push(box_line(&format!("Open redirects:  {}", report.findings)));
    }

    lines.push(bottom_border());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::encoder::EncodingTechnique;
    use crate::redirect::resolver::RedirectStep;
    use crate::redirect::RedirectKind;
    use std::time::Duration;

    fn finding(via_chain: bool) -> Finding {
        Finding {
            url: "http://app.test/login?next=/home".to_string(),
            parameter: "next".to_string(),
            payload: "//evil.example".to_string(),
            technique: EncodingTechnique::PercentEncodeOnce,
            redirect_kind: RedirectKind::Http,
            destination: "https://evil.example/".to_string(),
            via_chain,
            chain: vec![RedirectStep {
                request_url: "http://app.test/login?next=%2F%2Fevil.example".to_string(),
                status: 302,
                kind: RedirectKind::Http,
                location: "https://evil.example/".to_string(),
                host: "evil.example".to_string(),
            }],
        }
    }

    #[test]
    fn test_plain_record_layout() {
        let record = plain_record(&finding(false));

        assert_eq!(
            record,
            "[VULNERABLE] Open Redirect Found!\n\
             URL: http://app.test/login?next=/home\n\
             Parameter: next\n\
             Payload: //evil.example\n\
             Bypass Technique: percent-encode-once\n\
             Redirect Type: http\n\
             Redirects To: https://evil.example/\n"
        );
    }

    #[test]
    fn test_chain_marker() {
        let record = plain_record(&finding(true));
        assert!(record.contains("Redirect Type: http (found in redirect chain)\n"));
    }

    #[test]
    fn test_summary_lines_fit_box() {
        let text = summary(&RunSummary {
            seeds: 3,
            findings: 2,
            elapsed: Duration::from_millis(1500),
            interrupted: false,
        });

        assert!(text.contains("SCAN COMPLETE"));
        assert!(text.contains("Open redirects:  2"));
        for line in text.lines().filter(|l| !l.is_empty()) {
            assert_eq!(visual_width(line), BOX_WIDTH);
        }
    }

    #[test]
    fn test_summary_interrupted() {
        let text = summary(&RunSummary {
            seeds: 1,
            findings: 0,
            elapsed: Duration::ZERO,
            interrupted: true,
        });

        assert!(text.contains("SCAN INTERRUPTED"));
        assert!(text.contains("No open redirects detected"));
    }
}
