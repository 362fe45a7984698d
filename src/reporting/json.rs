use crate::reporting::model::Finding;
use crate::redirect::RedirectKind;
use serde::Serialize;

#[derive(Serialize)]
struct Report {
    scan_metadata: ScanMetadata,
    summary: Summary,
    findings: Vec<Finding>,
}

#[derive(Serialize)]
struct ScanMetadata {
    tool: String,
    version: String,
    scan_date: String,
    report_format: String,
}

#[derive(Serialize)]
struct Summary {
    total_findings: usize,
    http: usize,
    meta_refresh: usize,
    script: usize,
    via_chain: usize,
}

pub fn render(findings: &[Finding]) -> anyhow::Result<String> {
    let by_kind = |kind: RedirectKind| findings.iter().filter(|f| f.redirect_kind == kind).count();

    let summary = Summary {
        total_findings: findings.len(),
        http: by_kind(RedirectKind::Http),
        meta_refresh: by_kind(RedirectKind::MetaRefresh),
        script: by_kind(RedirectKind::Script),
        via_chain: findings.iter().filter(|f| f.via_chain).count(),
    };

    let report = Report {
        scan_metadata: ScanMetadata {
            tool: "hopper".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            scan_date: chrono::Utc::now().to_rfc3339(),
            report_format: "application/json".to_string(),
        },
        summary,
        findings: findings.to_vec(),
    };

    let json = serde_json::to_string_pretty(&report)?;
    Ok(json)
}
