//! Body-level redirect extraction and parameter-name mining

use crate::redirect::RedirectKind;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Keywords that make a name look like a redirect parameter
pub const REDIRECT_KEYWORDS: &[&str] = &[
    "redirect", "return", "callback", "goto", "next",
    "url", "destination", "back", "continue", "target",
];

/// JavaScript redirect idioms, tried in this order
const SCRIPT_REDIRECT_PATTERNS: &[&str] = &[
    r#"(?i)window\.location(?:\.href)?\s*=\s*['"]([^'"]+)['"]"#,
    r#"(?i)location\.replace\(\s*['"]([^'"]+)['"]\s*\)"#,
    r#"(?i)location\.href\s*=\s*['"]([^'"]+)['"]"#,
    r#"(?i)document\.location\s*=\s*['"]([^'"]+)['"]"#,
];

/// Quoted literals starting with a redirect keyword
const QUOTED_NAME_PATTERN: &str =
    r#"(?i)['"]((?:redirect|return|callback|goto|next|url|destination|back)[^'"]*)['"]"#;

/// Redirect targets found in a 200 body: meta-refresh first, then scripts
pub fn redirect_candidates(body: &str) -> Vec<(RedirectKind, String)> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    let meta = meta_refresh_targets(body)
        .into_iter()
        .map(|t| (RedirectKind::MetaRefresh, t));
    let script = script_redirect_targets(body)
        .into_iter()
        .map(|t| (RedirectKind::Script, t));

    for (kind, target) in meta.chain(script) {
        if seen.insert((kind, target.clone())) {
            candidates.push((kind, target));
        }
    }

    candidates
}

fn meta_refresh_targets(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    let mut targets = Vec::new();

    let Ok(meta_sel) = Selector::parse("meta[http-equiv][content]") else {
        return targets;
    };

    for el in document.select(&meta_sel) {
        let is_refresh = el
            .value()
            .attr("http-equiv")
            .map_or(false, |v| v.trim().eq_ignore_ascii_case("refresh"));
        if !is_refresh {
            continue;
        }

        if let Some(target) = el.value().attr("content").and_then(refresh_url) {
            targets.push(target);
        }
    }

    targets
}

/// Extract `X` from a refresh value such as `0;url=X` or `5; URL='X'`
fn refresh_url(content: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `content`
    let pos = content.to_ascii_lowercase().find("url=")?;
    let target = content[pos + 4..]
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim();

    (!target.is_empty()).then(|| target.to_string())
}

fn script_redirect_targets(body: &str) -> Vec<String> {
    let mut targets = Vec::new();

    for pattern in SCRIPT_REDIRECT_PATTERNS {
        if let Ok(re) = Regex::new(pattern) {
            for caps in re.captures_iter(body) {
                if let Some(m) = caps.get(1) {
                    targets.push(m.as_str().to_string());
                }
            }
        }
    }

    targets
}

/// Redirect-like parameter names referenced by an HTML/JS page
pub fn extract_param_names(body: &str) -> Vec<String> {
    let mut raw = Vec::new();

    {
        let document = Html::parse_document(body);

        if let Ok(input_sel) = Selector::parse("input[name]") {
            for input in document.select(&input_sel) {
                if let Some(name) = input.value().attr("name") {
                    raw.push(name.to_string());
                }
            }
        }

        if let Ok(link_sel) = Selector::parse("[href], [src], [action]") {
            for el in document.select(&link_sel) {
                for attr in ["href", "src", "action"] {
                    if let Some(value) = el.value().attr(attr) {
                        raw.extend(query_keys(value));
                    }
                }
            }
        }
    }

    if let Ok(re) = Regex::new(QUOTED_NAME_PATTERN) {
        for caps in re.captures_iter(body) {
            if let Some(m) = caps.get(1) {
                raw.push(m.as_str().to_string());
            }
        }
    }

    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|name| is_plausible_name(name) && looks_like_redirect_param(name))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Keys of the query string inside an attribute value
fn query_keys(value: &str) -> Vec<String> {
    let Some((_, query)) = value.split_once('?') else {
        return Vec::new();
    };
    let query = query.split('#').next().unwrap_or(query);

    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').map(|(k, _)| k))
        .filter(|k| !k.is_empty())
        .map(|k| k.to_string())
        .collect()
}

pub fn looks_like_redirect_param(name: &str) -> bool {
    let lower = name.to_lowercase();
    REDIRECT_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn is_plausible_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'' || c == '<' || c == '>')
}
