//! Bypass encodings for redirect payloads
//!
//! Each technique rewrites a destination so that naive allow-list or
//! deny-list filters miss it while the target still decodes it back to the
//! attacker host.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingTechnique {
    /// Payload sent as-is
    Plain,
    /// Whole payload percent-encoded once, delimiters included
    PercentEncodeOnce,
    /// Whole payload percent-encoded twice
    PercentEncodeTwice,
    /// Backslash after `scheme://`, or every `/` escaped as `\/`
    BackslashSubstitution,
    /// `%09` appended to the first host label
    TabInjection,
}

impl EncodingTechnique {
    pub const ALL: [EncodingTechnique; 5] = [
        EncodingTechnique::Plain,
        EncodingTechnique::PercentEncodeOnce,
        EncodingTechnique::PercentEncodeTwice,
        EncodingTechnique::BackslashSubstitution,
        EncodingTechnique::TabInjection,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EncodingTechnique::Plain => "plain",
            EncodingTechnique::PercentEncodeOnce => "percent-encode-once",
            EncodingTechnique::PercentEncodeTwice => "percent-encode-twice",
            EncodingTechnique::BackslashSubstitution => "backslash-substitution",
            EncodingTechnique::TabInjection => "tab-injection",
        }
    }

    pub fn encode(&self, payload: &str) -> String {
        match self {
            EncodingTechnique::Plain => payload.to_string(),
            EncodingTechnique::PercentEncodeOnce => percent_encode(payload),
            EncodingTechnique::PercentEncodeTwice => percent_encode(&percent_encode(payload)),
            EncodingTechnique::BackslashSubstitution => backslash_substitution(payload),
            EncodingTechnique::TabInjection => tab_injection(payload),
        }
    }
}

impl std::fmt::Display for EncodingTechnique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Split `scheme://rest` when the payload starts with a syntactically valid scheme
fn split_scheme(payload: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = payload.split_once("://")?;
    let mut chars = scheme.chars();
    let first_ok = chars.next().map_or(false, |c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    (first_ok && rest_ok).then_some((scheme, rest))
}

fn percent_encode(payload: &str) -> String {
    urlencoding::encode(payload).into_owned()
}

fn backslash_substitution(payload: &str) -> String {
    match split_scheme(payload) {
        Some((scheme, rest)) => format!("{}://\\{}", scheme, rest),
        None => payload.replace('/', "\\/"),
    }
}

fn tab_injection(payload: &str) -> String {
    let Some((scheme, rest)) = split_scheme(payload) else {
        return payload.to_string();
    };

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);

    match authority.split_once('.') {
        Some((first_label, remainder)) => {
            format!("{}://{}%09.{}{}", scheme, first_label, remainder, tail)
        }
        None => payload.to_string(),
    }
}
