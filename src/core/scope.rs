//! Trust boundary comparison
//!
//! Two hosts share a boundary when they are equal once ports are removed, or
//! when their last two labels match. No public-suffix list is consulted, so
//! `a.co.uk` and `b.co.uk` compare as the same boundary.

use url::Url;

/// Remove an explicit `:port` suffix, keeping bracketed IPv6 literals intact
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    host.split(':').next().unwrap_or(host)
}

/// Last two dot-separated labels, or the whole host when it has fewer
fn registrable_suffix(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() >= 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        host.to_string()
    }
}

pub fn same_trust_boundary(host_a: &str, host_b: &str) -> bool {
    if host_a.is_empty() || host_b.is_empty() {
        return false;
    }

    let a = strip_port(host_a);
    let b = strip_port(host_b);

    if a == b {
        return true;
    }

    registrable_suffix(a) == registrable_suffix(b)
}

/// Host part of a URL as used for boundary checks; empty for host-less URLs
pub fn host_of(url: &Url) -> String {
    url.host_str().unwrap_or("").to_string()
}

/// The trust boundary of one seed URL
#[derive(Debug, Clone)]
pub struct Scope {
    host: String,
}

impl Scope {
    pub fn new(seed: &Url) -> Self {
        Self {
            host: host_of(seed),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn is_in_scope(&self, url: &Url) -> bool {
        same_trust_boundary(&self.host, &host_of(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_hosts() {
        for host in ["example.com", "localhost", "127.0.0.1", "a.b.c.example.org"] {
            assert!(same_trust_boundary(host, host), "{}", host);
        }
    }

    #[test]
    fn test_sibling_subdomains_share_boundary() {
        assert!(same_trust_boundary("a.example.com", "b.example.com"));
        assert!(same_trust_boundary("example.com", "www.example.com"));
    }

    #[test]
    fn test_different_domains() {
        assert!(!same_trust_boundary("example.com", "evil.com"));
        assert!(!same_trust_boundary("example.com", "example.com.evil.com"));
    }

    #[test]
    fn test_empty_host_never_matches() {
        assert!(!same_trust_boundary("", "example.com"));
        assert!(!same_trust_boundary("example.com", ""));
        assert!(!same_trust_boundary("", ""));
    }

    #[test]
    fn test_ports_are_ignored() {
        assert!(same_trust_boundary("example.com:8080", "example.com"));
        assert!(same_trust_boundary("[::1]:8080", "[::1]"));
    }

    #[test]
    fn test_multi_part_suffix_limitation() {
        assert!(same_trust_boundary("shop.co.uk", "evil.co.uk"));
    }

    #[test]
    fn test_scope_membership() {
        let seed = Url::parse("https://app.example.com/login").unwrap();
        let scope = Scope::new(&seed);

        assert_eq!(scope.host(), "app.example.com");
        assert!(scope.is_in_scope(&Url::parse("https://sso.example.com/x").unwrap()));
        assert!(!scope.is_in_scope(&Url::parse("https://evil.example/").unwrap()));
        assert!(!scope.is_in_scope(&Url::parse("javascript:alert(1)").unwrap()));
    }
}
