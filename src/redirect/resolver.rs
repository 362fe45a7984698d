//! Redirect resolution for one (seed, parameter, payload, encoding) tuple
//!
//! Runs as an explicit loop over hops: the initial probe, then zero or more
//! followed redirects, each consuming one unit of the redirect budget. The
//! loop ends in exactly one terminal `Resolution`.

use crate::core::scope::{host_of, Scope};
use crate::error::ScanError;
use crate::http::client::HttpClient;
use crate::payload::encoder::EncodingTechnique;
use crate::payload::injector::inject_query_param;
use crate::redirect::html::redirect_candidates;
use crate::redirect::RedirectKind;
use serde::Serialize;
use url::Url;

/// One hop of a redirect chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedirectStep {
    pub request_url: String,
    pub status: u16,
    pub kind: RedirectKind,
    /// Absolute next location
    pub location: String,
    pub host: String,
}

/// A confirmed cross-boundary redirect carrying the payload
#[derive(Debug, Clone, PartialEq)]
pub struct Escape {
    pub kind: RedirectKind,
    pub destination: String,
    /// Escape happened after at least one followed hop
    pub via_chain: bool,
    pub chain: Vec<RedirectStep>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Escaped(Escape),
    /// Budget ran out while the target kept redirecting
    Exhausted { hops: u32 },
    NoRedirect,
    TransportError(String),
}

pub struct RedirectResolver<'a> {
    client: &'a HttpClient,
    max_redirects: u32,
}

impl<'a> RedirectResolver<'a> {
    pub fn new(client: &'a HttpClient, max_redirects: u32) -> Self {
        Self {
            client,
            max_redirects,
        }
    }

    pub async fn resolve(
        &self,
        seed: &Url,
        param: &str,
        payload: &str,
        technique: EncodingTechnique,
    ) -> Resolution {
        let scope = Scope::new(seed);
        let encoded = technique.encode(payload);

        let mut current = inject_query_param(seed, param, &encoded);
        let mut remaining = self.max_redirects;
        let mut hops = 0u32;
        let mut chain = Vec::new();

        loop {
            let resp = match self.client.get(current.clone()).await {
                Ok(resp) => resp,
                Err(source) => {
                    let err = ScanError::ProbeTransport {
                        url: current.to_string(),
                        source,
                    };
                    tracing::debug!("{}", err);
                    return Resolution::TransportError(err.to_string());
                }
            };

            tracing::trace!("{} -> {} ({}ms)", current, resp.status, resp.elapsed_ms);

            if resp.is_redirect() {
                let Some(location) = resp.location() else {
                    return Resolution::NoRedirect;
                };
                let Ok(next) = current.join(location) else {
                    tracing::debug!("Unresolvable Location '{}' from {}", location, current);
                    return Resolution::NoRedirect;
                };

                chain.push(RedirectStep {
                    request_url: current.to_string(),
                    status: resp.status,
                    kind: RedirectKind::Http,
                    location: next.to_string(),
                    host: host_of(&next),
                });

                if escapes(&scope, location, &next, payload) {
                    return Resolution::Escaped(Escape {
                        kind: RedirectKind::Http,
                        destination: destination_text(location, &next),
                        via_chain: hops > 0,
                        chain,
                    });
                }

                if remaining == 0 {
                    return Resolution::Exhausted { hops };
                }

                if !scope.is_in_scope(&next) {
                    tracing::debug!("Chain left {} without the payload at {}", scope.host(), next);
                    return Resolution::NoRedirect;
                }

                remaining -= 1;
                hops += 1;
                current = next;
                continue;
            }

            if resp.status == 200 {
                for (kind, target) in redirect_candidates(&resp.body_text()) {
                    let Ok(next) = current.join(&target) else {
                        continue;
                    };

                    if escapes(&scope, &target, &next, payload) {
                        chain.push(RedirectStep {
                            request_url: current.to_string(),
                            status: resp.status,
                            kind,
                            location: next.to_string(),
                            host: host_of(&next),
                        });

                        return Resolution::Escaped(Escape {
                            kind,
                            destination: destination_text(&target, &next),
                            via_chain: hops > 0,
                            chain,
                        });
                    }
                }
            }

            return Resolution::NoRedirect;
        }
    }
}

/// Cross-boundary host AND payload text present in the raw or resolved target
fn escapes(scope: &Scope, raw_target: &str, resolved: &Url, payload: &str) -> bool {
    if scope.is_in_scope(resolved) {
        return false;
    }
    carries_payload(payload, &[raw_target, resolved.as_str()])
}

fn carries_payload(payload: &str, texts: &[&str]) -> bool {
    let decoded = urlencoding::decode(payload).ok();

    texts.iter().any(|text| {
        text.contains(payload) || decoded.as_deref().map_or(false, |d| text.contains(d))
    })
}

/// Report absolute targets verbatim; relative ones in resolved form
fn destination_text(raw_target: &str, resolved: &Url) -> String {
    if Url::parse(raw_target).is_ok() {
        raw_target.to_string()
    } else {
        resolved.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::client::ClientConfig;
    use mockito::Matcher;

    const PAYLOAD: &str = "https://evil.example";

    fn client() -> HttpClient {
        HttpClient::new(&ClientConfig::default()).unwrap()
    }

    fn seed(server: &mockito::Server, path_and_query: &str) -> Url {
        Url::parse(&format!("{}{}", server.url(), path_and_query)).unwrap()
    }

    #[tokio::test]
    async fn test_http_redirect_escape() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .with_status(302)
            .with_header("Location", &format!("https://evil.example/{}", PAYLOAD))
            .create_async()
            .await;

        let client = client();
        let resolver = RedirectResolver::new(&client, 5);
        let result = resolver
            .resolve(&seed(&server, "/go?next=/"), "next", PAYLOAD, EncodingTechnique::Plain)
            .await;

        match result {
            Resolution::Escaped(escape) => {
                assert_eq!(escape.kind, RedirectKind::Http);
                assert!(escape.destination.contains(PAYLOAD));
                assert!(!escape.via_chain);
                assert_eq!(escape.chain.len(), 1);
                assert_eq!(escape.chain[0].host, "evil.example");
            }
            other => panic!("expected escape, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_meta_refresh_escape() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .with_status(200)
            .with_body(r#"<html><head><meta http-equiv="refresh" content="0;url=https://evil.example"></head></html>"#)
            .create_async()
            .await;

        let client = client();
        let resolver = RedirectResolver::new(&client, 5);
        let result = resolver
            .resolve(&seed(&server, "/meta"), "target", PAYLOAD, EncodingTechnique::Plain)
            .await;

        match result {
            Resolution::Escaped(escape) => {
                assert_eq!(escape.kind, RedirectKind::MetaRefresh);
                assert_eq!(escape.destination, "https://evil.example");
            }
            other => panic!("expected escape, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_script_redirect_escape() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .with_status(200)
            .with_body("<script>location.replace('https://evil.example/landing');</script>")
            .create_async()
            .await;

        let client = client();
        let resolver = RedirectResolver::new(&client, 5);
        let result = resolver
            .resolve(&seed(&server, "/js"), "location", PAYLOAD, EncodingTechnique::Plain)
            .await;

        assert!(matches!(
            result,
            Resolution::Escaped(Escape { kind: RedirectKind::Script, .. })
        ));
    }

    #[tokio::test]
    async fn test_budget_exhausted_on_self_redirect() {
        let mut server = mockito::Server::new_async().await;
        let budget = 3;
        let m = server
            .mock("GET", Matcher::Any)
            .with_status(302)
            .with_header("Location", "/loop")
            .expect(budget as usize + 1)
            .create_async()
            .await;

        let client = client();
        let resolver = RedirectResolver::new(&client, budget);
        let result = resolver
            .resolve(&seed(&server, "/loop"), "next", PAYLOAD, EncodingTechnique::Plain)
            .await;

        assert_eq!(result, Resolution::Exhausted { hops: budget });
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_zero_budget_stops_after_probe() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", Matcher::Any)
            .with_status(301)
            .with_header("Location", "/elsewhere")
            .expect(1)
            .create_async()
            .await;

        let client = client();
        let resolver = RedirectResolver::new(&client, 0);
        let result = resolver
            .resolve(&seed(&server, "/"), "next", PAYLOAD, EncodingTechnique::Plain)
            .await;

        assert_eq!(result, Resolution::Exhausted { hops: 0 });
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_escape_after_chain() {
        let mut server = mockito::Server::new_async().await;
        let _start = server
            .mock("GET", "/start")
            .match_query(Matcher::Any)
            .with_status(302)
            .with_header("Location", "/hop")
            .create_async()
            .await;
        let _hop = server
            .mock("GET", "/hop")
            .with_status(307)
            .with_header("Location", "https://evil.example/?to=https://evil.example")
            .create_async()
            .await;

        let client = client();
        let resolver = RedirectResolver::new(&client, 5);
        let result = resolver
            .resolve(&seed(&server, "/start"), "next", PAYLOAD, EncodingTechnique::Plain)
            .await;

        match result {
            Resolution::Escaped(escape) => {
                assert!(escape.via_chain);
                assert_eq!(escape.chain.len(), 2);
                assert_eq!(escape.chain[1].status, 307);
            }
            other => panic!("expected escape, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unrelated_cross_domain_redirect_is_not_a_finding() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .with_status(302)
            .with_header("Location", "https://sso.partner.test/login")
            .create_async()
            .await;

        let client = client();
        let resolver = RedirectResolver::new(&client, 5);
        let result = resolver
            .resolve(&seed(&server, "/"), "next", PAYLOAD, EncodingTechnique::Plain)
            .await;

        assert_eq!(result, Resolution::NoRedirect);
    }

    #[tokio::test]
    async fn test_ignored_parameter_yields_no_redirect() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .with_status(200)
            .with_body("<html><body>Welcome</body></html>")
            .create_async()
            .await;

        let client = client();
        let resolver = RedirectResolver::new(&client, 5);
        let result = resolver
            .resolve(
                &seed(&server, "/login?next=https://good.test"),
                "next",
                PAYLOAD,
                EncodingTechnique::Plain,
            )
            .await;

        assert_eq!(result, Resolution::NoRedirect);
    }

    #[tokio::test]
    async fn test_non_redirect_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .with_status(500)
            .with_body(r#"<meta http-equiv="refresh" content="0;url=https://evil.example">"#)
            .create_async()
            .await;

        let client = client();
        let resolver = RedirectResolver::new(&client, 5);
        let result = resolver
            .resolve(&seed(&server, "/"), "next", PAYLOAD, EncodingTechnique::Plain)
            .await;

        assert_eq!(result, Resolution::NoRedirect);
    }

    #[tokio::test]
    async fn test_transport_error() {
        let client = client();
        let resolver = RedirectResolver::new(&client, 5);
        let seed = Url::parse("http://127.0.0.1:1/login").unwrap();

        let result = resolver
            .resolve(&seed, "next", PAYLOAD, EncodingTechnique::Plain)
            .await;

        assert!(matches!(result, Resolution::TransportError(_)));
    }

    #[tokio::test]
    async fn test_resolution_is_repeatable() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .with_status(303)
            .with_header("Location", PAYLOAD)
            .expect(2)
            .create_async()
            .await;

        let client = client();
        let resolver = RedirectResolver::new(&client, 5);
        let url = seed(&server, "/");

        let first = resolver.resolve(&url, "next", PAYLOAD, EncodingTechnique::Plain).await;
        let second = resolver.resolve(&url, "next", PAYLOAD, EncodingTechnique::Plain).await;

        assert!(matches!(first, Resolution::Escaped(_)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_payload_match_accepts_decoded_form() {
        assert!(carries_payload("https%3A%2F%2Fevil.com", &["https://evil.com/"]));
        assert!(carries_payload("//evil.com", &["x", "https://evil.com"]));
        assert!(!carries_payload("https://evil.com", &["https://other.com"]));
    }
}
