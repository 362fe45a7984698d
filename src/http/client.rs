//! HTTP client shared by every worker: TLS verification off, redirects off

use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use reqwest::{redirect::Policy, Client, Proxy};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Transport settings taken from the command line
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub cookies: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HashMap::new(),
            cookies: None,
        }
    }
}

pub struct HttpClient {
    client: Client,
    /// `-H` headers and the cookie, attached to every request
    static_headers: HeaderMap,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .danger_accept_invalid_certs(true)
            .redirect(Policy::none())
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());

        if let Some(ref proxy) = config.proxy {
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            static_headers: static_headers(config),
        })
    }

    /// Issue a GET without following redirects
    pub async fn get(&self, url: Url) -> Result<HttpResponse, reqwest::Error> {
        self.execute(HttpRequest::get(url).with_headers(self.static_headers.clone()))
            .await
    }

    pub async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
        let start = Instant::now();

        let response = self
            .client
            .request(req.method, req.url)
            .headers(req.headers)
            .send()
            .await?;
        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (k, v) in response.headers().iter() {
            headers.insert(k.to_string(), v.to_str().unwrap_or("").to_string());
        }

        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
            elapsed_ms: start.elapsed().as_millis(),
        })
    }
}

fn static_headers(config: &ClientConfig) -> HeaderMap {
    let mut map = HeaderMap::new();

    for (key, value) in &config.headers {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => tracing::warn!("Ignoring invalid header '{}: {}'", key, value),
        }
    }

    if let Some(ref cookies) = config.cookies {
        match HeaderValue::from_str(cookies) {
            Ok(value) => {
                map.insert(COOKIE, value);
            }
            Err(_) => tracing::warn!("Ignoring invalid cookie string"),
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_static_headers_include_cookie() {
        let mut config = ClientConfig {
            cookies: Some("session=abc".to_string()),
            ..ClientConfig::default()
        };
        config.headers.insert("X-Api-Key".to_string(), "k1".to_string());
        config.headers.insert("Bad Name".to_string(), "v".to_string());

        let map = static_headers(&config);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x-api-key").unwrap(), "k1");
        assert_eq!(map.get(COOKIE).unwrap(), "session=abc");
    }

    #[tokio::test]
    async fn test_get_sends_static_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("x-api-key", "k1")
            .match_header("cookie", "session=abc")
            .match_header("user-agent", Matcher::Regex("Chrome/91".to_string()))
            .with_status(302)
            .with_header("Location", "/home")
            .create_async()
            .await;

        let mut config = ClientConfig {
            cookies: Some("session=abc".to_string()),
            ..ClientConfig::default()
        };
        config.headers.insert("X-Api-Key".to_string(), "k1".to_string());
        let client = HttpClient::new(&config).unwrap();

        let url = Url::parse(&format!("{}/", server.url())).unwrap();
        let resp = client.get(url).await.unwrap();

        assert_eq!(resp.status, 302);
        assert_eq!(resp.location(), Some("/home"));
        mock.assert_async().await;
    }
}
