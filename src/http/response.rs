use std::collections::HashMap;

/// Status codes treated as HTTP redirects
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lowercase, as reqwest reports them
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub elapsed_ms: u128,
}

impl HttpResponse {
    /// Get body as UTF-8 string (lossy conversion)
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn is_redirect(&self) -> bool {
        REDIRECT_STATUSES.contains(&self.status)
    }

    /// Raw `Location` header, if present and non-empty
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get("location")
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }
}
