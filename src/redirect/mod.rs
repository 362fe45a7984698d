//! Open redirect detection
//!
//! A finding requires two things at once: the final destination lies outside
//! the seed's trust boundary, and the destination text carries the injected
//! payload. Pre-existing cross-domain redirects therefore never report.
//!
//! ## Pipeline
//!
//! 1. **Discovery**: query keys of the seed, redirect-like names mined from the
//!    seed page, and well-known names the live target reacts to
//! 2. **Injection**: every parameter x payload x encoding combination
//! 3. **Resolution**: follow HTTP redirects hop by hop within a budget, and
//!    inspect 200 bodies for meta-refresh and script redirects

pub mod discovery;
pub mod html;
pub mod resolver;
pub mod scanner;

pub use scanner::RedirectScanner;

use crate::payload::encoder::EncodingTechnique;
use serde::Serialize;
use std::time::Duration;

/// How the target sent the client onwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedirectKind {
    /// 3xx status with a `Location` header
    Http,
    /// `<meta http-equiv="refresh">` in a 200 body
    MetaRefresh,
    /// JavaScript location assignment in a 200 body
    Script,
}

impl RedirectKind {
    pub fn name(&self) -> &'static str {
        match self {
            RedirectKind::Http => "http",
            RedirectKind::MetaRefresh => "meta-refresh",
            RedirectKind::Script => "script",
        }
    }
}

impl std::fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-run redirect scanning configuration
#[derive(Debug, Clone)]
pub struct RedirectConfig {
    /// Hops followed after the initial probe
    pub max_redirects: u32,

    /// Pause between consecutive probes of one seed
    pub delay: Duration,

    /// Encodings applied to every payload, in iteration order
    pub techniques: Vec<EncodingTechnique>,

    /// Mine the seed page and probe well-known names
    pub discover: bool,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            max_redirects: 5,
            delay: Duration::ZERO,
            techniques: EncodingTechnique::ALL.to_vec(),
            discover: true,
        }
    }
}

impl RedirectConfig {
    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_techniques(mut self, techniques: Vec<EncodingTechnique>) -> Self {
        if !techniques.is_empty() {
            self.techniques = techniques;
        }
        self
    }

    pub fn with_discovery(mut self, enabled: bool) -> Self {
        self.discover = enabled;
        self
    }
}
