use crate::core::seed::SeedUrl;
use crate::payload::encoder::EncodingTechnique;
use crate::redirect::resolver::{Escape, RedirectStep};
use crate::redirect::RedirectKind;
use serde::Serialize;

/// A confirmed open redirect. Immutable once recorded.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Finding {
    pub url: String,
    pub parameter: String,
    /// Unencoded payload, as listed in the catalog
    pub payload: String,
    pub technique: EncodingTechnique,
    pub redirect_kind: RedirectKind,
    pub destination: String,
    pub via_chain: bool,
    pub chain: Vec<RedirectStep>,
}

impl Finding {
    pub fn open_redirect(
        seed: &SeedUrl,
        parameter: &str,
        payload: &str,
        technique: EncodingTechnique,
        escape: Escape,
    ) -> Self {
        Self {
            url: seed.to_string(),
            parameter: parameter.to_string(),
            payload: payload.to_string(),
            technique,
            redirect_kind: escape.kind,
            destination: escape.destination,
            via_chain: escape.via_chain,
            chain: escape.chain,
        }
    }
}
