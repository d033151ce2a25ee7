use once_cell::sync::Lazy;
use regex::Regex;

use super::reference::Reference;
use crate::domain::AdaptedImage;

static SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("scheme pattern is valid"));

/// Turns media asset paths from the record store into absolute URLs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaResolver {
    base: Option<String>,
}

impl MediaResolver {
    /// Derive the media base from the record store's API base URL,
    /// e.g. `https://cms.example.org/api/` becomes `https://cms.example.org`
    pub fn from_api_base(api_base_url: &str) -> Self {
        let trimmed = api_base_url.trim().trim_end_matches('/');
        let base = trimmed.strip_suffix("/api").unwrap_or(trimmed).trim_end_matches('/');
        Self {
            base: (!base.is_empty()).then(|| base.to_string()),
        }
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn resolve(&self, url: &str) -> Option<String> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        if SCHEME.is_match(url) || url.starts_with("//") {
            return Some(url.to_string());
        }
        Some(match (&self.base, url.starts_with('/')) {
            (Some(base), true) => format!("{base}{url}"),
            (Some(base), false) => format!("{base}/{url}"),
            (None, _) => url.to_string(),
        })
    }

    /// Adapt an embedded media document; bare ids are unresolved and yield `None`
    pub fn adapt_image(&self, reference: Option<Reference<'_>>) -> Option<AdaptedImage> {
        let doc = reference?.resolved()?;
        Some(AdaptedImage {
            id: doc.id().unwrap_or_default(),
            url: doc.str("url").and_then(|url| self.resolve(url)),
            alt: doc.string("alt"),
        })
    }
}
