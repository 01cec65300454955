//! Presentation-time resolution of `locationRef` values.
//!
//! Resolution runs on query results only, after evaluation. The catalog never
//! interprets a location reference itself.

use std::fmt::Debug;

/// Turns an opaque location reference into something a client can fetch.
pub trait LocationResolver: Send + Sync + Debug {
    fn resolve(&self, location_ref: &str) -> String;
}

/// Hands the reference back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

impl LocationResolver for PassthroughResolver {
    fn resolve(&self, location_ref: &str) -> String {
        location_ref.to_string()
    }
}

/// Joins relative references onto a public base URL.
///
/// References that already are `http://` or `https://` URLs pass through.
#[derive(Debug, Clone)]
pub struct BaseUrlResolver {
    base_url: String,
}

impl BaseUrlResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn is_absolute_url(location_ref: &str) -> bool {
    let lower = location_ref.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl LocationResolver for BaseUrlResolver {
    fn resolve(&self, location_ref: &str) -> String {
        if is_absolute_url(location_ref) {
            return location_ref.to_string();
        }
        format!("{}/{}", self.base_url, location_ref.trim_start_matches('/'))
    }
}

/// Pick a resolver from an optional base URL.
pub fn resolver_for(base_url: Option<&str>) -> Box<dyn LocationResolver> {
    match base_url.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => Box::new(BaseUrlResolver::new(url)),
        None => Box::new(PassthroughResolver),
    }
}
