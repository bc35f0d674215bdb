//! Cache-control header synthesis for ISR routes.

use edge_core::InternalResponse;
use serde::{Deserialize, Serialize};

use crate::policy::RouteRule;

/// Header names written by the injector.
pub mod header_names {
    /// Browser-facing cache directive.
    pub const CACHE_CONTROL: &str = "Cache-Control";
    /// Default provider edge cache directive.
    pub const NETLIFY_CDN_CACHE_CONTROL: &str = "Netlify-CDN-Cache-Control";
}

/// How synthesized headers interact with headers the handler already set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheHeaderMode {
    /// Always replace existing values.
    #[default]
    Overwrite,
    /// Only write a header the handler did not set.
    PreserveExisting,
}

/// Writes `Cache-Control` and the provider cache header for ISR routes.
#[derive(Debug, Clone)]
pub struct CacheHeaderInjector {
    provider_header: String,
    mode: CacheHeaderMode,
}

impl Default for CacheHeaderInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheHeaderInjector {
    /// Create an injector writing the Netlify provider header in overwrite mode.
    pub fn new() -> Self {
        Self {
            provider_header: header_names::NETLIFY_CDN_CACHE_CONTROL.to_string(),
            mode: CacheHeaderMode::Overwrite,
        }
    }

    /// Set the provider cache-control header name.
    pub fn with_provider_header(mut self, name: impl Into<String>) -> Self {
        self.provider_header = name.into();
        self
    }

    /// Set the overwrite mode.
    pub fn with_mode(mut self, mode: CacheHeaderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Provider header name.
    pub fn provider_header(&self) -> &str {
        &self.provider_header
    }

    /// Overwrite mode.
    pub fn mode(&self) -> CacheHeaderMode {
        self.mode
    }

    /// Apply the rule's caching policy to the response headers.
    ///
    /// Returns the legacy `ttl` for the outgoing envelope, `None` when the
    /// route has no ISR policy. The ttl does not depend on the mode.
    pub fn apply(&self, rule: &RouteRule, response: &mut InternalResponse) -> Option<u64> {
        let policy = rule.isr;
        if let Some(value) = policy.cache_control() {
            self.write(response, header_names::CACHE_CONTROL, value.to_string());
        }
        if let Some(value) = policy.provider_cache_control() {
            self.write(response, &self.provider_header, value);
        }
        policy.ttl()
    }

    fn write(&self, response: &mut InternalResponse, name: &str, value: String) {
        if self.mode == CacheHeaderMode::PreserveExisting && response.has_header(name) {
            return;
        }
        response.set_header(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::IsrPolicy;
    use edge_core::HeaderValue;

    fn header<'a>(resp: &'a InternalResponse, name: &str) -> Option<&'a str> {
        resp.header(name).and_then(HeaderValue::first)
    }

    // === Policy Application Tests ===

    #[test]
    fn test_apply_disabled_leaves_headers() {
        let mut resp = InternalResponse::default().with_header("cache-control", "no-store");
        let ttl = CacheHeaderInjector::new().apply(&RouteRule::none(), &mut resp);

        assert_eq!(ttl, None);
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(header(&resp, "Cache-Control"), Some("no-store"));
        assert!(!resp.has_header("Netlify-CDN-Cache-Control"));
    }

    #[test]
    fn test_apply_revalidate() {
        let mut resp = InternalResponse::default();
        let ttl = CacheHeaderInjector::new()
            .apply(&RouteRule::new(IsrPolicy::Revalidate(60)), &mut resp);

        assert_eq!(ttl, Some(60));
        assert_eq!(
            header(&resp, "Cache-Control"),
            Some("public, max-age=0, must-revalidate")
        );
        assert_eq!(
            header(&resp, "Netlify-CDN-Cache-Control"),
            Some("public, max-age=60, must-revalidate")
        );
    }

    #[test]
    fn test_apply_forever() {
        let mut resp = InternalResponse::default();
        let ttl = CacheHeaderInjector::new().apply(&RouteRule::new(IsrPolicy::Forever), &mut resp);

        assert_eq!(ttl, Some(0));
        assert_eq!(
            header(&resp, "Netlify-CDN-Cache-Control"),
            Some("public, max-age=0, stale-while-revalidate=31536000")
        );
    }

    // === Mode Tests ===

    #[test]
    fn test_overwrite_replaces_handler_headers() {
        let mut resp = InternalResponse::default()
            .with_header("cache-control", "no-store")
            .with_header("netlify-cdn-cache-control", "private");

        CacheHeaderInjector::new().apply(&RouteRule::new(IsrPolicy::Revalidate(10)), &mut resp);

        assert_eq!(resp.headers.len(), 2);
        assert_eq!(
            resp.headers.get("Cache-Control"),
            Some(&HeaderValue::from("public, max-age=0, must-revalidate"))
        );
        assert_eq!(
            header(&resp, "Netlify-CDN-Cache-Control"),
            Some("public, max-age=10, must-revalidate")
        );
    }

    #[test]
    fn test_preserve_existing_keeps_handler_headers() {
        let mut resp = InternalResponse::default().with_header("cache-control", "no-store");

        let ttl = CacheHeaderInjector::new()
            .with_mode(CacheHeaderMode::PreserveExisting)
            .apply(&RouteRule::new(IsrPolicy::Revalidate(10)), &mut resp);

        assert_eq!(ttl, Some(10));
        assert_eq!(header(&resp, "Cache-Control"), Some("no-store"));
        assert_eq!(
            header(&resp, "Netlify-CDN-Cache-Control"),
            Some("public, max-age=10, must-revalidate")
        );
    }

    #[test]
    fn test_custom_provider_header() {
        let injector = CacheHeaderInjector::new().with_provider_header("CDN-Cache-Control");
        let mut resp = InternalResponse::default();
        injector.apply(&RouteRule::new(IsrPolicy::Forever), &mut resp);

        assert_eq!(injector.provider_header(), "CDN-Cache-Control");
        assert!(resp.has_header("CDN-Cache-Control"));
        assert!(!resp.has_header("Netlify-CDN-Cache-Control"));
    }

    #[test]
    fn test_mode_deserialize() {
        let mode: CacheHeaderMode = serde_json::from_str(r#""preserve-existing""#).unwrap();
        assert_eq!(mode, CacheHeaderMode::PreserveExisting);
        assert_eq!(CacheHeaderMode::default(), CacheHeaderMode::Overwrite);
    }
}
