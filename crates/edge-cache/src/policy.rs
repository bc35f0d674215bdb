//! Route-level revalidation policy and rule lookup.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One year, the staleness window used for unbounded ISR.
pub const STALE_FOREVER_SECS: u64 = 31_536_000;

/// Incremental static regeneration policy for a route.
///
/// Serialized as `false`, `true` or a number of seconds, matching the
/// `isr` field of route rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsrPolicy {
    /// No special caching.
    #[default]
    Disabled,
    /// Revalidate at the edge after this many seconds.
    Revalidate(u64),
    /// Serve stale indefinitely while revalidating in the background.
    Forever,
}

impl IsrPolicy {
    /// Check if this policy changes caching behavior at all.
    ///
    /// A zero-second window counts as disabled, like an unset `isr`.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled | Self::Revalidate(0))
    }

    /// Policy for a revalidation window in seconds; `0` disables ISR.
    pub fn from_seconds(secs: u64) -> Self {
        match secs {
            0 => Self::Disabled,
            secs => Self::Revalidate(secs),
        }
    }

    /// Legacy builder TTL: the revalidation window, or 0 when unbounded.
    pub fn ttl(&self) -> Option<u64> {
        match self {
            Self::Disabled | Self::Revalidate(0) => None,
            Self::Revalidate(secs) => Some(*secs),
            Self::Forever => Some(0),
        }
    }

    /// Browser-facing `Cache-Control` value.
    pub fn cache_control(&self) -> Option<&'static str> {
        self.is_enabled()
            .then_some("public, max-age=0, must-revalidate")
    }

    /// Provider edge cache-control value.
    pub fn provider_cache_control(&self) -> Option<String> {
        match self {
            Self::Disabled | Self::Revalidate(0) => None,
            Self::Revalidate(secs) => Some(format!("public, max-age={}, must-revalidate", secs)),
            Self::Forever => Some(format!(
                "public, max-age=0, stale-while-revalidate={}",
                STALE_FOREVER_SECS
            )),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawIsr {
    Flag(bool),
    Seconds(u64),
    Fractional(f64),
}

impl Serialize for IsrPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = match self {
            Self::Disabled | Self::Revalidate(0) => RawIsr::Flag(false),
            Self::Revalidate(secs) => RawIsr::Seconds(*secs),
            Self::Forever => RawIsr::Flag(true),
        };
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IsrPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawIsr>::deserialize(deserializer)? {
            None | Some(RawIsr::Flag(false)) => Self::Disabled,
            Some(RawIsr::Flag(true)) => Self::Forever,
            Some(RawIsr::Seconds(secs)) => Self::from_seconds(secs),
            // Partial seconds round up; zero, negative and NaN disable.
            Some(RawIsr::Fractional(secs)) if secs > 0.0 => {
                Self::from_seconds(secs.ceil() as u64)
            }
            Some(RawIsr::Fractional(_)) => Self::Disabled,
        })
    }
}

/// Resolved rule for a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// Revalidation policy.
    #[serde(default)]
    pub isr: IsrPolicy,
}

impl RouteRule {
    /// Create a rule with the given ISR policy.
    pub fn new(isr: IsrPolicy) -> Self {
        Self { isr }
    }

    /// A rule with no special caching.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Resolves the route rule for an effective request URL.
///
/// Lookups are synchronous and side-effect free; implementations are read
/// concurrently by every invocation.
pub trait RouteRuleResolver: Send + Sync {
    /// Return the rule for the given URL (path plus optional query).
    fn resolve(&self, url: &str) -> RouteRule;
}

impl<F> RouteRuleResolver for F
where
    F: Fn(&str) -> RouteRule + Send + Sync,
{
    fn resolve(&self, url: &str) -> RouteRule {
        self(url)
    }
}

/// Static route rule table keyed by exact path.
#[derive(Debug, Clone, Default)]
pub struct RouteRuleTable {
    rules: HashMap<String, RouteRule>,
    fallback: RouteRule,
}

impl RouteRuleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule for an exact path.
    pub fn with_rule(mut self, path: impl Into<String>, rule: RouteRule) -> Self {
        self.rules.insert(path.into(), rule);
        self
    }

    /// Rule returned when no path matches.
    pub fn with_fallback(mut self, rule: RouteRule) -> Self {
        self.fallback = rule;
        self
    }

    /// Number of explicit rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table has no explicit rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<(String, RouteRule)> for RouteRuleTable {
    fn from_iter<I: IntoIterator<Item = (String, RouteRule)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
            fallback: RouteRule::none(),
        }
    }
}

impl RouteRuleResolver for RouteRuleTable {
    fn resolve(&self, url: &str) -> RouteRule {
        self.rules
            .get(path_of(url))
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// The path portion of a URL, without query string or fragment.
pub fn path_of(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}
