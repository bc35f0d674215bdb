//! Route caching policy and cache header synthesis for the edge adapter.
//!
//! This crate provides:
//! - `IsrPolicy` / `RouteRule` - Per-route revalidation policy
//! - `RouteRuleResolver` - Lookup of the rule for a URL
//! - `RouteRuleTable` - Static exact-path rule table
//! - `CacheHeaderInjector` - `Cache-Control` and provider header synthesis
//!
//! # Example
//!
//! ```ignore
//! use edge_cache::{CacheHeaderInjector, IsrPolicy, RouteRule, RouteRuleTable};
//!
//! let rules = RouteRuleTable::new()
//!     .with_rule("/blog", RouteRule::new(IsrPolicy::Revalidate(60)));
//!
//! let injector = CacheHeaderInjector::new();
//! let ttl = injector.apply(&rules.resolve("/blog?page=2"), &mut response);
//! assert_eq!(ttl, Some(60));
//! ```

mod headers;
mod policy;

pub use headers::*;
pub use policy::*;
