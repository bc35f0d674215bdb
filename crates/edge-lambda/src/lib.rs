//! Gateway v1 (Lambda-style) event adapter.
//!
//! This crate provides:
//! - `LambdaAdapter` - Event to internal call to gateway response orchestration
//! - `merge_query` / `with_query` - Query merging and effective URL construction
//! - `normalize_incoming_headers` / `normalize_outgoing_headers` - Header shaping
//! - `normalize_cookie_header` - Splitting of combined `set-cookie` values
//! - `encode_outgoing_body` - Text or base64 body classification
//! - `AdapterConfig` - Adapter settings loadable from TOML or JSON
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use edge_cache::{IsrPolicy, RouteRule, RouteRuleTable};
//! use edge_lambda::LambdaAdapter;
//!
//! let rules = RouteRuleTable::new().with_rule("/blog", RouteRule::new(IsrPolicy::Revalidate(60)));
//! let adapter = LambdaAdapter::new(Arc::new(MyDispatcher), Arc::new(rules));
//!
//! let response = adapter.handle(event).await?;
//! assert_eq!(response.ttl, Some(60));
//! ```

mod adapter;
mod body;
mod config;
mod cookie;
mod headers;
mod query;

pub use adapter::*;
pub use body::*;
pub use config::*;
pub use cookie::*;
pub use headers::*;
pub use query::*;
