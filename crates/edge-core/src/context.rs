//! Internal HTTP call types passed to and returned from the dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::event::IncomingEvent;

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        let id = format!(
            "{:x}-{:x}-{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
            rand::random::<u32>(),
            rand::random::<u32>()
        );
        Self(id)
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Take the platform request id from an invocation context, if it carries one.
    ///
    /// Lambda-style contexts expose it as `awsRequestId`.
    pub fn from_context(context: &serde_json::Value) -> Option<Self> {
        context
            .get("awsRequestId")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(Self::from_string)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request headers after normalization (lowercase names, single values).
pub type Headers = HashMap<String, String>;

/// A response header value: either a single string or a sequence of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Multi(Vec<String>),
}

impl HeaderValue {
    /// Iterate over the individual values.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multi(vs) => vs,
        };
        slice.iter().map(String::as_str)
    }

    /// Join all values into one string with the given delimiter.
    pub fn join(&self, delimiter: &str) -> String {
        match self {
            Self::Single(v) => v.clone(),
            Self::Multi(vs) => vs.join(delimiter),
        }
    }

    /// The first value, if any.
    pub fn first(&self) -> Option<&str> {
        self.values().next()
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

/// Response headers as produced by the dispatcher.
pub type ResponseHeaders = HashMap<String, HeaderValue>;

/// A merged query parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// Iterate over the individual values.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multi(vs) => vs,
        };
        slice.iter().map(String::as_str)
    }

    /// Consume into the individual values.
    pub fn into_values(self) -> Vec<String> {
        match self {
            Self::Single(v) => vec![v],
            Self::Multi(vs) => vs,
        }
    }
}

/// Merged query parameters.
pub type QueryParams = HashMap<String, QueryValue>;

/// The generic internal HTTP call handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct InternalRequest {
    /// Path plus merged query string.
    pub url: String,
    /// HTTP method as received (defaults applied).
    pub method: String,
    /// Normalized request headers.
    pub headers: Headers,
    /// Merged query parameters.
    pub query: QueryParams,
    /// Raw request body.
    pub body: Option<String>,
    /// Opaque invocation context, passed through untouched.
    pub context: serde_json::Value,
    /// The original gateway event.
    pub event: Arc<IncomingEvent>,
}

impl InternalRequest {
    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response body as produced by the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponseBody {
    /// No body.
    #[default]
    Empty,
    /// An already-decoded string body.
    Text(String),
    /// Raw bytes whose encoding is described by the headers.
    Binary(Vec<u8>),
}

impl From<&str> for ResponseBody {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ResponseBody {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

/// The generic internal HTTP response returned by the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct InternalResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: ResponseHeaders,
    /// Response body.
    pub body: ResponseBody,
}

impl InternalResponse {
    /// Create a new response.
    pub fn new(status: u16, headers: ResponseHeaders, body: impl Into<ResponseBody>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Add a header, replacing any existing header with the same name (case-insensitive).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Check whether a header is present (case-insensitive).
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Set a header, removing every differently-cased variant first.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<HeaderValue>) {
        let name = name.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header(http::header::CONTENT_TYPE.as_str())
            .and_then(HeaderValue::first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === RequestId Tests ===

    #[test]
    fn test_request_id_generate_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_request_id_from_context() {
        let context = serde_json::json!({ "awsRequestId": "abc-123" });
        assert_eq!(
            RequestId::from_context(&context),
            Some(RequestId::from_string("abc-123"))
        );
    }

    #[test]
    fn test_request_id_from_context_missing() {
        assert_eq!(RequestId::from_context(&serde_json::Value::Null), None);
        let context = serde_json::json!({ "awsRequestId": "" });
        assert_eq!(RequestId::from_context(&context), None);
    }

    // === HeaderValue Tests ===

    #[test]
    fn test_header_value_join() {
        assert_eq!(HeaderValue::from("a").join(","), "a");
        let multi = HeaderValue::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(multi.join(","), "a,b");
        assert_eq!(multi.first(), Some("a"));
    }

    #[test]
    fn test_header_value_deserialize_untagged() {
        let single: HeaderValue = serde_json::from_str(r#""text/html""#).unwrap();
        assert_eq!(single, HeaderValue::from("text/html"));

        let multi: HeaderValue = serde_json::from_str(r#"["a=1", "b=2"]"#).unwrap();
        assert_eq!(multi.values().collect::<Vec<_>>(), vec!["a=1", "b=2"]);
    }

    // === InternalResponse Tests ===

    #[test]
    fn test_response_header_case_insensitive() {
        let resp = InternalResponse::default().with_header("Content-Type", "text/plain");
        assert_eq!(resp.content_type(), Some("text/plain"));
        assert!(resp.has_header("content-type"));
        assert!(!resp.has_header("x-missing"));
    }

    #[test]
    fn test_response_set_header_replaces_case_variants() {
        let mut resp = InternalResponse::default().with_header("cache-control", "no-store");
        resp.set_header("Cache-Control", "public");

        assert_eq!(resp.headers.len(), 1);
        assert_eq!(
            resp.headers.get("Cache-Control"),
            Some(&HeaderValue::from("public"))
        );
    }

    #[test]
    fn test_response_body_conversions() {
        assert_eq!(ResponseBody::from("hi"), ResponseBody::Text("hi".to_string()));
        assert_eq!(ResponseBody::from(vec![1u8, 2]), ResponseBody::Binary(vec![1, 2]));
        assert_eq!(ResponseBody::default(), ResponseBody::Empty);
    }
}
