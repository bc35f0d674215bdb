//! Gateway v1 event envelopes.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Inbound gateway event (Lambda v1 payload shape).
///
/// Optional maps deserialize to empty maps whether the field is missing or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingEvent {
    /// Request path, possibly carrying its own query string.
    #[serde(default)]
    pub path: String,
    /// Single-value query parameters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub query_string_parameters: HashMap<String, String>,
    /// Multi-value query parameters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub multi_value_query_string_parameters: HashMap<String, Vec<String>>,
    /// HTTP method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    /// Request headers as received.
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,
    /// Raw request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Accepted but not acted upon: incoming bodies are passed through as received.
    #[serde(default)]
    pub is_base64_encoded: bool,
    /// Opaque invocation context.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub context: serde_json::Value,
}

impl IncomingEvent {
    /// Create an event for a path with everything else empty.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set the HTTP method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.http_method = Some(method.into());
        self
    }

    /// Add a single-value query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters.insert(key.into(), value.into());
        self
    }

    /// Add a multi-value query parameter.
    pub fn with_multi_query(mut self, key: impl Into<String>, values: Vec<&str>) -> Self {
        self.multi_value_query_string_parameters
            .insert(key.into(), values.into_iter().map(String::from).collect());
        self
    }

    /// Add a request header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the raw body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the invocation context.
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Multi-value headers on the outgoing envelope. Only cookies travel here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiValueHeaders {
    #[serde(rename = "set-cookie")]
    pub set_cookie: Vec<String>,
}

/// Outgoing gateway response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Flat string-valued headers.
    pub headers: HashMap<String, String>,
    /// Body, base64-encoded when `is_base64_encoded` is set.
    pub body: String,
    /// Whether `body` is base64.
    pub is_base64_encoded: bool,
    /// Present only when at least one cookie was set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_headers: Option<MultiValueHeaders>,
    /// Legacy builder TTL, present only for ISR routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}
