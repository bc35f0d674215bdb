//! Outgoing body classification and encoding.

use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD, Engine};
use edge_core::ResponseBody;
use regex::Regex;
use serde::Serialize;

/// Content types whose payload is text.
static TEXT_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^text/|/(javascript|json|xml)|\+(json|xml)\b|utf-?8")
        .expect("text content type pattern is valid")
});

/// How the outgoing body is transported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Text,
    Binary,
}

impl BodyKind {
    /// Name used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }
}

/// A classified, gateway-ready body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedBody {
    pub kind: BodyKind,
    /// UTF-8 text, or base64 for binary payloads.
    pub body: String,
}

impl EncodedBody {
    fn text(body: impl Into<String>) -> Self {
        Self {
            kind: BodyKind::Text,
            body: body.into(),
        }
    }

    fn binary(bytes: &[u8]) -> Self {
        Self {
            kind: BodyKind::Binary,
            body: STANDARD.encode(bytes),
        }
    }

    /// Value of the envelope's `isBase64Encoded` flag.
    pub fn is_base64_encoded(&self) -> bool {
        self.kind == BodyKind::Binary
    }
}

/// Classify and encode a response body.
///
/// String bodies are already decoded and pass through as text. Byte bodies
/// are text only when the content type is textual and the bytes decode under
/// its charset; everything else is base64-encoded.
pub fn encode_outgoing_body(body: &ResponseBody, content_type: Option<&str>) -> EncodedBody {
    match body {
        ResponseBody::Empty => EncodedBody::text(""),
        ResponseBody::Text(text) => EncodedBody::text(text.as_str()),
        ResponseBody::Binary(bytes) => content_type
            .filter(|ct| is_text_type(ct))
            .and_then(|ct| decode_text(bytes, charset(ct)))
            .map(EncodedBody::text)
            .unwrap_or_else(|| EncodedBody::binary(bytes)),
    }
}

/// Check if a content type describes text.
pub fn is_text_type(content_type: &str) -> bool {
    TEXT_TYPE_RE.is_match(content_type.trim())
}

/// The `charset` parameter of a content type, unquoted and lowercased.
fn charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_ascii_lowercase())
    })
}

/// Decode bytes under a charset into UTF-8, `None` if they are not valid in it.
fn decode_text(bytes: &[u8], charset: Option<String>) -> Option<String> {
    match charset.as_deref() {
        None | Some("utf-8") | Some("utf8") => String::from_utf8(bytes.to_vec()).ok(),
        Some("us-ascii") | Some("ascii") => bytes
            .is_ascii()
            .then(|| bytes.iter().map(|&b| b as char).collect()),
        Some("iso-8859-1") | Some("latin1") | Some("latin-1") => {
            Some(bytes.iter().map(|&b| b as char).collect())
        }
        Some(_) => None,
    }
}
