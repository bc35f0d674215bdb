//! Local invocation of a gateway event against a recorded response.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use edge_core::{
    DispatchError, Dispatcher, IncomingEvent, InternalRequest, InternalResponse, OutgoingResponse,
    ResponseBody, ResponseHeaders,
};
use edge_lambda::LambdaAdapter;
use serde::Deserialize;

use super::InvokeArgs;
use crate::context::Context;
use crate::output::format_bytes;

/// A dispatcher response recorded as JSON.
///
/// `bodyBase64` takes precedence over `body` and yields a byte body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseFixture {
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub headers: ResponseHeaders,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub body_base64: Option<String>,
}

fn default_status() -> u16 {
    200
}

impl ResponseFixture {
    /// Load a fixture from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read response fixture: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse response fixture: {}", path.display()))
    }

    /// Convert into the response the dispatcher returns.
    pub fn into_response(self) -> Result<InternalResponse> {
        let body = match (self.body_base64, self.body) {
            (Some(encoded), _) => ResponseBody::Binary(
                STANDARD
                    .decode(encoded.trim())
                    .context("bodyBase64 is not valid base64")?,
            ),
            (None, Some(text)) => ResponseBody::Text(text),
            (None, None) => ResponseBody::Empty,
        };

        Ok(InternalResponse::new(self.status, self.headers, body))
    }
}

/// Dispatcher that answers every request with the same recorded response.
pub struct FixtureDispatcher {
    response: InternalResponse,
}

impl FixtureDispatcher {
    pub fn new(response: InternalResponse) -> Self {
        Self { response }
    }
}

#[async_trait]
impl Dispatcher for FixtureDispatcher {
    async fn dispatch(&self, request: InternalRequest) -> Result<InternalResponse, DispatchError> {
        tracing::debug!(method = %request.method, url = %request.url, "fixture dispatch");
        Ok(self.response.clone())
    }
}

/// Run the invoke command.
pub async fn run(args: InvokeArgs, ctx: &Context) -> Result<()> {
    let event_path = ctx.resolve_path(&args.event);
    let mut event = load_event(&event_path)?;
    if let Some(id) = args.request_id {
        set_request_id(&mut event, id);
    }

    let fixture_path = ctx.resolve_path(&args.response);
    let response = ResponseFixture::load(&fixture_path)?.into_response()?;

    ctx.output.debug(&format!("Event: {}", event_path.display()));
    ctx.output.debug(&format!("Fixture: {}", fixture_path.display()));
    ctx.output
        .debug(&format!("Route rules: {}", ctx.config.route_rules.len()));

    let adapter = LambdaAdapter::new(
        Arc::new(FixtureDispatcher::new(response)),
        Arc::new(ctx.config.route_table()),
    )
    .with_config(ctx.config.adapter.clone());

    let outgoing = adapter.handle(event).await?;

    if !ctx.output.is_json() {
        print_summary(&outgoing, ctx);
    }
    ctx.output.json(&outgoing);

    Ok(())
}

fn load_event(path: &Path) -> Result<IncomingEvent> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse event file: {}", path.display()))
}

fn set_request_id(event: &mut IncomingEvent, id: String) {
    if !event.context.is_object() {
        event.context = serde_json::json!({});
    }
    if let Some(context) = event.context.as_object_mut() {
        context.insert("awsRequestId".to_string(), serde_json::Value::String(id));
    }
}

fn print_summary(response: &OutgoingResponse, ctx: &Context) {
    ctx.output.header("Gateway Response");
    ctx.output.kv("status", &response.status_code.to_string());
    ctx.output.kv(
        "body",
        &format!(
            "{} ({})",
            if response.is_base64_encoded { "base64" } else { "text" },
            format_bytes(response.body.len() as u64)
        ),
    );
    if let Some(ttl) = response.ttl {
        ctx.output.kv("ttl", &format!("{}s", ttl));
    }

    let mut names: Vec<&String> = response.headers.keys().collect();
    names.sort();
    for name in names {
        ctx.output
            .list_item(&format!("{}: {}", name, response.headers[name]));
    }

    if let Some(cookies) = &response.multi_value_headers {
        for cookie in &cookies.set_cookie {
            ctx.output.list_item(&format!("set-cookie: {}", cookie));
        }
    }
    ctx.output.info("");
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_core::HeaderValue;

    // === Fixture Tests ===

    #[test]
    fn test_fixture_text_body() {
        let fixture: ResponseFixture = serde_json::from_str(
            r#"{"status": 201, "headers": {"content-type": "text/plain"}, "body": "created"}"#,
        )
        .unwrap();
        let response = fixture.into_response().unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.body, ResponseBody::Text("created".to_string()));
        assert_eq!(response.content_type(), Some("text/plain"));
    }

    #[test]
    fn test_fixture_base64_body() {
        let fixture: ResponseFixture =
            serde_json::from_str(r#"{"bodyBase64": "iVBORw==", "body": "ignored"}"#).unwrap();
        let response = fixture.into_response().unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            ResponseBody::Binary(vec![0x89, 0x50, 0x4e, 0x47])
        );
    }

    #[test]
    fn test_fixture_sequence_headers() {
        let fixture: ResponseFixture =
            serde_json::from_str(r#"{"headers": {"set-cookie": ["a=1", "b=2"]}}"#).unwrap();
        let response = fixture.into_response().unwrap();

        assert_eq!(
            response.header("Set-Cookie"),
            Some(&HeaderValue::Multi(vec!["a=1".to_string(), "b=2".to_string()]))
        );
        assert_eq!(response.body, ResponseBody::Empty);
    }

    #[test]
    fn test_fixture_invalid_base64() {
        let fixture: ResponseFixture = serde_json::from_str(r#"{"bodyBase64": "%%%"}"#).unwrap();
        assert!(fixture.into_response().is_err());
    }

    // === Invocation Tests ===

    #[test]
    fn test_set_request_id_on_null_context() {
        let mut event = IncomingEvent::new("/");
        set_request_id(&mut event, "req-7".to_string());
        assert_eq!(event.context["awsRequestId"], "req-7");
    }

    #[tokio::test]
    async fn test_fixture_dispatcher_through_adapter() {
        let response = InternalResponse::new(200, ResponseHeaders::new(), "ok")
            .with_header("content-type", "text/plain")
            .with_header("set-cookie", "a=1, b=2");
        let adapter = LambdaAdapter::new(
            Arc::new(FixtureDispatcher::new(response)),
            Arc::new(edge_cache::RouteRuleTable::new()),
        );

        let outgoing = adapter.handle(IncomingEvent::new("/")).await.unwrap();

        assert_eq!(outgoing.body, "ok");
        assert_eq!(
            outgoing.multi_value_headers.unwrap().set_cookie,
            vec!["a=1", "b=2"]
        );
    }
}
