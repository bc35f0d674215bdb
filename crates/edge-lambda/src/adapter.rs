//! Gateway event adapter.

use std::sync::Arc;

use edge_cache::{CacheHeaderInjector, RouteRuleResolver};
use edge_core::{
    DispatchError, Dispatcher, IncomingEvent, InternalRequest, InvocationPhase, MultiValueHeaders,
    OutgoingResponse, RequestId, TimingContext,
};
use edge_observability::{InvocationMetrics, LogFormat, StructuredLogger};
use tracing::Instrument;

use crate::body::encode_outgoing_body;
use crate::config::AdapterConfig;
use crate::cookie::normalize_cookie_header;
use crate::headers::{normalize_incoming_headers, normalize_outgoing_headers, SET_COOKIE};
use crate::query::{merge_query, with_query};

/// Translates gateway v1 events into internal calls and back.
///
/// The adapter holds no per-invocation state and can serve concurrent
/// invocations from one instance.
pub struct LambdaAdapter {
    dispatcher: Arc<dyn Dispatcher>,
    route_rules: Arc<dyn RouteRuleResolver>,
    injector: CacheHeaderInjector,
    config: AdapterConfig,
}

impl LambdaAdapter {
    /// Create an adapter with the default configuration.
    pub fn new(dispatcher: Arc<dyn Dispatcher>, route_rules: Arc<dyn RouteRuleResolver>) -> Self {
        let config = AdapterConfig::default();
        Self {
            dispatcher,
            route_rules,
            injector: config.cache_header_injector(),
            config,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: AdapterConfig) -> Self {
        self.injector = config.cache_header_injector();
        self.config = config;
        self
    }

    /// Get the active configuration.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Build the internal request for an event.
    pub fn build_request(&self, event: IncomingEvent) -> InternalRequest {
        let query = merge_query(
            &event.query_string_parameters,
            &event.multi_value_query_string_parameters,
        );
        let url = with_query(&event.path, &query);
        let method = event
            .http_method
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.config.default_method.clone());

        InternalRequest {
            url,
            method,
            headers: normalize_incoming_headers(&event.headers),
            query,
            body: event.body.clone(),
            context: event.context.clone(),
            event: Arc::new(event),
        }
    }

    /// Handle one gateway invocation.
    ///
    /// A dispatcher failure is returned unchanged; every other stage is total.
    pub async fn handle(&self, event: IncomingEvent) -> Result<OutgoingResponse, DispatchError> {
        let mut timing = TimingContext::new();
        timing.mark(InvocationPhase::Start);

        let request_id = RequestId::from_context(&event.context).unwrap_or_else(RequestId::generate);
        let request = self.build_request(event);
        let url = request.url.clone();

        let logger = StructuredLogger::new(request_id.clone())
            .with_route(url.as_str())
            .with_format(self.config.log_format);
        let mut metrics = InvocationMetrics::new(&request_id, url.as_str(), request.method.as_str());

        let span = tracing::debug_span!(
            "dispatch",
            request_id = %request_id,
            method = %request.method,
            url = %url
        );

        timing.mark(InvocationPhase::DispatchStart);
        let result = self.dispatcher.dispatch(request).instrument(span).await;
        timing.mark(InvocationPhase::DispatchEnd);

        let mut response = match result {
            Ok(response) => response,
            Err(err) => {
                logger
                    .error_builder("dispatch failed")
                    .field("error", err.to_string())
                    .emit();
                return Err(err);
            }
        };

        let rule = self.route_rules.resolve(&url);
        let ttl = self.injector.apply(&rule, &mut response);

        let cookies = normalize_cookie_header(response.header(SET_COOKIE));
        let body = encode_outgoing_body(&response.body, response.content_type());
        let headers = normalize_outgoing_headers(&response.headers, self.config.strip_cookies);

        logger
            .debug_builder("returned headers")
            .field_u64("status", u64::from(response.status))
            .field_json("headers", &headers)
            .emit();

        timing.mark(InvocationPhase::Completion);
        metrics.status_code = Some(response.status);
        metrics.body_kind = Some(body.kind.as_str().to_string());
        metrics.body_bytes = body.body.len();
        metrics.cookie_count = cookies.len();
        metrics.ttl = ttl;
        metrics.record_timing(&timing);

        match self.config.log_format {
            LogFormat::Json => logger
                .info_builder("invocation complete")
                .field_json("metrics", &metrics)
                .emit(),
            LogFormat::Human => logger.info(&metrics.to_summary()),
        }

        let is_base64_encoded = body.is_base64_encoded();
        Ok(OutgoingResponse {
            status_code: response.status,
            headers,
            body: body.body,
            is_base64_encoded,
            multi_value_headers: (!cookies.is_empty())
                .then(|| MultiValueHeaders { set_cookie: cookies }),
            ttl,
        })
    }
}
