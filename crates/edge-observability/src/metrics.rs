//! Per-invocation timing and outcome metrics.

use edge_core::{InvocationPhase, RequestId, TimingContext};
use serde::{Deserialize, Serialize};

/// Metrics for a single gateway invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationMetrics {
    /// Request ID for correlation.
    pub request_id: String,
    /// Effective request URL.
    pub url: String,
    /// HTTP method.
    pub method: String,
    /// Status code returned by the dispatcher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Time spent waiting on the dispatcher (microseconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch_us: Option<u64>,
    /// Total invocation time (microseconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_us: Option<u64>,
    /// `text` or `binary`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_kind: Option<String>,
    /// Encoded body length in bytes.
    pub body_bytes: usize,
    /// Number of cookies moved to multi-value headers.
    pub cookie_count: usize,
    /// Legacy ttl attached to the envelope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl InvocationMetrics {
    /// Start metrics for an invocation.
    pub fn new(request_id: &RequestId, url: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            request_id: request_id.to_string(),
            url: url.into(),
            method: method.into(),
            ..Default::default()
        }
    }

    /// Copy durations out of the timing context.
    pub fn record_timing(&mut self, timing: &TimingContext) {
        self.dispatch_us = timing.dispatch_duration().map(|d| d.as_micros() as u64);
        self.total_us = Some(
            timing
                .since_start(InvocationPhase::Completion)
                .unwrap_or_else(|| timing.elapsed())
                .as_micros() as u64,
        );
    }

    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Format as human-readable summary.
    pub fn to_summary(&self) -> String {
        let mut lines = vec![format!(
            "{} {} -> {}",
            self.method.to_uppercase(),
            self.url,
            self.status_code
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string())
        )];

        if let Some(dispatch) = self.dispatch_us {
            lines.push(format!(
                "  Dispatch: {}us ({:.2}ms)",
                dispatch,
                dispatch as f64 / 1000.0
            ));
        }

        if let Some(total) = self.total_us {
            lines.push(format!("  Total: {}us ({:.2}ms)", total, total as f64 / 1000.0));
        }

        if let Some(kind) = &self.body_kind {
            lines.push(format!("  Body: {} ({} bytes)", kind, self.body_bytes));
        }

        if self.cookie_count > 0 {
            lines.push(format!("  Cookies: {}", self.cookie_count));
        }

        if let Some(ttl) = self.ttl {
            lines.push(format!("  TTL: {}s", ttl));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> InvocationMetrics {
        InvocationMetrics::new(&RequestId::from_string("req-9"), "/blog", "get")
    }

    #[test]
    fn test_new_metrics() {
        let m = metrics();
        assert_eq!(m.request_id, "req-9");
        assert_eq!(m.url, "/blog");
        assert!(m.status_code.is_none());
        assert_eq!(m.cookie_count, 0);
    }

    #[test]
    fn test_record_timing() {
        let mut timing = TimingContext::new();
        timing.mark(InvocationPhase::DispatchStart);
        timing.mark(InvocationPhase::DispatchEnd);
        timing.mark(InvocationPhase::Completion);

        let mut m = metrics();
        m.record_timing(&timing);

        assert!(m.dispatch_us.is_some());
        assert!(m.total_us.unwrap() >= m.dispatch_us.unwrap());
    }

    #[test]
    fn test_to_json_skips_unset() {
        let json: serde_json::Value = serde_json::from_str(&metrics().to_json()).unwrap();
        assert_eq!(json["method"], "get");
        assert!(json.get("ttl").is_none());
        assert!(json.get("status_code").is_none());
    }

    #[test]
    fn test_summary() {
        let mut m = metrics();
        m.status_code = Some(200);
        m.body_kind = Some("binary".to_string());
        m.body_bytes = 8;
        m.cookie_count = 2;
        m.ttl = Some(60);

        let summary = m.to_summary();
        assert!(summary.starts_with("GET /blog -> 200"));
        assert!(summary.contains("Body: binary (8 bytes)"));
        assert!(summary.contains("Cookies: 2"));
        assert!(summary.contains("TTL: 60s"));
    }
}
