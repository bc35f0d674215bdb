//! Invocation lifecycle tracking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Lifecycle phases for one gateway invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationPhase {
    /// Event received, internal request being built.
    Start,
    /// Internal request handed to the dispatcher.
    DispatchStart,
    /// Dispatcher returned a response.
    DispatchEnd,
    /// Outgoing envelope assembled.
    Completion,
}

/// Timing context for observability.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<InvocationPhase, Instant>,
}

impl TimingContext {
    /// Create a new timing context.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a phase.
    pub fn mark(&mut self, phase: InvocationPhase) {
        self.marks.insert(phase, Instant::now());
    }

    /// Get elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time from start to a recorded phase.
    pub fn since_start(&self, phase: InvocationPhase) -> Option<Duration> {
        self.marks.get(&phase).map(|t| t.duration_since(self.start))
    }

    /// Time between two recorded phases.
    pub fn between(&self, from: InvocationPhase, to: InvocationPhase) -> Option<Duration> {
        let from = self.marks.get(&from)?;
        let to = self.marks.get(&to)?;
        Some(to.saturating_duration_since(*from))
    }

    /// Time spent waiting on the dispatcher.
    pub fn dispatch_duration(&self) -> Option<Duration> {
        self.between(InvocationPhase::DispatchStart, InvocationPhase::DispatchEnd)
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_dispatch_duration() {
        let mut timing = TimingContext::new();
        assert!(timing.dispatch_duration().is_none());

        timing.mark(InvocationPhase::DispatchStart);
        std::thread::sleep(Duration::from_millis(2));
        timing.mark(InvocationPhase::DispatchEnd);

        let dispatch = timing.dispatch_duration().unwrap();
        assert!(dispatch >= Duration::from_millis(2));
        assert!(timing.elapsed() >= dispatch);
    }

    #[test]
    fn test_timing_since_start_unrecorded() {
        let timing = TimingContext::default();
        assert!(timing.since_start(InvocationPhase::Completion).is_none());
    }
}
