//! Tracing spans for authorization and persistence.

use std::time::Instant;
use tracing::{debug_span, info_span, Span};

/// Span around one authorization decision.
pub fn decision_span(action: &str, resource: &str) -> Span {
    debug_span!("authz.decide", action = %action, resource = %resource)
}

/// Span around a store write.
pub fn persist_span(entity: &str, operation: &str) -> Span {
    info_span!("persist", entity = %entity, op = %operation)
}

/// Measures one operation and reports it at debug level when finished.
pub struct Timer {
    started: Instant,
    operation: &'static str,
}

impl Timer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            started: Instant::now(),
            operation,
        }
    }

    /// Emit the elapsed time.
    pub fn finish(self) {
        tracing::debug!(
            operation = %self.operation,
            elapsed_us = %self.started.elapsed().as_micros(),
            "operation finished"
        );
    }
}

/// Time an expression, yielding its value.
#[macro_export]
macro_rules! timed {
    ($name:expr, $body:expr) => {{
        let timer = $crate::spans::Timer::start($name);
        let value = $body;
        timer.finish();
        value
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_without_subscriber_are_usable() {
        let span = decision_span("EDIT", "article");
        let _guard = span.enter();
        let persist = persist_span("article", "insert");
        persist.in_scope(|| tracing::debug!("inside"));
    }

    #[test]
    fn test_timed_macro_returns_value() {
        let value = crate::timed!("sum", (1..=4).sum::<u32>());
        assert_eq!(value, 10);
    }
}
