use std::sync::Arc;

use tracing::Span;

use crate::SignalError;

/// Sink for leaf failures. Observability only: nothing a tracer does can
/// change an evaluation's result.
pub trait Tracer: Send + Sync {
    /// Whether there is an active span that is recording. Failures are only
    /// reported while this is `true`.
    fn is_recording(&self) -> bool;

    fn record_exception(&self, error: &SignalError);
}

/// Reports failures onto the current [`tracing`] span.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpanTracer;

impl Tracer for SpanTracer {
    fn is_recording(&self) -> bool {
        !Span::current().is_disabled()
    }

    fn record_exception(&self, error: &SignalError) {
        Span::current().in_scope(|| {
            tracing::error!(error = %error, kind = error.kind(), "signal evaluation failed");
        });
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn is_recording(&self) -> bool {
        false
    }

    fn record_exception(&self, _error: &SignalError) {}
}

impl<T: Tracer + ?Sized> Tracer for Arc<T> {
    fn is_recording(&self) -> bool {
        (**self).is_recording()
    }

    fn record_exception(&self, error: &SignalError) {
        (**self).record_exception(error);
    }
}

impl<T: Tracer + ?Sized> Tracer for &T {
    fn is_recording(&self) -> bool {
        (**self).is_recording()
    }

    fn record_exception(&self, error: &SignalError) {
        (**self).record_exception(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_never_records() {
        assert!(!NoopTracer.is_recording());
        NoopTracer.record_exception(&SignalError::message("ignored"));
    }

    #[test]
    fn span_tracer_outside_any_span_is_not_recording() {
        assert!(!SpanTracer.is_recording());
    }

    #[test]
    fn span_tracer_records_inside_enabled_span() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("evaluate");
            let _guard = span.enter();
            assert!(SpanTracer.is_recording());
            SpanTracer.record_exception(&SignalError::message("classifier unavailable"));
        });
    }
}
