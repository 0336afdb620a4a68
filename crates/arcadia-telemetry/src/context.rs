//! Request context: a correlation id plus component/operation labels,
//! carried through a `tracing::Span` so related log lines can be
//! grouped without threading extra parameters through every call site.

use tracing::Span;
use uuid::Uuid;

/// A correlation context for one logical unit of work (a session turn,
/// a tool invocation). Cheap to clone; the correlation id is generated
/// once and carried along.
#[derive(Debug, Clone)]
pub struct RequestContext {
    correlation_id: Uuid,
    component: String,
    operation: Option<String>,
}

impl RequestContext {
    /// Start a new context for `component`, with a fresh correlation id.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self { correlation_id: Uuid::new_v4(), component: component.into(), operation: None }
    }

    /// Attach an operation label, shown in the span's fields.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// The correlation id, for embedding in a downstream log line or
    /// returned to a caller that needs to reference this unit of work.
    #[must_use]
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Build the `tracing::Span` this context's fields should be
    /// logged under. Callers `enter()` it for the duration of the work.
    #[must_use]
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "request",
            correlation_id = %self.correlation_id,
            component = %self.component,
            operation = self.operation.as_deref().unwrap_or("-"),
        )
    }
}

/// An entered [`RequestContext`] span, held for the lifetime of the
/// unit of work it covers. Exits the span when dropped.
pub struct RequestGuard {
    _entered: tracing::span::EnteredSpan,
}

impl RequestContext {
    /// Build and enter this context's span in one step.
    #[must_use]
    pub fn enter(&self) -> RequestGuard {
        RequestGuard { _entered: self.span().entered() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_carries_component_and_no_operation() {
        let ctx = RequestContext::new("supervisor");
        assert_eq!(ctx.operation, None);
    }

    #[test]
    fn with_operation_sets_the_label() {
        let ctx = RequestContext::new("supervisor").with_operation("run_turn");
        assert_eq!(ctx.operation.as_deref(), Some("run_turn"));
    }

    #[test]
    fn each_context_gets_a_distinct_correlation_id() {
        let a = RequestContext::new("x");
        let b = RequestContext::new("x");
        assert_ne!(a.correlation_id(), b.correlation_id());
    }
}
