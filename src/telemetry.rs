//! Telemetry capture capability.
//!
//! Injected into the gateway so success events are assertable in tests
//! instead of flowing to a process-wide analytics singleton.

/// Event emitted when a pull request is created successfully.
pub const EVENT_PR_CREATED: &str = "PR Successful";

/// Sink for telemetry events.
///
/// Events carry only a name; the transport (analytics backend, log, nothing)
/// is the implementation's concern.
pub trait EventSink: Send + Sync {
    /// Records a named event.
    fn capture(&self, event: &str);
}

/// Event sink that routes through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn capture(&self, event: &str) {
        tracing::info!(event, "telemetry");
    }
}

/// Event sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn capture(&self, _event: &str) {}
}
