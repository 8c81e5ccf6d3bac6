//! User-facing notification capability.
//!
//! The gateway never renders anything itself; it reports user-facing outcomes
//! through an injected [`NotificationSink`]. Production wiring supplies
//! whatever the host application uses for toasts; tests supply a recording
//! sink and assert on exactly what was shown.

use std::fmt;

/// Visual style of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastStyle {
    Neutral,
    Info,
    Warning,
    Error,
}

/// A transient, non-blocking user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Optional short title.
    pub title: Option<String>,

    /// The message body.
    pub message: String,

    /// Visual style.
    pub style: ToastStyle,
}

impl Toast {
    /// Creates a warning toast with a title.
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Toast {
            title: Some(title.into()),
            message: message.into(),
            style: ToastStyle::Warning,
        }
    }

    /// Creates an error toast with a title.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Toast {
            title: Some(title.into()),
            message: message.into(),
            style: ToastStyle::Error,
        }
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{}: {}", title, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Sink for user-facing notifications.
///
/// Injected into the gateway so user-visible output is testable without
/// global state.
pub trait NotificationSink: Send + Sync {
    /// Shows a classified toast.
    fn show_toast(&self, toast: Toast);

    /// Shows an error notification carrying the underlying failure for
    /// diagnostic display.
    fn show_error(&self, title: &str, error: &dyn std::error::Error);
}

/// Notification sink that routes through `tracing`.
///
/// Suitable for headless deployments where there is no UI to toast into.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn show_toast(&self, toast: Toast) {
        match toast.style {
            ToastStyle::Error => tracing::error!(toast = %toast, "toast"),
            ToastStyle::Warning => tracing::warn!(toast = %toast, "toast"),
            ToastStyle::Neutral | ToastStyle::Info => tracing::info!(toast = %toast, "toast"),
        }
    }

    fn show_error(&self, title: &str, error: &dyn std::error::Error) {
        tracing::error!(error = %error, "{title}");
    }
}
