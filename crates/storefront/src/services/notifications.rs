//! Shopper notifications.
//!
//! The JSON API returns the notification in the response body; this port
//! only leaves a trace of it in the logs and the Sentry breadcrumb trail.

use florist_core::{Notification, Notifier};

use crate::error::{Trail, add_breadcrumb};

/// Logs each notification and records it as a Sentry breadcrumb.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::info!(
            title = %notification.title,
            message = %notification.message,
            "Shopper notified"
        );
        add_breadcrumb(
            Trail::Notification,
            &notification.title,
            &[("message", notification.message.as_str())],
        );
    }
}
