// Toast channel - transient notifications from controller actions to the renderer
//
// Failed API calls never propagate to the user as errors; they become toasts.
// The channel is bounded so a renderer that stops draining cannot grow memory.

use crate::metrics::Metrics;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Toast capacity; further toasts are dropped until the renderer catches up
pub const TOAST_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Sending half of the toast channel
///
/// Cloneable so spawned requests can report their own failures.
#[derive(Debug, Clone)]
pub struct ToastSender {
    tx: mpsc::Sender<Toast>,
    metrics: Arc<Metrics>,
}

impl ToastSender {
    /// Create a bounded toast channel
    pub fn channel(metrics: Arc<Metrics>) -> (Self, mpsc::Receiver<Toast>) {
        let (tx, rx) = mpsc::channel(TOAST_CAPACITY);
        (Self { tx, metrics }, rx)
    }

    /// Queue a toast without waiting
    pub fn show(&self, level: ToastLevel, message: impl Into<String>) {
        let toast = Toast {
            level,
            message: message.into(),
        };

        match self.tx.try_send(toast) {
            Ok(_) => {}
            Err(mpsc::error::TrySendError::Full(toast)) => {
                self.metrics.record_toast_dropped();
                tracing::warn!("Toast channel full - dropping toast: {}", toast.message);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!("Toast receiver closed - toast discarded");
            }
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(ToastLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastLevel::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(ToastLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_toasts_are_delivered_in_order() {
        let (sender, mut rx) = ToastSender::channel(Arc::new(Metrics::new()));

        sender.info("first");
        sender.error("second");

        assert_eq!(rx.try_recv().unwrap().message, "first");
        let second = rx.try_recv().unwrap();
        assert_eq!(second.level, ToastLevel::Error);
        assert_eq!(second.message, "second");
    }

    #[test]
    fn test_full_channel_drops_and_counts() {
        let metrics = Arc::new(Metrics::new());
        let (sender, _rx) = ToastSender::channel(Arc::clone(&metrics));

        for i in 0..TOAST_CAPACITY + 3 {
            sender.info(format!("toast {i}"));
        }

        assert_eq!(metrics.toasts_dropped.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (sender, rx) = ToastSender::channel(Arc::new(Metrics::new()));
        drop(rx);
        sender.warning("nobody listening");
    }
}
