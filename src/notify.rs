use tokio::sync::mpsc;
use tracing::{error, info};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A non-blocking, user-facing notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Sending half of the notification stream.
///
/// Sending never blocks and never fails: if the receiving side is gone the
/// notification still lands in the logs. Superseded listing responses never
/// produce a notification.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        let _ = self.tx.send(Notification {
            severity: Severity::Success,
            message,
        });
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        error!("{}", message);
        let _ = self.tx.send(Notification {
            severity: Severity::Error,
            message,
        });
    }
}
