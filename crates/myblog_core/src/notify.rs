//! Notification sink for success/error messages.
//!
//! Notifications are fire-and-forget: callers never inspect a result.

use log::{debug, warn};
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Receives user-facing messages.
pub trait Notifier {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification {
            kind: NotificationKind::Success,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Notification {
            kind: NotificationKind::Error,
            message: message.to_string(),
        });
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Buffers notifications until a presenter drains them.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: RefCell<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of buffered notifications, oldest first.
    pub fn entries(&self) -> Vec<Notification> {
        self.entries.borrow().clone()
    }

    /// Removes and returns buffered notifications, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.entries.borrow_mut().drain(..).collect()
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|entry| entry.kind == NotificationKind::Error)
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => debug!("event=notify module=notify kind=success"),
            NotificationKind::Error => warn!("event=notify module=notify kind=error"),
        }
        self.entries.borrow_mut().push(notification);
    }
}
