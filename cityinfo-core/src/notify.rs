//! Outbound notifications.

use std::sync::Arc;

use thiserror::Error;

/// Failure reported by a [`NotificationSink`].
///
/// Repositories log and discard these; a failed notification never fails the
/// operation that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("notification could not be delivered: {message}")]
pub struct NotificationError {
    message: String,
}

impl NotificationError {
    /// Wrap a delivery failure description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Description supplied by the sink.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Best-effort delivery of a subject and body to some recipient.
pub trait NotificationSink {
    /// Deliver one notification.
    ///
    /// # Errors
    /// Returns [`NotificationError`] when delivery failed.
    fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError>;
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        (**self).notify(subject, body)
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        (**self).notify(subject, body)
    }
}

/// A queued notification awaiting a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
}

impl Notification {
    /// Build a notification from its parts.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}
