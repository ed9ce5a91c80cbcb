//! Notification sink that writes outgoing mail to the log.

use cityinfo_core::{NotificationError, NotificationSink};
use log::info;

/// Mail notifier that records each message as an `info` log entry instead
/// of delivering it.
///
/// # Examples
/// ```
/// use cityinfo_core::NotificationSink;
/// use cityinfo_data::LogMailer;
///
/// let mailer = LogMailer::new("noreply@cityinfo.example", "admin@cityinfo.example");
/// mailer
///     .notify("Point of interest deleted", "Point of interest Louvre with id 6 was deleted.")
///     .expect("logging never fails");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMailer {
    from: String,
    to: String,
}

impl LogMailer {
    /// Build a mailer with sender and recipient addresses.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Sender address.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.from
    }

    /// Recipient address.
    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.to
    }
}

impl NotificationSink for LogMailer {
    fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        info!(
            target: "cityinfo::mail",
            "mail from {} to {}; subject: {subject}; message: {body}",
            self.from, self.to
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn keeps_configured_addresses() {
        let mailer = LogMailer::new("a@example.com", "b@example.com");
        assert_eq!(mailer.sender(), "a@example.com");
        assert_eq!(mailer.recipient(), "b@example.com");
        assert!(mailer.notify("subject", "body").is_ok());
    }
}
