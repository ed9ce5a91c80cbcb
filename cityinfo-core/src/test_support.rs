//! Notification sinks and stores for unit and behaviour tests.

use std::sync::{Mutex, PoisonError};

use crate::{MemoryStore, Notification, NotificationError, NotificationSink, seed};

/// Sink that remembers every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    /// Notifications received so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notification::new(subject, body));
        Ok(())
    }
}

/// Sink whose deliveries always fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSink;

impl NotificationSink for FailingSink {
    fn notify(&self, _subject: &str, _body: &str) -> Result<(), NotificationError> {
        Err(NotificationError::new("mail server unreachable"))
    }
}

/// A [`MemoryStore`] holding the seed catalogue.
///
/// # Panics
/// Never in practice: seeding an empty in-memory store cannot fail.
pub fn seeded_store() -> MemoryStore {
    let mut store = MemoryStore::default();
    if let Err(err) = seed::seed_catalogue(&mut store) {
        panic!("seeding an empty memory store failed: {err}");
    }
    store
}
