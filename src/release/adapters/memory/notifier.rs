//! Recording notifier for tests and local flows.

use async_trait::async_trait;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};

use crate::release::{
    domain::Notification,
    ports::{NotificationError, NotificationResult, Notifier},
};

/// Notifier that keeps every delivered notification in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<Notification>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later delivery fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the notifications delivered so far.
    ///
    /// # Errors
    ///
    /// Returns a delivery error when lock acquisition fails.
    pub fn sent(&self) -> NotificationResult<Vec<Notification>> {
        let sent = self
            .sent
            .read()
            .map_err(|err| NotificationError::delivery(std::io::Error::other(err.to_string())))?;
        Ok(sent.clone())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> NotificationResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::delivery(std::io::Error::other(
                "notification channel unavailable",
            )));
        }
        let mut sent = self
            .sent
            .write()
            .map_err(|err| NotificationError::delivery(std::io::Error::other(err.to_string())))?;
        sent.push(notification.clone());
        Ok(())
    }
}
