//! Notification collaborator port.

use crate::release::domain::Notification;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification delivery.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Fire-and-forget delivery of lifecycle notifications.
///
/// Services log delivery failures and carry on; a notifier error never fails
/// a lifecycle operation.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers a notification to its recipients.
    async fn notify(&self, notification: &Notification) -> NotificationResult<()>;
}

/// Errors returned by notification adapters.
#[derive(Debug, Clone, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotificationError(pub Arc<dyn std::error::Error + Send + Sync>);

impl NotificationError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
