//! In-process notification bus.
//!
//! Payloads go through the same JSON encoding as the PostgreSQL bus, so subscribers
//! exercise the same decode path.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::{
    domain::{
        Notification, NotificationError, NotificationPublisher, NotificationSubscriber,
        RawNotification,
    },
    infrastructure::dto::notification::encode_notification,
};

const DEFAULT_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct InMemoryNotificationBus {
    sender: broadcast::Sender<RawNotification>,
}

impl Default for InMemoryNotificationBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl InMemoryNotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// New subscription receiving everything published from now on.
    pub fn subscribe(&self) -> InMemoryNotificationSubscriber {
        InMemoryNotificationSubscriber {
            receiver: self.sender.subscribe(),
        }
    }
}

#[async_trait]
impl NotificationPublisher for InMemoryNotificationBus {
    async fn publish(&self, notification: &Notification) -> Result<(), NotificationError> {
        let (channel, payload) = encode_notification(notification)?;
        tracing::debug!("Published on '{}': {}", channel, payload);

        // No subscribers is not an error; there is simply nobody to tell.
        let _ = self.sender.send(RawNotification {
            channel: channel.as_str().to_string(),
            payload,
        });
        Ok(())
    }
}

pub struct InMemoryNotificationSubscriber {
    receiver: broadcast::Receiver<RawNotification>,
}

#[async_trait]
impl NotificationSubscriber for InMemoryNotificationSubscriber {
    async fn recv(&mut self) -> Result<RawNotification, NotificationError> {
        loop {
            match self.receiver.recv().await {
                Ok(raw) => return Ok(raw),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Notification subscriber lagged, {} skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(NotificationError::ConnectionLost);
                }
            }
        }
    }
}
