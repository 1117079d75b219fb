//! PostgreSQL LISTEN/NOTIFY bus.

use async_trait::async_trait;
use sqlx::postgres::{PgListener, PgPool};

use crate::{
    domain::{
        Channel, Notification, NotificationError, NotificationPublisher, NotificationSubscriber,
        RawNotification,
    },
    infrastructure::dto::notification::encode_notification,
};

/// Publishes through `pg_notify` on the shared pool.
#[derive(Clone)]
pub struct PgNotificationPublisher {
    pool: PgPool,
}

impl PgNotificationPublisher {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationPublisher for PgNotificationPublisher {
    async fn publish(&self, notification: &Notification) -> Result<(), NotificationError> {
        let (channel, payload) = encode_notification(notification)?;

        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(channel.as_str())
            .bind(&payload)
            .execute(&self.pool)
            .await
            .map_err(|e| NotificationError::Publish {
                channel: channel.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!("Published on '{}': {}", channel, payload);
        Ok(())
    }
}

/// Dedicated `LISTEN` connection for every [`Channel`].
pub struct PgNotificationSubscriber {
    listener: PgListener,
}

impl PgNotificationSubscriber {
    pub async fn connect(pool: &PgPool) -> Result<Self, NotificationError> {
        let mut listener = PgListener::connect_with(pool)
            .await
            .map_err(|e| NotificationError::Subscription(e.to_string()))?;

        let channels: Vec<&str> = Channel::ALL.iter().map(Channel::as_str).collect();
        listener
            .listen_all(channels.iter().copied())
            .await
            .map_err(|e| NotificationError::Subscription(e.to_string()))?;

        tracing::info!("Listening on {}", channels.join(", "));
        Ok(Self { listener })
    }
}

#[async_trait]
impl NotificationSubscriber for PgNotificationSubscriber {
    async fn recv(&mut self) -> Result<RawNotification, NotificationError> {
        // `None` means the connection dropped and notifications may have been missed.
        match self.listener.try_recv().await {
            Ok(Some(notification)) => Ok(RawNotification {
                channel: notification.channel().to_string(),
                payload: notification.payload().to_string(),
            }),
            Ok(None) => Err(NotificationError::ConnectionLost),
            Err(e) => Err(NotificationError::Subscription(e.to_string())),
        }
    }
}
