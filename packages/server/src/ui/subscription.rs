//! Notification subscription loop.
//!
//! One loop per process. Notifications are handled in delivery order; a payload that
//! does not decode is dropped. The loop only ends when the subscription itself breaks,
//! and returns why.

use std::sync::Arc;

use crate::{
    domain::NotificationSubscriber,
    infrastructure::dto::notification::decode_notification,
    usecase::HandleNotificationUseCase,
};

use super::error::ServerError;

pub async fn run_subscription<S>(
    mut subscriber: S,
    handler: Arc<HandleNotificationUseCase>,
) -> ServerError
where
    S: NotificationSubscriber,
{
    loop {
        let raw = match subscriber.recv().await {
            Ok(raw) => raw,
            Err(e) => return e.into(),
        };
        tracing::debug!("Received on '{}': {}", raw.channel, raw.payload);

        match decode_notification(&raw) {
            Ok(notification) => handler.execute(notification).await,
            Err(e) => tracing::warn!("Dropped notification on '{}': {}", raw.channel, e),
        }
    }
}
