//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::domain::NotificationSubscriber;

use super::{
    error::ServerError,
    handler::{health_check, websocket_handler},
    state::AppState,
    subscription::run_subscription,
};

/// Rock/paper/scissors game server
///
/// # Example
///
/// ```ignore
/// let state = AppState::build(repository, publisher, CountdownConfig::default());
/// let listener = TcpListener::bind("127.0.0.1:3000").await?;
/// Server::new(state)
///     .run(listener, subscriber, shutdown_signal())
///     .await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket endpoint
            .route("/ws", get(websocket_handler))
            // HTTP endpoints
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve on `listener` and feed notifications from `subscriber` to the clients of
    /// this process.
    ///
    /// Returns `Ok` after `shutdown` resolves and connections drain.
    ///
    /// # Errors
    ///
    /// Returns an error if serving fails or the subscription breaks. Either way this
    /// process can no longer keep its clients up to date.
    pub async fn run<S, F>(
        self,
        listener: TcpListener,
        subscriber: S,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        S: NotificationSubscriber + 'static,
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let local_addr = listener.local_addr()?;
        tracing::info!("Game server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);

        let serve = async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
        };
        let subscription =
            run_subscription(subscriber, self.state.handle_notification_usecase.clone());

        tokio::select! {
            result = serve => {
                result?;
                tracing::info!("Server shutdown complete");
                Ok(())
            }
            e = subscription => {
                tracing::error!("Notification subscription failed: {}", e);
                Err(e)
            }
        }
    }
}
