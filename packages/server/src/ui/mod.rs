//! UI layer: HTTP/WebSocket surface and the notification subscription loop.

mod error;
mod handler;
mod server;
mod signal;
pub mod state;
mod subscription;

pub use error::ServerError;
pub use server::Server;
pub use signal::shutdown_signal;
pub use state::AppState;
