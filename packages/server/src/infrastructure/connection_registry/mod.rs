//! Connection registry implementations.

pub mod websocket;

pub use websocket::WebSocketConnectionRegistry;
