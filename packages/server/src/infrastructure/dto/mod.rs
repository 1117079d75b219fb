//! Data Transfer Objects.
//!
//! DTOs are organized by protocol:
//! - `websocket`: client ↔ server WebSocket messages and their codec
//! - `notification`: cross-process notification payloads and their codec
//! - `http`: HTTP API response DTOs
//!
//! `conversion` maps between DTOs and domain entities.

pub mod conversion;
pub mod http;
pub mod notification;
pub mod websocket;
