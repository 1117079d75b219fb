//! Notification bus implementations.
//!
//! - `postgres`: `pg_notify` / `LISTEN`, shared by every process on the same database
//! - `inmemory`: a broadcast channel, shared by every node holding the same bus

pub mod inmemory;
pub mod postgres;

pub use inmemory::{InMemoryNotificationBus, InMemoryNotificationSubscriber};
pub use postgres::{PgNotificationPublisher, PgNotificationSubscriber};
