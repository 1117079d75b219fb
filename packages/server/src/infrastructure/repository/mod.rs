//! Game repository implementations.
//!
//! - `postgres`: the production store; conditional SQL updates are the concurrency boundary
//! - `inmemory`: the same conditional semantics under one mutex, for tests and
//!   single-process runs

pub mod inmemory;
pub mod postgres;

pub use inmemory::InMemoryGameRepository;
pub use postgres::PostgresGameRepository;
