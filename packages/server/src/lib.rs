//! Matchmaking and session engine for two-player rock/paper/scissors.
//!
//! Any number of server processes may share one PostgreSQL database. Game state changes
//! are conditional updates on the `games` table, and every committed change is fanned out
//! to all processes over LISTEN/NOTIFY so each can update the clients connected to it.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
