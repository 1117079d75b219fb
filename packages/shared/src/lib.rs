//! Utilities shared by the rock/paper/scissors server binary and its tests.

pub mod logger;
