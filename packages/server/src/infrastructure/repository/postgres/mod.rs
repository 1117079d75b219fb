mod game;
mod row;

pub use game::{PostgresGameRepository, connect_pool};
