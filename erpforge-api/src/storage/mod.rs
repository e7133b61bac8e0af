mod sqlite;

pub use sqlite::{initialize_database, SqliteStore};
