mod db;
mod dictionary;
mod migrations;
mod recipes;

pub use db::{CatalogStats, Database};
pub use migrations::{Migration, MIGRATIONS};
pub use recipes::MIN_CLEANUP_PATTERN_LEN;
