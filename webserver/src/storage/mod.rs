//! SQLite persistence: connection handle, schema and row mapping

pub mod db;
pub mod rows;
pub mod schema;

pub use db::Database;
