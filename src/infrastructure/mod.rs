//! Infrastructure layer: database connection, entities, migrations and
//! repositories.

pub mod database;

pub use database::{init_database, DatabaseConfig};
