//! Repositories: the persistence-facing half of each component.
//!
//! - [`UserRepository`] — credential store
//! - [`FeederRepository`] — feeder registry and its update history
//! - [`AssignmentRepository`] — user→feeder assignment ledger

pub mod assignment_repository;
pub mod feeder_repository;
pub mod user_repository;

pub use assignment_repository::AssignmentRepository;
pub use feeder_repository::FeederRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;

    /// Fresh in-memory SQLite database with all migrations applied.
    ///
    /// A single-connection pool keeps every query on the same in-memory
    /// database instance.
    pub async fn connect() -> DatabaseConnection {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = Database::connect(opts)
            .await
            .expect("in-memory sqlite connection");
        Migrator::up(&db, None).await.expect("migrations");
        db
    }
}
