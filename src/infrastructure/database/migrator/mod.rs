//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_feeders;
mod m20250301_000003_create_assignments;
mod m20250301_000004_create_feeder_updates;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_feeders::Migration),
            Box::new(m20250301_000003_create_assignments::Migration),
            Box::new(m20250301_000004_create_feeder_updates::Migration),
        ]
    }
}
