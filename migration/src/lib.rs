pub use sea_orm_migration::prelude::*;

mod iden;
mod m20250901_000001_create_directory;
mod m20250901_000002_create_scheduling;
mod m20250915_000001_create_messaging;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_directory::Migration),
            Box::new(m20250901_000002_create_scheduling::Migration),
            Box::new(m20250915_000001_create_messaging::Migration),
        ]
    }
}
