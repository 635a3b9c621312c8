pub use sea_orm_migration::prelude::*;

mod m20240901_000001_create_accounts;
mod m20240915_000001_add_university;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_accounts::Migration),
            Box::new(m20240915_000001_add_university::Migration),
        ]
    }
}
