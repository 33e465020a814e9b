pub use sea_orm_migration::prelude::*;

mod m20260116_000000_bootstrap;
mod m20260116_000001_create_categories;
mod m20260116_000002_create_products;
mod m20260116_000003_seed_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260116_000000_bootstrap::Migration),
            Box::new(m20260116_000001_create_categories::Migration),
            Box::new(m20260116_000002_create_products::Migration),
            Box::new(m20260116_000003_seed_catalog::Migration),
        ]
    }
}
