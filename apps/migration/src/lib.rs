//! Database schema for Blogicum.

pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_users_table;
mod m20240301_000002_create_taxonomy_tables;
mod m20240301_000003_create_posts_table;
mod m20240301_000004_create_comments_table;

/// Applies the schema migrations in order.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users_table::Migration),
            Box::new(m20240301_000002_create_taxonomy_tables::Migration),
            Box::new(m20240301_000003_create_posts_table::Migration),
            Box::new(m20240301_000004_create_comments_table::Migration),
        ]
    }
}
