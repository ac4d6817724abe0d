//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_user;
mod m20240601_000002_create_user_credentials;
mod m20240601_000003_create_streaming_service;
mod m20240601_000004_create_streaming_account;
mod m20240601_000005_create_screen_subscription;
mod m20240601_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_user::Migration),
            Box::new(m20240601_000002_create_user_credentials::Migration),
            Box::new(m20240601_000003_create_streaming_service::Migration),
            Box::new(m20240601_000004_create_streaming_account::Migration),
            Box::new(m20240601_000005_create_screen_subscription::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000006_add_indexes::Migration),
        ]
    }
}
