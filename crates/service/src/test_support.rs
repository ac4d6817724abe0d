#![cfg(test)]
use std::time::Duration;

use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use models::{streaming_service, user};
use uuid::Uuid;

// Migrations run once per test process; `false` means no database is reachable.
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config(max_connections: u32) -> DatabaseConfig {
    let mut cfg = DatabaseConfig::from_file().unwrap_or_else(|_| DatabaseConfig::from_env());
    cfg.max_connections = cfg.max_connections.max(max_connections);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.connect_timeout_secs = 3;
    cfg.acquire_timeout_secs = 10;
    cfg
}

/// Fresh connection for the current test's runtime, or `None` when
/// `SKIP_DB_TESTS` is set or no database answers.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let migrated = *MIGRATED
        .get_or_init(|| async {
            let Ok(db) = connect_with_config(&test_config(10)).await else { return false };
            migration::Migrator::up(&db, None).await.is_ok()
        })
        .await;
    if !migrated {
        return None;
    }
    tokio::time::timeout(Duration::from_secs(5), connect_with_config(&test_config(20)))
        .await
        .ok()?
        .ok()
}

pub async fn seed_owner_and_service(db: &DatabaseConnection) -> Result<(user::Model, streaming_service::Model), anyhow::Error> {
    let owner = user::create(
        db,
        &user::NewUser {
            email: format!("owner_{}@example.com", Uuid::new_v4()),
            username: "owner".into(),
            ..Default::default()
        },
    )
    .await?;
    let svc = streaming_service::create(db, &format!("svc_{}", Uuid::new_v4())).await?;
    Ok((owner, svc))
}
