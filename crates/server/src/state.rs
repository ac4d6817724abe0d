use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::accounts::{AccountRepository, AccountService};
use service::auth::repository::AuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::catalog::{CatalogRepository, CatalogService};
use service::screens::{ScreenRepository, ScreenService};
use service::store::{MemoryStore, SeaOrmStore};

/// Shared handler state; every service sits behind an `Arc` and a trait object repository.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn AuthRepository>>,
    pub catalog: Arc<CatalogService<dyn CatalogRepository>>,
    pub accounts: Arc<AccountService<dyn AccountRepository>>,
    pub screens: Arc<ScreenService<dyn ScreenRepository>>,
}

impl ServerState {
    pub fn with_seaorm(db: DatabaseConnection, auth: AuthConfig) -> Self {
        Self::from_store(Arc::new(SeaOrmStore::new(db)), auth)
    }

    /// Process-local storage; nothing survives a restart.
    pub fn in_memory(auth: AuthConfig) -> Self {
        Self::from_store(Arc::new(MemoryStore::new()), auth)
    }

    fn from_store<S>(store: Arc<S>, auth: AuthConfig) -> Self
    where
        S: AuthRepository + CatalogRepository + AccountRepository + ScreenRepository + 'static,
    {
        let auth_repo: Arc<dyn AuthRepository> = store.clone();
        let catalog_repo: Arc<dyn CatalogRepository> = store.clone();
        let account_repo: Arc<dyn AccountRepository> = store.clone();
        let screen_repo: Arc<dyn ScreenRepository> = store;
        Self {
            auth: Arc::new(AuthService::new(auth_repo, auth)),
            catalog: Arc::new(CatalogService::new(catalog_repo)),
            accounts: Arc::new(AccountService::new(account_repo)),
            screens: Arc::new(ScreenService::new(screen_repo)),
        }
    }
}
