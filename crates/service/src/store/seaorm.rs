use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::screen_subscription::{self, NewScreen};
use models::streaming_account::{self, NewAccount};
use models::streaming_service;
use models::user::NewUser;

use crate::accounts::{AccountChanges, AccountRepository};
use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::catalog::CatalogRepository;
use crate::db;
use crate::errors::ServiceError;
use crate::screens::{ScreenChanges, ScreenRepository};

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl CatalogRepository for SeaOrmStore {
    async fn list(&self) -> Result<Vec<streaming_service::Model>, ServiceError> {
        db::catalog::list_services(&self.db).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<streaming_service::Model>, ServiceError> {
        db::catalog::get_service(&self.db, id).await
    }

    async fn create(&self, name: &str) -> Result<streaming_service::Model, ServiceError> {
        db::catalog::create_service(&self.db, name).await
    }

    async fn rename(&self, id: Uuid, name: &str) -> Result<streaming_service::Model, ServiceError> {
        db::catalog::rename_service(&self.db, id, name).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        db::catalog::delete_service(&self.db, id).await
    }
}

#[async_trait]
impl AccountRepository for SeaOrmStore {
    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<streaming_account::Model>, ServiceError> {
        db::accounts::list_accounts(&self.db, owner_id).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<streaming_account::Model>, ServiceError> {
        db::accounts::get_account(&self.db, id).await
    }

    async fn create(&self, owner_id: Uuid, new: &NewAccount) -> Result<streaming_account::Model, ServiceError> {
        db::accounts::create_account(&self.db, owner_id, new).await
    }

    async fn update(&self, id: Uuid, changes: &AccountChanges) -> Result<streaming_account::Model, ServiceError> {
        db::accounts::update_account(&self.db, id, changes).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        db::accounts::delete_account(&self.db, id).await
    }
}

#[async_trait]
impl ScreenRepository for SeaOrmStore {
    async fn available(&self) -> Result<Vec<screen_subscription::Model>, ServiceError> {
        db::screens::list_available(&self.db).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<screen_subscription::Model>, ServiceError> {
        db::screens::get_screen(&self.db, id).await
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<screen_subscription::Model>, ServiceError> {
        db::screens::list_by_user(&self.db, user_id).await
    }

    async fn create(&self, new: &NewScreen) -> Result<screen_subscription::Model, ServiceError> {
        db::screens::create_screen(&self.db, new).await
    }

    async fn update(&self, id: Uuid, changes: &ScreenChanges) -> Result<screen_subscription::Model, ServiceError> {
        db::screens::update_screen(&self.db, id, changes).await
    }

    async fn claim(&self, id: Uuid, user_id: Uuid) -> Result<screen_subscription::Model, ServiceError> {
        db::screens::claim_screen(&self.db, id, user_id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        db::screens::delete_screen(&self.db, id).await
    }
}

#[async_trait]
impl AuthRepository for SeaOrmStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        db::users::find_by_email(&self.db, email).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        db::users::find_by_id(&self.db, id).await
    }

    async fn create_user(&self, new: &NewUser) -> Result<AuthUser, AuthError> {
        db::users::create_user(&self.db, new).await
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        db::users::get_credentials(&self.db, user_id).await
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        db::users::upsert_password(&self.db, user_id, password_hash, &password_algorithm).await
    }
}
