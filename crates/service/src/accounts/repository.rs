use async_trait::async_trait;
use models::streaming_account::{self, NewAccount};
use uuid::Uuid;

use crate::accounts::domain::AccountChanges;
use crate::errors::ServiceError;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Accounts ordered by creation time, optionally restricted to one owner.
    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<streaming_account::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<streaming_account::Model>, ServiceError>;
    /// Fails with `Validation` when the referenced service does not exist.
    async fn create(&self, owner_id: Uuid, new: &NewAccount) -> Result<streaming_account::Model, ServiceError>;
    /// Fails with `Validation` when `total_screens` would drop below the
    /// number of screens already provisioned.
    async fn update(&self, id: Uuid, changes: &AccountChanges) -> Result<streaming_account::Model, ServiceError>;
    /// Deletes the account and its screens.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}
