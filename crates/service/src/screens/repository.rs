use async_trait::async_trait;
use models::screen_subscription::{self, NewScreen};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::screens::domain::ScreenChanges;

#[async_trait]
pub trait ScreenRepository: Send + Sync {
    /// Active, unassigned screens across all accounts, read as one snapshot.
    async fn available(&self) -> Result<Vec<screen_subscription::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<screen_subscription::Model>, ServiceError>;
    /// Screens assigned to `user_id`, ordered by `created_at` then `id`.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<screen_subscription::Model>, ServiceError>;
    /// Fails with `Validation` if the account is missing or already at
    /// `total_screens`.
    async fn create(&self, new: &NewScreen) -> Result<screen_subscription::Model, ServiceError>;
    /// Applies every change in one write. With `Assignment::Claim` the write only
    /// happens while the screen is active and unassigned, otherwise `Conflict`.
    async fn update(&self, id: Uuid, changes: &ScreenChanges) -> Result<screen_subscription::Model, ServiceError>;
    /// Assigns `user_id` only while the screen is active and unassigned.
    /// `NotFound` for an unknown id, `Conflict` when the screen is taken or inactive.
    async fn claim(&self, id: Uuid, user_id: Uuid) -> Result<screen_subscription::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}
