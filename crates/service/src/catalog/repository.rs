use async_trait::async_trait;
use models::streaming_service;
use uuid::Uuid;

use crate::errors::ServiceError;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All services ordered by name.
    async fn list(&self) -> Result<Vec<streaming_service::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<streaming_service::Model>, ServiceError>;
    async fn create(&self, name: &str) -> Result<streaming_service::Model, ServiceError>;
    async fn rename(&self, id: Uuid, name: &str) -> Result<streaming_service::Model, ServiceError>;
    /// Deletes the service together with its accounts and their screens.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}
