use std::sync::Arc;

use models::streaming_service;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::caller::Caller;
use crate::catalog::repository::CatalogRepository;
use crate::errors::ServiceError;
use crate::policy::{authorize, Operation};

pub struct CatalogService<R: CatalogRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CatalogRepository + ?Sized> CatalogService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<streaming_service::Model>, ServiceError> {
        authorize(Operation::ListServices, caller)?;
        self.repo.list().await
    }

    pub async fn get(&self, caller: &Caller, id: Uuid) -> Result<streaming_service::Model, ServiceError> {
        authorize(Operation::GetService, caller)?;
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("service"))
    }

    #[instrument(skip(self, caller))]
    pub async fn create(&self, caller: &Caller, name: &str) -> Result<streaming_service::Model, ServiceError> {
        authorize(Operation::CreateService, caller)?;
        streaming_service::validate_name(name)?;
        let created = self.repo.create(name).await?;
        info!(service_id = %created.id, "service_created");
        Ok(created)
    }

    #[instrument(skip(self, caller))]
    pub async fn rename(&self, caller: &Caller, id: Uuid, name: &str) -> Result<streaming_service::Model, ServiceError> {
        authorize(Operation::UpdateService, caller)?;
        streaming_service::validate_name(name)?;
        self.repo.rename(id, name).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), ServiceError> {
        authorize(Operation::DeleteService, caller)?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("service"));
        }
        info!(service_id = %id, "service_deleted");
        Ok(())
    }
}
