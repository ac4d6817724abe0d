use std::sync::Arc;

use models::streaming_account::{self, NewAccount};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::accounts::domain::AccountChanges;
use crate::accounts::repository::AccountRepository;
use crate::caller::Caller;
use crate::errors::ServiceError;
use crate::policy::{authorize, Operation};

/// Account operations. Members only ever see their own accounts; another
/// owner's account is reported as not found.
pub struct AccountService<R: AccountRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: AccountRepository + ?Sized> AccountService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<streaming_account::Model>, ServiceError> {
        authorize(Operation::ListAccounts, caller)?;
        let uid = caller.require_user()?;
        let owner = if caller.is_admin() { None } else { Some(uid) };
        self.repo.list(owner).await
    }

    pub async fn get(&self, caller: &Caller, id: Uuid) -> Result<streaming_account::Model, ServiceError> {
        authorize(Operation::GetAccount, caller)?;
        self.scoped(caller, id).await
    }

    #[instrument(skip(self, caller, new), fields(service_id = %new.service_id))]
    pub async fn create(&self, caller: &Caller, new: NewAccount) -> Result<streaming_account::Model, ServiceError> {
        authorize(Operation::CreateAccount, caller)?;
        let owner_id = caller.require_user()?;
        new.validate()?;
        let created = self.repo.create(owner_id, &new).await?;
        info!(account_id = %created.id, owner_id = %owner_id, total_screens = created.total_screens, "account_created");
        Ok(created)
    }

    #[instrument(skip(self, caller, changes))]
    pub async fn update(&self, caller: &Caller, id: Uuid, changes: AccountChanges) -> Result<streaming_account::Model, ServiceError> {
        authorize(Operation::UpdateAccount, caller)?;
        self.scoped(caller, id).await?;
        if changes.verified.is_some() && !caller.is_admin() {
            return Err(ServiceError::Forbidden("only admins can verify accounts".into()));
        }
        changes.validate()?;
        self.repo.update(id, &changes).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), ServiceError> {
        authorize(Operation::DeleteAccount, caller)?;
        self.scoped(caller, id).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("account"));
        }
        info!(account_id = %id, "account_deleted");
        Ok(())
    }

    async fn scoped(&self, caller: &Caller, id: Uuid) -> Result<streaming_account::Model, ServiceError> {
        let account = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("account"))?;
        if !caller.is_admin() && caller.user_id() != Some(account.owner_id) {
            return Err(ServiceError::not_found("account"));
        }
        Ok(account)
    }
}
