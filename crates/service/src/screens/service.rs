use std::sync::Arc;

use models::screen_subscription::{self, NewScreen};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::caller::Caller;
use crate::errors::ServiceError;
use crate::policy::{authorize, Operation};
use crate::screens::domain::{Assignment, ScreenChanges, ScreenPatch};
use crate::screens::repository::ScreenRepository;
use crate::selector::select_least_loaded;

/// Selector passes `claim_next` makes before giving up on a contended pool.
pub const CLAIM_NEXT_ATTEMPTS: usize = 3;

pub struct ScreenService<R: ScreenRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: ScreenRepository + ?Sized> ScreenService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// One available screen from each least-loaded account.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::{caller::Caller, screens::ScreenService, store::MemoryStore};
    /// let svc = ScreenService::new(Arc::new(MemoryStore::default()));
    /// let offered = tokio_test::block_on(svc.list_available(&Caller::Anonymous)).unwrap();
    /// assert!(offered.is_empty());
    /// ```
    #[instrument(skip(self, caller))]
    pub async fn list_available(&self, caller: &Caller) -> Result<Vec<screen_subscription::Model>, ServiceError> {
        authorize(Operation::ListScreens, caller)?;
        let rows = self.repo.available().await?;
        let offered = select_least_loaded(&rows);
        debug!(available = rows.len(), offered = offered.len(), "least_loaded_selection");
        Ok(offered)
    }

    pub async fn get(&self, caller: &Caller, id: Uuid) -> Result<screen_subscription::Model, ServiceError> {
        authorize(Operation::GetScreen, caller)?;
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("screen"))
    }

    /// Screens assigned to the caller; empty for anonymous callers.
    pub async fn my_screens(&self, caller: &Caller) -> Result<Vec<screen_subscription::Model>, ServiceError> {
        authorize(Operation::MyScreens, caller)?;
        match caller.user_id() {
            Some(uid) => self.repo.list_by_user(uid).await,
            None => Ok(Vec::new()),
        }
    }

    #[instrument(skip(self, caller, new), fields(account_id = %new.account_id))]
    pub async fn create(&self, caller: &Caller, new: NewScreen) -> Result<screen_subscription::Model, ServiceError> {
        authorize(Operation::CreateScreen, caller)?;
        let created = self.repo.create(&new).await?;
        info!(screen_id = %created.id, account_id = %created.account_id, "screen_created");
        Ok(created)
    }

    /// Members may claim a screen for themselves and update the payment state
    /// of a screen they hold (or claim in the same patch). Toggling
    /// `is_active`, assigning another user or releasing a screen needs an admin.
    ///
    /// The whole patch is one repository write: a claim that loses the race
    /// leaves the other fields untouched.
    #[instrument(skip(self, caller, patch))]
    pub async fn update(&self, caller: &Caller, id: Uuid, patch: ScreenPatch) -> Result<screen_subscription::Model, ServiceError> {
        authorize(Operation::UpdateScreen, caller)?;
        let uid = caller.require_user()?;
        if !caller.is_admin() {
            if patch.is_active.is_some() {
                return Err(ServiceError::Forbidden("only admins can change is_active".into()));
            }
            match patch.user {
                Some(Some(target)) if target != uid => {
                    return Err(ServiceError::Forbidden("members can only assign a screen to themselves".into()));
                }
                Some(None) => return Err(ServiceError::Forbidden("only admins can release a screen".into())),
                _ => {}
            }
            if patch.payment_status.is_some() && patch.user != Some(Some(uid)) {
                let screen = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("screen"))?;
                if screen.user_id != Some(uid) {
                    return Err(ServiceError::Forbidden("payment status belongs to the screen's holder".into()));
                }
            }
        }

        let changes = ScreenChanges::from(&patch);
        if changes.is_empty() {
            return self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("screen"));
        }
        match self.repo.update(id, &changes).await {
            Ok(screen) => {
                match changes.assign {
                    Some(Assignment::Claim(target)) => {
                        info!(screen_id = %id, user_id = %target, account_id = %screen.account_id, "screen_claimed")
                    }
                    Some(Assignment::Release) => info!(screen_id = %id, "screen_released"),
                    None => {}
                }
                Ok(screen)
            }
            Err(ServiceError::Conflict(msg)) => {
                warn!(screen_id = %id, user_id = %uid, "claim_conflict");
                Err(ServiceError::Conflict(msg))
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, caller))]
    pub async fn claim(&self, caller: &Caller, id: Uuid) -> Result<screen_subscription::Model, ServiceError> {
        authorize(Operation::ClaimScreen, caller)?;
        let uid = caller.require_user()?;
        self.claim_for(id, uid).await
    }

    /// Claims the first screen the selector offers, re-running the selection
    /// when another caller wins the race.
    #[instrument(skip(self, caller))]
    pub async fn claim_next(&self, caller: &Caller) -> Result<screen_subscription::Model, ServiceError> {
        authorize(Operation::ClaimNextScreen, caller)?;
        let uid = caller.require_user()?;
        for attempt in 1..=CLAIM_NEXT_ATTEMPTS {
            let rows = self.repo.available().await?;
            let Some(next) = select_least_loaded(&rows).into_iter().next() else {
                return Err(ServiceError::NotFound("no screen available".into()));
            };
            match self.claim_for(next.id, uid).await {
                // Lost the race, or the row was deleted after the snapshot.
                Err(ServiceError::Conflict(_)) | Err(ServiceError::NotFound(_)) => {
                    debug!(attempt, screen_id = %next.id, "claim_next_retry");
                }
                other => return other,
            }
        }
        warn!(user_id = %uid, attempts = CLAIM_NEXT_ATTEMPTS, "claim_next_exhausted");
        Err(ServiceError::Conflict("screens are being claimed concurrently, retry later".into()))
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), ServiceError> {
        authorize(Operation::DeleteScreen, caller)?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("screen"));
        }
        info!(screen_id = %id, "screen_deleted");
        Ok(())
    }

    async fn claim_for(&self, id: Uuid, user_id: Uuid) -> Result<screen_subscription::Model, ServiceError> {
        match self.repo.claim(id, user_id).await {
            Ok(screen) => {
                info!(screen_id = %id, user_id = %user_id, account_id = %screen.account_id, "screen_claimed");
                Ok(screen)
            }
            Err(ServiceError::Conflict(msg)) => {
                warn!(screen_id = %id, user_id = %user_id, "claim_conflict");
                Err(ServiceError::Conflict(msg))
            }
            Err(e) => Err(e),
        }
    }
}
