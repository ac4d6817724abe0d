use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use models::screen_subscription::{self, NewScreen};
use models::streaming_account::{self, NewAccount};
use models::streaming_service;
use models::user::{self, NewUser};

use crate::accounts::{AccountChanges, AccountRepository};
use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::catalog::CatalogRepository;
use crate::errors::ServiceError;
use crate::screens::{Assignment, ScreenChanges, ScreenRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, user::Model>,
    credentials: HashMap<Uuid, Credentials>,
    services: HashMap<Uuid, streaming_service::Model>,
    accounts: HashMap<Uuid, streaming_account::Model>,
    screens: HashMap<Uuid, screen_subscription::Model>,
}

impl Tables {
    fn provisioned(&self, account_id: Uuid) -> usize {
        self.screens.values().filter(|s| s.account_id == account_id).count()
    }

    fn drop_account(&mut self, account_id: Uuid) -> bool {
        self.screens.retain(|_, s| s.account_id != account_id);
        self.accounts.remove(&account_id).is_some()
    }
}

/// All tables behind one lock, so cascades and claims are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

fn sorted_by<T, K: Ord>(mut rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.sort_by_key(key);
    rows
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<streaming_service::Model>, ServiceError> {
        let t = self.tables.read().await;
        let rows: Vec<streaming_service::Model> = t.services.values().cloned().collect();
        Ok(sorted_by(rows, |s| (s.name.clone(), s.id)))
    }

    async fn get(&self, id: Uuid) -> Result<Option<streaming_service::Model>, ServiceError> {
        Ok(self.tables.read().await.services.get(&id).cloned())
    }

    async fn create(&self, name: &str) -> Result<streaming_service::Model, ServiceError> {
        streaming_service::validate_name(name)?;
        let svc = streaming_service::Model { id: Uuid::new_v4(), name: name.trim().to_string(), created_at: Utc::now().into() };
        self.tables.write().await.services.insert(svc.id, svc.clone());
        Ok(svc)
    }

    async fn rename(&self, id: Uuid, name: &str) -> Result<streaming_service::Model, ServiceError> {
        streaming_service::validate_name(name)?;
        let mut t = self.tables.write().await;
        let svc = t.services.get_mut(&id).ok_or_else(|| ServiceError::not_found("service"))?;
        svc.name = name.trim().to_string();
        Ok(svc.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut t = self.tables.write().await;
        if t.services.remove(&id).is_none() {
            return Ok(false);
        }
        let doomed: Vec<Uuid> = t.accounts.values().filter(|a| a.service_id == id).map(|a| a.id).collect();
        for account_id in doomed {
            t.drop_account(account_id);
        }
        Ok(true)
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<streaming_account::Model>, ServiceError> {
        let t = self.tables.read().await;
        let rows: Vec<streaming_account::Model> = t
            .accounts
            .values()
            .filter(|a| owner_id.map_or(true, |o| a.owner_id == o))
            .cloned()
            .collect();
        Ok(sorted_by(rows, |a| (a.created_at, a.id)))
    }

    async fn get(&self, id: Uuid) -> Result<Option<streaming_account::Model>, ServiceError> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn create(&self, owner_id: Uuid, new: &NewAccount) -> Result<streaming_account::Model, ServiceError> {
        new.validate()?;
        let mut t = self.tables.write().await;
        if !t.services.contains_key(&new.service_id) {
            return Err(ServiceError::Validation("service does not exist".into()));
        }
        let now = Utc::now().into();
        let account = streaming_account::Model {
            id: Uuid::new_v4(),
            owner_id,
            service_id: new.service_id,
            username: new.username.clone(),
            password: new.password.clone(),
            price_per_screen: new.price_per_screen,
            total_screens: new.total_screens,
            verified: false,
            created_at: now,
            updated_at: now,
        };
        t.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, id: Uuid, changes: &AccountChanges) -> Result<streaming_account::Model, ServiceError> {
        changes.validate()?;
        let mut t = self.tables.write().await;
        if !t.accounts.contains_key(&id) {
            return Err(ServiceError::not_found("account"));
        }
        if let Some(total) = changes.total_screens {
            let provisioned = t.provisioned(id);
            if provisioned > total as usize {
                return Err(ServiceError::Validation(format!(
                    "total_screens cannot drop below the {provisioned} screens already provisioned"
                )));
            }
        }
        if let Some(service_id) = changes.service_id {
            if !t.services.contains_key(&service_id) {
                return Err(ServiceError::Validation("service does not exist".into()));
            }
        }
        let account = t.accounts.get_mut(&id).ok_or_else(|| ServiceError::not_found("account"))?;
        if let Some(s) = changes.service_id { account.service_id = s; }
        if let Some(u) = &changes.username { account.username = u.clone(); }
        if let Some(p) = &changes.password { account.password = p.clone(); }
        if let Some(c) = changes.price_per_screen { account.price_per_screen = c; }
        if let Some(n) = changes.total_screens { account.total_screens = n; }
        if let Some(v) = changes.verified { account.verified = v; }
        account.updated_at = Utc::now().into();
        Ok(account.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.tables.write().await.drop_account(id))
    }
}

#[async_trait]
impl ScreenRepository for MemoryStore {
    async fn available(&self) -> Result<Vec<screen_subscription::Model>, ServiceError> {
        let t = self.tables.read().await;
        Ok(t.screens.values().filter(|s| s.is_available()).cloned().collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<screen_subscription::Model>, ServiceError> {
        Ok(self.tables.read().await.screens.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<screen_subscription::Model>, ServiceError> {
        let t = self.tables.read().await;
        let rows: Vec<screen_subscription::Model> =
            t.screens.values().filter(|s| s.user_id == Some(user_id)).cloned().collect();
        Ok(sorted_by(rows, |s| (s.created_at, s.id)))
    }

    async fn create(&self, new: &NewScreen) -> Result<screen_subscription::Model, ServiceError> {
        let mut t = self.tables.write().await;
        let total = t
            .accounts
            .get(&new.account_id)
            .map(|a| a.total_screens)
            .ok_or_else(|| ServiceError::Validation("streaming account does not exist".into()))?;
        if let Some(uid) = new.user_id {
            if !t.users.contains_key(&uid) {
                return Err(ServiceError::Validation("user does not exist".into()));
            }
        }
        if t.provisioned(new.account_id) >= total as usize {
            return Err(ServiceError::Validation(format!("account already has all {total} screens provisioned")));
        }
        let screen = screen_subscription::Model {
            id: Uuid::new_v4(),
            account_id: new.account_id,
            user_id: new.user_id,
            is_active: new.is_active.unwrap_or(true),
            payment_status: new.payment_status.unwrap_or_default(),
            created_at: Utc::now().into(),
        };
        t.screens.insert(screen.id, screen.clone());
        Ok(screen)
    }

    async fn update(&self, id: Uuid, changes: &ScreenChanges) -> Result<screen_subscription::Model, ServiceError> {
        let mut t = self.tables.write().await;
        let screen = t.screens.get_mut(&id).ok_or_else(|| ServiceError::not_found("screen"))?;
        match changes.assign {
            Some(Assignment::Claim(_)) if !screen.is_available() => {
                return Err(ServiceError::Conflict("screen is already assigned or inactive".into()));
            }
            Some(Assignment::Claim(uid)) => screen.user_id = Some(uid),
            Some(Assignment::Release) => screen.user_id = None,
            None => {}
        }
        if let Some(active) = changes.is_active { screen.is_active = active; }
        if let Some(status) = changes.payment_status { screen.payment_status = status; }
        Ok(screen.clone())
    }

    async fn claim(&self, id: Uuid, user_id: Uuid) -> Result<screen_subscription::Model, ServiceError> {
        let mut t = self.tables.write().await;
        let screen = t.screens.get_mut(&id).ok_or_else(|| ServiceError::not_found("screen"))?;
        if !screen.is_available() {
            return Err(ServiceError::Conflict("screen is already assigned or inactive".into()));
        }
        screen.user_id = Some(user_id);
        Ok(screen.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.tables.write().await.screens.remove(&id).is_some())
    }
}

#[async_trait]
impl AuthRepository for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let email = email.trim().to_ascii_lowercase();
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned().map(AuthUser::from))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        Ok(self.tables.read().await.users.get(&id).cloned().map(AuthUser::from))
    }

    async fn create_user(&self, new: &NewUser) -> Result<AuthUser, AuthError> {
        new.validate()?;
        let email = new.email.trim().to_ascii_lowercase();
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.email == email) {
            return Err(AuthError::Conflict);
        }
        let now = Utc::now().into();
        let u = user::Model {
            id: Uuid::new_v4(),
            email,
            username: new.username.trim().to_string(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            phone_number: new.phone_number.clone(),
            is_admin: new.is_admin,
            created_at: now,
            updated_at: now,
        };
        t.users.insert(u.id, u.clone());
        Ok(AuthUser::from(u))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        Ok(self.tables.read().await.credentials.get(&user_id).cloned())
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let c = Credentials { user_id, password_hash, password_algorithm };
        self.tables.write().await.credentials.insert(user_id, c.clone());
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn account_with(store: &MemoryStore, total: i32) -> streaming_account::Model {
        let svc = CatalogRepository::create(store, "Netflix").await.unwrap();
        let new = NewAccount { service_id: svc.id, username: "u".into(), password: "p".into(), price_per_screen: 100, total_screens: total };
        AccountRepository::create(store, Uuid::new_v4(), &new).await.unwrap()
    }

    #[tokio::test]
    async fn deleting_a_service_cascades_to_screens() {
        let store = MemoryStore::new();
        let acc = account_with(&store, 2).await;
        let screen = ScreenRepository::create(&store, &NewScreen::for_account(acc.id)).await.unwrap();

        assert!(CatalogRepository::delete(&store, acc.service_id).await.unwrap());
        assert!(AccountRepository::get(&store, acc.id).await.unwrap().is_none());
        assert!(ScreenRepository::get(&store, screen.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn preassigned_screen_needs_a_known_user() {
        let store = MemoryStore::new();
        let acc = account_with(&store, 2).await;
        let mut new = NewScreen::for_account(acc.id);
        new.user_id = Some(Uuid::new_v4());
        assert!(matches!(ScreenRepository::create(&store, &new).await, Err(ServiceError::Validation(_))));

        let user = store.create_user(&NewUser { email: "x@y.z".into(), username: "x".into(), ..Default::default() }).await.unwrap();
        new.user_id = Some(user.id);
        let screen = ScreenRepository::create(&store, &new).await.unwrap();
        assert!(!screen.is_available());
    }

    #[tokio::test]
    async fn losing_claim_in_update_writes_nothing() {
        let store = MemoryStore::new();
        let acc = account_with(&store, 1).await;
        let screen = ScreenRepository::create(&store, &NewScreen::for_account(acc.id)).await.unwrap();
        let (holder, late) = (Uuid::new_v4(), Uuid::new_v4());
        ScreenRepository::claim(&store, screen.id, holder).await.unwrap();

        let changes = ScreenChanges {
            assign: Some(Assignment::Claim(late)),
            payment_status: Some(screen_subscription::PaymentStatus::Completed),
            ..Default::default()
        };
        assert!(matches!(ScreenRepository::update(&store, screen.id, &changes).await, Err(ServiceError::Conflict(_))));
        let stored = ScreenRepository::get(&store, screen.id).await.unwrap().unwrap();
        assert_eq!(stored.user_id, Some(holder));
        assert_eq!(stored.payment_status, screen_subscription::PaymentStatus::NotInitiated);

        let release = ScreenChanges { assign: Some(Assignment::Release), ..Default::default() };
        assert!(ScreenRepository::update(&store, screen.id, &release).await.unwrap().is_available());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        let new = NewUser { email: "Dup@Example.com".into(), username: "d".into(), ..Default::default() };
        store.create_user(&new).await.unwrap();
        assert!(matches!(store.create_user(&new).await, Err(AuthError::Conflict)));
        assert!(store.find_user_by_email("dup@example.com").await.unwrap().is_some());
    }
}
