use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use models::streaming_account::{self, Entity as AccountEntity, NewAccount};
use models::{screen_subscription, streaming_service};
use crate::accounts::AccountChanges;
use crate::errors::ServiceError;

/// List accounts ordered by creation, optionally for one owner.
pub async fn list_accounts(db: &DatabaseConnection, owner_id: Option<Uuid>) -> Result<Vec<streaming_account::Model>, ServiceError> {
    let mut finder = AccountEntity::find();
    if let Some(owner) = owner_id { finder = finder.filter(streaming_account::Column::OwnerId.eq(owner)); }
    let rows = finder
        .order_by_asc(streaming_account::Column::CreatedAt)
        .order_by_asc(streaming_account::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn get_account(db: &DatabaseConnection, id: Uuid) -> Result<Option<streaming_account::Model>, ServiceError> {
    Ok(AccountEntity::find_by_id(id).one(db).await?)
}

pub async fn create_account(db: &DatabaseConnection, owner_id: Uuid, new: &NewAccount) -> Result<streaming_account::Model, ServiceError> {
    if streaming_service::Entity::find_by_id(new.service_id).one(db).await?.is_none() {
        return Err(ServiceError::Validation("service does not exist".into()));
    }
    Ok(streaming_account::create(db, owner_id, new).await?)
}

/// Apply a partial update. Capacity changes lock the account row so that a
/// concurrent screen insert cannot slip past the new limit.
pub async fn update_account(db: &DatabaseConnection, id: Uuid, changes: &AccountChanges) -> Result<streaming_account::Model, ServiceError> {
    changes.validate()?;
    let txn = db.begin().await?;
    let Some(existing) = AccountEntity::find_by_id(id).lock_exclusive().one(&txn).await? else {
        return Err(ServiceError::not_found("account"));
    };
    if let Some(total) = changes.total_screens {
        let provisioned = screen_subscription::Entity::find()
            .filter(screen_subscription::Column::AccountId.eq(id))
            .count(&txn)
            .await?;
        if provisioned > total as u64 {
            return Err(ServiceError::Validation(format!(
                "total_screens cannot drop below the {provisioned} screens already provisioned"
            )));
        }
    }
    if let Some(service_id) = changes.service_id {
        if streaming_service::Entity::find_by_id(service_id).one(&txn).await?.is_none() {
            return Err(ServiceError::Validation("service does not exist".into()));
        }
    }

    let mut am: streaming_account::ActiveModel = existing.into();
    if let Some(s) = changes.service_id { am.service_id = Set(s); }
    if let Some(u) = &changes.username { am.username = Set(u.clone()); }
    if let Some(p) = &changes.password { am.password = Set(p.clone()); }
    if let Some(c) = changes.price_per_screen { am.price_per_screen = Set(c); }
    if let Some(t) = changes.total_screens { am.total_screens = Set(t); }
    if let Some(v) = changes.verified { am.verified = Set(v); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Delete an account and, by cascade, its screens.
pub async fn delete_account(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = AccountEntity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
