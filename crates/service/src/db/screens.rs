use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use models::screen_subscription::{self, Entity as ScreenEntity, NewScreen};
use models::{streaming_account, user};
use crate::errors::ServiceError;
use crate::screens::{Assignment, ScreenChanges};

/// Active, unassigned screens in one SELECT.
pub async fn list_available(db: &DatabaseConnection) -> Result<Vec<screen_subscription::Model>, ServiceError> {
    let rows = ScreenEntity::find()
        .filter(screen_subscription::Column::IsActive.eq(true))
        .filter(screen_subscription::Column::UserId.is_null())
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn get_screen(db: &DatabaseConnection, id: Uuid) -> Result<Option<screen_subscription::Model>, ServiceError> {
    Ok(ScreenEntity::find_by_id(id).one(db).await?)
}

pub async fn list_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<screen_subscription::Model>, ServiceError> {
    let rows = ScreenEntity::find()
        .filter(screen_subscription::Column::UserId.eq(user_id))
        .order_by_asc(screen_subscription::Column::CreatedAt)
        .order_by_asc(screen_subscription::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

/// Insert a screen while holding the account row lock, rejecting it once the
/// account already holds `total_screens` screens.
pub async fn create_screen(db: &DatabaseConnection, new: &NewScreen) -> Result<screen_subscription::Model, ServiceError> {
    let txn = db.begin().await?;
    let Some(account) = streaming_account::Entity::find_by_id(new.account_id).lock_exclusive().one(&txn).await? else {
        return Err(ServiceError::Validation("streaming account does not exist".into()));
    };
    if let Some(uid) = new.user_id {
        if user::Entity::find_by_id(uid).one(&txn).await?.is_none() {
            return Err(ServiceError::Validation("user does not exist".into()));
        }
    }
    let provisioned = ScreenEntity::find()
        .filter(screen_subscription::Column::AccountId.eq(account.id))
        .count(&txn)
        .await?;
    if provisioned >= account.total_screens as u64 {
        return Err(ServiceError::Validation(format!(
            "account already has all {} screens provisioned",
            account.total_screens
        )));
    }
    let created = screen_subscription::create(&txn, new).await?;
    txn.commit().await?;
    Ok(created)
}

/// Applies a patch under the screen's row lock, so a claim and the fields that
/// ride along with it commit together or not at all.
pub async fn update_screen(db: &DatabaseConnection, id: Uuid, changes: &ScreenChanges) -> Result<screen_subscription::Model, ServiceError> {
    let txn = db.begin().await?;
    let Some(existing) = ScreenEntity::find_by_id(id).lock_exclusive().one(&txn).await? else {
        return Err(ServiceError::not_found("screen"));
    };
    if changes.is_empty() {
        return Ok(existing);
    }
    if matches!(changes.assign, Some(Assignment::Claim(_))) && !existing.is_available() {
        return Err(ServiceError::Conflict("screen is already assigned or inactive".into()));
    }
    let mut am: screen_subscription::ActiveModel = existing.into();
    match changes.assign {
        Some(Assignment::Claim(uid)) => am.user_id = Set(Some(uid)),
        Some(Assignment::Release) => am.user_id = Set(None),
        None => {}
    }
    if let Some(active) = changes.is_active { am.is_active = Set(active); }
    if let Some(status) = changes.payment_status { am.payment_status = Set(status); }
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Compare-and-set: `UPDATE ... SET user_id = $1 WHERE id = $2 AND user_id IS NULL AND is_active`.
pub async fn claim_screen(db: &DatabaseConnection, id: Uuid, user_id: Uuid) -> Result<screen_subscription::Model, ServiceError> {
    let res = ScreenEntity::update_many()
        .col_expr(screen_subscription::Column::UserId, Expr::value(user_id))
        .filter(screen_subscription::Column::Id.eq(id))
        .filter(screen_subscription::Column::UserId.is_null())
        .filter(screen_subscription::Column::IsActive.eq(true))
        .exec(db)
        .await?;
    let current = ScreenEntity::find_by_id(id).one(db).await?;
    match (res.rows_affected, current) {
        (_, None) => Err(ServiceError::not_found("screen")),
        (0, Some(_)) => Err(ServiceError::Conflict("screen is already assigned or inactive".into())),
        (_, Some(screen)) => Ok(screen),
    }
}

pub async fn delete_screen(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = ScreenEntity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
