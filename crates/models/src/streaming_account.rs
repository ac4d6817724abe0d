//! Shared streaming credentials and their fixed simultaneous-screen capacity.
//!
//! Availability is never stored here: the number of free screens is always
//! derived from live `screen_subscription` rows.
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, screen_subscription, streaming_service, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "streaming_account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub service_id: Uuid,
    pub username: String,
    pub password: String,
    /// Price of one screen, in cents.
    pub price_per_screen: i32,
    pub total_screens: i32,
    pub verified: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Owner, Service, Screens }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity)
                .from(Column::OwnerId)
                .to(user::Column::Id)
                .into(),
            Relation::Service => Entity::belongs_to(streaming_service::Entity)
                .from(Column::ServiceId)
                .to(streaming_service::Column::Id)
                .into(),
            Relation::Screens => Entity::has_many(screen_subscription::Entity).into(),
        }
    }
}

impl Related<screen_subscription::Entity> for Entity {
    fn to() -> RelationDef { Relation::Screens.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields an owner provides when listing a new account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub service_id: Uuid,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub price_per_screen: i32,
    pub total_screens: i32,
}

impl NewAccount {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        validate_credential("username", &self.username)?;
        validate_credential("password", &self.password)?;
        validate_price(self.price_per_screen)?;
        validate_total_screens(self.total_screens)
    }
}

pub fn validate_credential(field: &str, value: &str) -> Result<(), errors::ModelError> {
    if value.trim().is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} required")));
    }
    if value.chars().count() > 255 {
        return Err(errors::ModelError::Validation(format!("{field} is limited to 255 characters")));
    }
    Ok(())
}

pub fn validate_total_screens(total: i32) -> Result<(), errors::ModelError> {
    if total < 1 {
        return Err(errors::ModelError::Validation("total_screens must be a positive integer".into()));
    }
    Ok(())
}

pub fn validate_price(cents: i32) -> Result<(), errors::ModelError> {
    if !(0..=99_999).contains(&cents) {
        return Err(errors::ModelError::Validation("price_per_screen must be between 0 and 999.99".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, owner_id: Uuid, new: &NewAccount) -> Result<Model, errors::ModelError> {
    new.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        service_id: Set(new.service_id),
        username: Set(new.username.clone()),
        password: Set(new.password.clone()),
        price_per_screen: Set(new.price_per_screen),
        total_screens: Set(new.total_screens),
        verified: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
