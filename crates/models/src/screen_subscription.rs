//! One assignable unit of a streaming account's capacity.
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, streaming_account, user};

/// Payment state, stored as its single-letter code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
pub enum PaymentStatus {
    #[default]
    #[sea_orm(string_value = "N")]
    #[serde(rename = "N")]
    NotInitiated,
    #[sea_orm(string_value = "P")]
    #[serde(rename = "P")]
    Pending,
    #[sea_orm(string_value = "C")]
    #[serde(rename = "C")]
    Completed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "screen_subscription")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    /// `None` while the screen is unassigned.
    pub user_id: Option<Uuid>,
    pub is_active: bool,
    pub payment_status: PaymentStatus,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Active and not yet claimed by anyone.
    pub fn is_available(&self) -> bool {
        self.is_active && self.user_id.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Account, User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Account => Entity::belongs_to(streaming_account::Entity)
                .from(Column::AccountId)
                .to(streaming_account::Column::Id)
                .into(),
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<streaming_account::Entity> for Entity {
    fn to() -> RelationDef { Relation::Account.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields an admin provides when provisioning a screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewScreen {
    pub account_id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

impl NewScreen {
    pub fn for_account(account_id: Uuid) -> Self {
        Self { account_id, user_id: None, is_active: None, payment_status: None }
    }
}

/// Insert without capacity checks; callers hold the account lock.
pub async fn create<C: ConnectionTrait>(db: &C, new: &NewScreen) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        account_id: Set(new.account_id),
        user_id: Set(new.user_id),
        is_active: Set(new.is_active.unwrap_or(true)),
        payment_status: Set(new.payment_status.unwrap_or_default()),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
