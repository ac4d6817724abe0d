use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted when a user signs up.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub is_admin: bool,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        validate_email(&self.email)?;
        validate_username(&self.username)?;
        if let Some(phone) = &self.phone_number {
            validate_phone_number(phone)?;
        }
        for name in [&self.first_name, &self.last_name].into_iter().flatten() {
            if name.chars().count() > 50 {
                return Err(errors::ModelError::Validation("names are limited to 50 characters".into()));
            }
        }
        Ok(())
    }
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && email.len() <= 255 => Ok(()),
        _ => Err(errors::ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    if username.trim().is_empty() { return Err(errors::ModelError::Validation("username required".into())); }
    if username.chars().count() > 150 { return Err(errors::ModelError::Validation("username too long".into())); }
    Ok(())
}

pub fn validate_phone_number(phone: &str) -> Result<(), errors::ModelError> {
    if phone.chars().count() > 15 {
        return Err(errors::ModelError::Validation("phone_number is limited to 15 characters".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, new: &NewUser) -> Result<Model, errors::ModelError> {
    new.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(new.email.trim().to_ascii_lowercase()),
        username: Set(new.username.trim().to_string()),
        first_name: Set(new.first_name.clone()),
        last_name: Set(new.last_name.clone()),
        phone_number: Set(new.phone_number.clone()),
        is_admin: Set(new.is_admin),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
