use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;
use models::user::{self, NewUser};
use models::user_credentials;
use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;

fn repo_err(e: impl ToString) -> AuthError { AuthError::Repository(e.to_string()) }

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<AuthUser>, AuthError> {
    let res = user::Entity::find()
        .filter(user::Column::Email.eq(email.trim().to_ascii_lowercase()))
        .one(db)
        .await
        .map_err(repo_err)?;
    Ok(res.map(AuthUser::from))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
    let res = user::Entity::find_by_id(id).one(db).await.map_err(repo_err)?;
    Ok(res.map(AuthUser::from))
}

pub async fn create_user(db: &DatabaseConnection, new: &NewUser) -> Result<AuthUser, AuthError> {
    let created = user::create(db, new).await?;
    Ok(AuthUser::from(created))
}

pub async fn get_credentials(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
    let res = user_credentials::find_by_user(db, user_id).await?;
    Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
}

pub async fn upsert_password(db: &DatabaseConnection, user_id: Uuid, password_hash: String, password_algorithm: &str) -> Result<Credentials, AuthError> {
    let c = user_credentials::upsert_password(db, user_id, password_hash, password_algorithm).await?;
    Ok(Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm })
}
