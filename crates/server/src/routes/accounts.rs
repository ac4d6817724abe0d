use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::streaming_account::{self, NewAccount};
use service::accounts::AccountChanges;
use service::caller::Caller;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AccountView {
    pub id: Uuid,
    pub owner: Uuid,
    pub service: Uuid,
    pub username: String,
    pub password: String,
    /// Cents.
    pub price_per_screen: i32,
    pub total_screens: i32,
    pub verified: bool,
}

impl From<streaming_account::Model> for AccountView {
    fn from(m: streaming_account::Model) -> Self {
        Self {
            id: m.id,
            owner: m.owner_id,
            service: m.service_id,
            username: m.username,
            password: m.password,
            price_per_screen: m.price_per_screen,
            total_screens: m.total_screens,
            verified: m.verified,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AccountInput {
    pub service: Uuid,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub price_per_screen: i32,
    pub total_screens: i32,
}

impl From<AccountInput> for NewAccount {
    fn from(i: AccountInput) -> Self {
        NewAccount {
            service_id: i.service,
            username: i.username,
            password: i.password,
            price_per_screen: i.price_per_screen,
            total_screens: i.total_screens,
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct AccountPatchInput {
    pub service: Option<Uuid>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub price_per_screen: Option<i32>,
    pub total_screens: Option<i32>,
    pub verified: Option<bool>,
}

impl From<AccountPatchInput> for AccountChanges {
    fn from(i: AccountPatchInput) -> Self {
        AccountChanges {
            service_id: i.service,
            username: i.username,
            password: i.password,
            price_per_screen: i.price_per_screen,
            total_screens: i.total_screens,
            verified: i.verified,
        }
    }
}

#[utoipa::path(get, path = "/api/accounts", tag = "accounts", responses((status = 200, description = "Caller's accounts (all for admins)", body = [AccountView]), (status = 401, description = "Unauthorized")))]
pub async fn list(State(state): State<ServerState>, Extension(caller): Extension<Caller>) -> Result<Json<Vec<AccountView>>, JsonApiError> {
    let rows = state.accounts.list(&caller).await?;
    Ok(Json(rows.into_iter().map(AccountView::from).collect()))
}

#[utoipa::path(get, path = "/api/accounts/{id}", tag = "accounts", params(("id" = Uuid, Path, description = "Account ID")), responses((status = 200, description = "OK", body = AccountView), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Extension(caller): Extension<Caller>, Path(id): Path<Uuid>) -> Result<Json<AccountView>, JsonApiError> {
    Ok(Json(state.accounts.get(&caller, id).await?.into()))
}

#[utoipa::path(post, path = "/api/accounts", tag = "accounts", request_body = AccountInput, responses((status = 201, description = "Created", body = AccountView), (status = 400, description = "Validation Error"), (status = 401, description = "Unauthorized")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    WithRejection(Json(input), _): WithRejection<Json<AccountInput>, JsonApiError>,
) -> Result<(StatusCode, Json<AccountView>), JsonApiError> {
    let created = state.accounts.create(&caller, input.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(patch, path = "/api/accounts/{id}", tag = "accounts", params(("id" = Uuid, Path, description = "Account ID")), request_body = AccountPatchInput, responses((status = 200, description = "Updated", body = AccountView), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    WithRejection(Json(input), _): WithRejection<Json<AccountPatchInput>, JsonApiError>,
) -> Result<Json<AccountView>, JsonApiError> {
    Ok(Json(state.accounts.update(&caller, id, input.into()).await?.into()))
}

#[utoipa::path(delete, path = "/api/accounts/{id}", tag = "accounts", params(("id" = Uuid, Path, description = "Account ID")), responses((status = 204, description = "Deleted with its screens"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Extension(caller): Extension<Caller>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.accounts.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
