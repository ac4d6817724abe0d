use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use models::screen_subscription::{self, NewScreen, PaymentStatus};
use service::caller::Caller;
use service::screens::ScreenPatch;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ScreenView {
    pub id: Uuid,
    pub streaming_account: Uuid,
    pub user: Option<Uuid>,
    pub is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    pub subscription_date: DateTime<FixedOffset>,
    /// `N` (not initiated), `P` (pending) or `C` (completed).
    #[schema(value_type = String, example = "N")]
    pub payment_status: PaymentStatus,
}

impl From<screen_subscription::Model> for ScreenView {
    fn from(m: screen_subscription::Model) -> Self {
        Self {
            id: m.id,
            streaming_account: m.account_id,
            user: m.user_id,
            is_active: m.is_active,
            subscription_date: m.created_at,
            payment_status: m.payment_status,
        }
    }
}

fn views(rows: Vec<screen_subscription::Model>) -> Json<Vec<ScreenView>> {
    Json(rows.into_iter().map(ScreenView::from).collect())
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ScreenInput {
    pub streaming_account: Uuid,
    #[serde(default)]
    pub user: Option<Uuid>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub payment_status: Option<PaymentStatus>,
}

impl From<ScreenInput> for NewScreen {
    fn from(i: ScreenInput) -> Self {
        NewScreen { account_id: i.streaming_account, user_id: i.user, is_active: i.is_active, payment_status: i.payment_status }
    }
}

/// Keeps an explicit `null` apart from a missing field.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct ScreenPatchInput {
    /// A user id claims the screen; `null` releases it (admin only).
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<Uuid>)]
    pub user: Option<Option<Uuid>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub payment_status: Option<PaymentStatus>,
}

impl From<ScreenPatchInput> for ScreenPatch {
    fn from(i: ScreenPatchInput) -> Self {
        ScreenPatch { user: i.user, is_active: i.is_active, payment_status: i.payment_status }
    }
}

#[utoipa::path(get, path = "/api/screens", tag = "screens", responses((status = 200, description = "One available screen per least-loaded account", body = [ScreenView])))]
pub async fn list(State(state): State<ServerState>, Extension(caller): Extension<Caller>) -> Result<Json<Vec<ScreenView>>, JsonApiError> {
    Ok(views(state.screens.list_available(&caller).await?))
}

#[utoipa::path(get, path = "/api/screens/my_screens", tag = "screens", responses((status = 200, description = "Screens assigned to the caller; empty when anonymous", body = [ScreenView])))]
pub async fn my_screens(State(state): State<ServerState>, Extension(caller): Extension<Caller>) -> Result<Json<Vec<ScreenView>>, JsonApiError> {
    Ok(views(state.screens.my_screens(&caller).await?))
}

#[utoipa::path(get, path = "/api/screens/{id}", tag = "screens", params(("id" = Uuid, Path, description = "Screen ID")), responses((status = 200, description = "OK", body = ScreenView), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Extension(caller): Extension<Caller>, Path(id): Path<Uuid>) -> Result<Json<ScreenView>, JsonApiError> {
    Ok(Json(state.screens.get(&caller, id).await?.into()))
}

#[utoipa::path(post, path = "/api/screens", tag = "screens", request_body = ScreenInput, responses((status = 201, description = "Created", body = ScreenView), (status = 400, description = "Validation Error (unknown account or capacity reached)"), (status = 403, description = "Forbidden")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    WithRejection(Json(input), _): WithRejection<Json<ScreenInput>, JsonApiError>,
) -> Result<(StatusCode, Json<ScreenView>), JsonApiError> {
    let created = state.screens.create(&caller, input.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(patch, path = "/api/screens/{id}", tag = "screens", params(("id" = Uuid, Path, description = "Screen ID")), request_body = ScreenPatchInput, responses((status = 200, description = "Updated", body = ScreenView), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found"), (status = 409, description = "Already assigned or inactive")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    WithRejection(Json(input), _): WithRejection<Json<ScreenPatchInput>, JsonApiError>,
) -> Result<Json<ScreenView>, JsonApiError> {
    Ok(Json(state.screens.update(&caller, id, input.into()).await?.into()))
}

#[utoipa::path(post, path = "/api/screens/{id}/claim", tag = "screens", params(("id" = Uuid, Path, description = "Screen ID")), responses((status = 200, description = "Claimed", body = ScreenView), (status = 404, description = "Not Found"), (status = 409, description = "Already assigned or inactive")))]
pub async fn claim(State(state): State<ServerState>, Extension(caller): Extension<Caller>, Path(id): Path<Uuid>) -> Result<Json<ScreenView>, JsonApiError> {
    Ok(Json(state.screens.claim(&caller, id).await?.into()))
}

#[utoipa::path(post, path = "/api/screens/claim_next", tag = "screens", responses((status = 200, description = "Claimed from the least-loaded account", body = ScreenView), (status = 404, description = "No screen available"), (status = 409, description = "Contended, retry")))]
pub async fn claim_next(State(state): State<ServerState>, Extension(caller): Extension<Caller>) -> Result<Json<ScreenView>, JsonApiError> {
    Ok(Json(state.screens.claim_next(&caller).await?.into()))
}

#[utoipa::path(delete, path = "/api/screens/{id}", tag = "screens", params(("id" = Uuid, Path, description = "Screen ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Extension(caller): Extension<Caller>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.screens.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_input_tells_null_from_missing() {
        let missing: ScreenPatchInput = serde_json::from_str(r#"{"payment_status":"P"}"#).unwrap();
        assert_eq!(missing.user, None);
        assert_eq!(missing.payment_status, Some(PaymentStatus::Pending));

        let null: ScreenPatchInput = serde_json::from_str(r#"{"user":null}"#).unwrap();
        assert_eq!(null.user, Some(None));

        let id = Uuid::new_v4();
        let set: ScreenPatchInput = serde_json::from_str(&format!(r#"{{"user":"{id}"}}"#)).unwrap();
        assert_eq!(ScreenPatch::from(set).user, Some(Some(id)));
    }
}
