use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::streaming_service;
use service::caller::Caller;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ServiceView {
    pub id: Uuid,
    pub name: String,
}

impl From<streaming_service::Model> for ServiceView {
    fn from(m: streaming_service::Model) -> Self { Self { id: m.id, name: m.name } }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ServiceInput {
    pub name: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ServicePatchInput {
    pub name: Option<String>,
}

#[utoipa::path(get, path = "/api/services", tag = "services", responses((status = 200, description = "Services by name", body = [ServiceView])))]
pub async fn list(State(state): State<ServerState>, Extension(caller): Extension<Caller>) -> Result<Json<Vec<ServiceView>>, JsonApiError> {
    let rows = state.catalog.list(&caller).await?;
    Ok(Json(rows.into_iter().map(ServiceView::from).collect()))
}

#[utoipa::path(get, path = "/api/services/{id}", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), responses((status = 200, description = "OK", body = ServiceView), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Extension(caller): Extension<Caller>, Path(id): Path<Uuid>) -> Result<Json<ServiceView>, JsonApiError> {
    Ok(Json(state.catalog.get(&caller, id).await?.into()))
}

#[utoipa::path(post, path = "/api/services", tag = "services", request_body = ServiceInput, responses((status = 201, description = "Created", body = ServiceView), (status = 400, description = "Validation Error"), (status = 403, description = "Forbidden")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    WithRejection(Json(input), _): WithRejection<Json<ServiceInput>, JsonApiError>,
) -> Result<(StatusCode, Json<ServiceView>), JsonApiError> {
    let created = state.catalog.create(&caller, &input.name).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(put, path = "/api/services/{id}", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), request_body = ServiceInput, responses((status = 200, description = "Updated", body = ServiceView), (status = 404, description = "Not Found")))]
pub async fn replace(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    WithRejection(Json(input), _): WithRejection<Json<ServiceInput>, JsonApiError>,
) -> Result<Json<ServiceView>, JsonApiError> {
    Ok(Json(state.catalog.rename(&caller, id, &input.name).await?.into()))
}

#[utoipa::path(patch, path = "/api/services/{id}", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), request_body = ServicePatchInput, responses((status = 200, description = "Updated", body = ServiceView), (status = 404, description = "Not Found")))]
pub async fn patch(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    WithRejection(Json(input), _): WithRejection<Json<ServicePatchInput>, JsonApiError>,
) -> Result<Json<ServiceView>, JsonApiError> {
    let updated = match input.name {
        Some(name) => state.catalog.rename(&caller, id, &name).await?,
        None => {
            // Empty patch still needs the write permission.
            service::policy::authorize(service::policy::Operation::UpdateService, &caller)?;
            state.catalog.get(&caller, id).await?
        }
    };
    Ok(Json(updated.into()))
}

#[utoipa::path(delete, path = "/api/services/{id}", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Extension(caller): Extension<Caller>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.catalog.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
