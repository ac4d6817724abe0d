use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use uuid::Uuid;

use service::auth::domain::{AuthUser, LoginInput, RegisterInput};
use service::caller::Caller;

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub is_admin: bool,
}

impl From<AuthUser> for UserView {
    fn from(u: AuthUser) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            phone_number: u.phone_number,
            is_admin: u.is_admin,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginOutput {
    pub token: String,
    /// Unix seconds.
    pub expires_at: i64,
    pub user: UserView,
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered", body = UserView), (status = 400, description = "Validation Error"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    WithRejection(Json(input), _): WithRejection<Json<RegisterInput>, JsonApiError>,
) -> Result<(StatusCode, Json<UserView>), JsonApiError> {
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In", body = LoginOutput), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    WithRejection(Json(input), _): WithRejection<Json<LoginInput>, JsonApiError>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let out = LoginOutput { token: session.token, expires_at: session.expires_at, user: session.user.into() };
    Ok((jar.add(cookie), Json(out)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current user", body = UserView), (status = 401, description = "Unauthorized")))]
pub async fn me(State(state): State<ServerState>, Extension(caller): Extension<Caller>) -> Result<Json<UserView>, JsonApiError> {
    let uid = caller.require_user()?;
    let user = state.auth.profile(uid).await?;
    Ok(Json(user.into()))
}

/// `Bearer` token from the Authorization header. A header in any other scheme is rejected.
fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, JsonApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else { return Ok(None) };
    let value = value.to_str().map_err(|_| JsonApiError::unauthorized("malformed Authorization header"))?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => {
            tracing::warn!("invalid Authorization format (expect Bearer)");
            Err(JsonApiError::unauthorized("expected Authorization: Bearer <token>"))
        }
    }
}

/// Resolves the request's [`Caller`] from a Bearer header or the `auth_token`
/// cookie. No token means an anonymous caller; a bad or expired one is a 401.
pub async fn resolve_caller(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let token = match bearer_token(req.headers())? {
        Some(t) => Some(t),
        None => jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty()),
    };
    let caller = match token {
        Some(t) => state.auth.decode_token(&t)?.caller(),
        None => Caller::Anonymous,
    };
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}
