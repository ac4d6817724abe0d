use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::routes::{accounts, auth, screens, services};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct ErrorBody { pub error: String, pub detail: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        services::list,
        services::get,
        services::create,
        services::replace,
        services::patch,
        services::delete,
        accounts::list,
        accounts::get,
        accounts::create,
        accounts::update,
        accounts::delete,
        screens::list,
        screens::my_screens,
        screens::get,
        screens::create,
        screens::update,
        screens::claim,
        screens::claim_next,
        screens::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ErrorBody,
            auth::UserView,
            auth::LoginOutput,
            services::ServiceView,
            services::ServiceInput,
            services::ServicePatchInput,
            accounts::AccountView,
            accounts::AccountInput,
            accounts::AccountPatchInput,
            screens::ScreenView,
            screens::ScreenInput,
            screens::ScreenPatchInput,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "services"),
        (name = "accounts"),
        (name = "screens")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_screen_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for p in ["/api/screens", "/api/screens/claim_next", "/api/screens/{id}/claim", "/auth/login"] {
            assert!(paths.iter().any(|k| k.as_str() == p), "{p} missing");
        }
    }
}
