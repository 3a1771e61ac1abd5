//! services/api/src/web/mod.rs
//!
//! The web surface: public submit/view endpoints, the admin dashboard
//! endpoints, the session middleware, and the OpenAPI master definition.

pub mod admin;
pub mod client_ip;
pub mod middleware;
pub mod public;
pub mod state;

use axum::response::Json;
use utoipa::OpenApi;

pub use middleware::require_session;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        public::submit_handler,
        public::view_handler,
        admin::login_handler,
        admin::logout_handler,
        admin::dashboard_handler,
        admin::upsert_pair_handler,
        admin::delete_pair_handler,
        admin::toggle_reaccess_handler,
        admin::delete_entry_handler,
        admin::clear_entries_handler,
        admin::add_user_handler,
        admin::delete_user_handler,
        admin::change_password_handler,
    ),
    components(
        schemas(
            public::SubmitRequest,
            public::SubmitResponse,
            public::ViewResponse,
            public::NoMatchResponse,
            admin::LoginRequest,
            admin::LoginResponse,
            admin::UpsertPairRequest,
            admin::AddUserRequest,
            admin::ChangePasswordRequest,
            admin::MessageResponse,
            admin::EntryInfo,
            admin::PairInfo,
            admin::UserInfo,
            admin::AdminLogInfo,
            admin::DashboardResponse,
        )
    ),
    tags(
        (name = "String Transformer API", description = "One-time string transformation lookups and their admin dashboard.")
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
