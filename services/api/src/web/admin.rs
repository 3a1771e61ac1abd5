//! services/api/src/web/admin.rs
//!
//! Dashboard endpoints: login/logout, pattern management, entry management,
//! user management, and the login audit trail. Pattern and entry management
//! need any authenticated user; user management and the bulk clear are
//! admin-only.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use string_transformer_core::domain::{AdminLog, SessionIdentity, StringEntry, StringPair, User};
use string_transformer_core::ports::PortError;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::auth::{self, AuthError};
use crate::web::client_ip::client_ip;
use crate::web::middleware::{require_admin, session_cookie_value, SESSION_COOKIE};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub user_id: i64,
    pub username: String,
    pub is_admin: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct UpsertPairRequest {
    pub input_pattern: String,
    pub output_pattern: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct EntryInfo {
    pub id: i64,
    pub input_string: String,
    pub transformed_string: String,
    pub ip_address: String,
    pub accessed: bool,
    pub reaccessible: bool,
    pub created_at: DateTime<Utc>,
}

impl From<StringEntry> for EntryInfo {
    fn from(e: StringEntry) -> Self {
        Self {
            id: e.id,
            input_string: e.input_string,
            transformed_string: e.transformed_string,
            ip_address: e.ip_address,
            accessed: e.accessed,
            reaccessible: e.reaccessible,
            created_at: e.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PairInfo {
    pub id: i64,
    pub input_pattern: String,
    pub output_pattern: String,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<StringPair> for PairInfo {
    fn from(p: StringPair) -> Self {
        Self {
            id: p.id,
            input_pattern: p.input_pattern,
            output_pattern: p.output_pattern,
            created_by: p.created_by,
            created_at: p.created_at,
        }
    }
}

/// Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            is_admin: u.is_admin,
            created_at: u.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AdminLogInfo {
    pub id: i64,
    pub username: String,
    pub ip_address: String,
    pub logged_in_at: DateTime<Utc>,
}

impl From<AdminLog> for AdminLogInfo {
    fn from(l: AdminLog) -> Self {
        Self {
            id: l.id,
            username: l.username,
            ip_address: l.ip_address,
            logged_in_at: l.logged_in_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub string_entries: Vec<EntryInfo>,
    pub string_pairs: Vec<PairInfo>,
    pub admin_logs: Vec<AdminLogInfo>,
    pub users: Vec<UserInfo>,
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Specific reasons go to the authenticated admin; persistence detail never
/// leaves the operational log.
fn map_port_error(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {}", what)),
        PortError::Conflict(_) => (StatusCode::BAD_REQUEST, "Already exists".to_string()),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Unexpected(detail) => {
            error!("Storage failure: {}", detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred. Please try again later.".to_string(),
            )
        }
    }
}

fn map_auth_error(e: AuthError) -> (StatusCode, String) {
    match e {
        AuthError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        }
        AuthError::Validation(message) => (StatusCode::BAD_REQUEST, message),
        AuthError::Port(e) => map_port_error(e),
    }
}

fn message(text: impl Into<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.into(),
    })
}

//=========================================================================================
// Session Handlers
//=========================================================================================

/// POST /admin/login - Authenticate and establish a dashboard session
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let ip_address = client_ip(&headers, peer, state.config.behind_proxy);

    let session = auth::authenticate(
        &state.db,
        &req.username,
        &req.password,
        &ip_address,
        state.config.session_lifetime_secs,
    )
    .await
    .map_err(map_auth_error)?;

    let cookie = format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, session.session_id, state.config.session_lifetime_secs
    );

    let response = LoginResponse {
        user_id: session.identity.user_id,
        username: session.identity.username,
        is_admin: session.identity.is_admin,
    };

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// GET /admin/logout - End the dashboard session
#[utoipa::path(
    get,
    path = "/admin/logout",
    responses(
        (status = 200, description = "Logout successful"),
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Some(session_id) = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session_cookie_value)
    {
        state
            .db
            .delete_auth_session(session_id)
            .await
            .map_err(map_port_error)?;
    }

    let cookie = format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}

//=========================================================================================
// Dashboard Handlers
//=========================================================================================

/// GET /admin/dashboard - Everything the dashboard renders, newest first
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let string_entries = state.db.list_entries().await.map_err(map_port_error)?;
    let string_pairs = state.db.list_pairs().await.map_err(map_port_error)?;
    let admin_logs = state.db.list_admin_logs().await.map_err(map_port_error)?;
    let users = state.db.list_users().await.map_err(map_port_error)?;

    info!("Admin dashboard accessed by user: {}", identity.username);

    Ok(Json(DashboardResponse {
        string_entries: string_entries.into_iter().map(Into::into).collect(),
        string_pairs: string_pairs.into_iter().map(Into::into).collect(),
        admin_logs: admin_logs.into_iter().map(Into::into).collect(),
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// POST /admin/string_pair - Add a pattern, or replace its output
#[utoipa::path(
    post,
    path = "/admin/string_pair",
    request_body = UpsertPairRequest,
    responses(
        (status = 200, description = "Pattern added or updated", body = PairInfo),
        (status = 400, description = "Blank pattern"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn upsert_pair_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    Json(req): Json<UpsertPairRequest>,
) -> Result<Json<PairInfo>, (StatusCode, String)> {
    if req.input_pattern.trim().is_empty() || req.output_pattern.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Both patterns are required".to_string(),
        ));
    }

    let pair = state
        .db
        .upsert_pair(&req.input_pattern, &req.output_pattern, identity.user_id)
        .await
        .map_err(map_port_error)?;

    info!(
        "String pair '{}' saved by user: {}",
        pair.input_pattern, identity.username
    );
    Ok(Json(pair.into()))
}

/// POST /admin/string_pair/{id}/delete - Remove a pattern
///
/// Existing entries keep their already-resolved output; deleting a pattern
/// never invalidates a past reveal.
#[utoipa::path(
    post,
    path = "/admin/string_pair/{id}/delete",
    responses(
        (status = 200, description = "Pattern deleted", body = MessageResponse),
        (status = 404, description = "Unknown pattern"),
        (status = 401, description = "Not logged in")
    ),
    params(("id" = i64, Path, description = "Pattern id"))
)]
pub async fn delete_pair_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    Path(pair_id): Path<i64>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    state.db.delete_pair(pair_id).await.map_err(map_port_error)?;

    info!(
        "String pair #{} deleted by user: {}",
        pair_id, identity.username
    );
    Ok(message("String pair deleted successfully"))
}

//=========================================================================================
// Entry Management Handlers
//=========================================================================================

/// POST /admin/entry/{id}/toggle_reaccess - Flip the reaccess grant
///
/// Turning the grant on also resets the accessed flag so the next view
/// proceeds; turning it off on an already-off entry changes nothing.
#[utoipa::path(
    post,
    path = "/admin/entry/{id}/toggle_reaccess",
    responses(
        (status = 200, description = "Grant toggled", body = MessageResponse),
        (status = 404, description = "Unknown entry"),
        (status = 401, description = "Not logged in")
    ),
    params(("id" = i64, Path, description = "Entry id"))
)]
pub async fn toggle_reaccess_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    Path(entry_id): Path<i64>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let enabled = state
        .access
        .toggle_reaccess(entry_id)
        .await
        .map_err(map_port_error)?
        .ok_or((
            StatusCode::NOT_FOUND,
            format!("Not found: string entry {}", entry_id),
        ))?;

    info!(
        "Reaccess for entry #{} set to {} by user: {}",
        entry_id, enabled, identity.username
    );
    if enabled {
        Ok(message(format!(
            "Reaccess enabled for entry #{}. The string can be viewed again.",
            entry_id
        )))
    } else {
        Ok(message(format!("Reaccess disabled for entry #{}.", entry_id)))
    }
}

/// POST /admin/entry/{id}/delete - Remove an entry
#[utoipa::path(
    post,
    path = "/admin/entry/{id}/delete",
    responses(
        (status = 200, description = "Entry deleted", body = MessageResponse),
        (status = 404, description = "Unknown entry"),
        (status = 401, description = "Not logged in")
    ),
    params(("id" = i64, Path, description = "Entry id"))
)]
pub async fn delete_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    Path(entry_id): Path<i64>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    state
        .db
        .delete_entry(entry_id)
        .await
        .map_err(map_port_error)?;

    info!(
        "String entry #{} deleted by user: {}",
        entry_id, identity.username
    );
    Ok(message(format!(
        "String entry #{} has been deleted successfully.",
        entry_id
    )))
}

/// POST /admin/entries/clear_all - Delete every entry (admin only)
#[utoipa::path(
    post,
    path = "/admin/entries/clear_all",
    responses(
        (status = 200, description = "Entries cleared", body = MessageResponse),
        (status = 403, description = "Not an administrator"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn clear_entries_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    require_admin(&identity)?;

    let cleared = state.db.clear_entries().await.map_err(map_port_error)?;

    warn!(
        "All string entries ({}) cleared by admin: {}",
        cleared, identity.username
    );
    Ok(message(format!(
        "Successfully cleared {} string entries",
        cleared
    )))
}

//=========================================================================================
// User Management Handlers
//=========================================================================================

/// POST /admin/users/add - Create a dashboard user (admin only)
#[utoipa::path(
    post,
    path = "/admin/users/add",
    request_body = AddUserRequest,
    responses(
        (status = 201, description = "User created", body = UserInfo),
        (status = 400, description = "Username already exists or blank fields"),
        (status = 403, description = "Not an administrator"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn add_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    Json(req): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<UserInfo>), (StatusCode, String)> {
    require_admin(&identity)?;

    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Username and password are required".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&req.password).map_err(map_auth_error)?;
    let user = state
        .db
        .create_user(&req.username, &password_hash, req.is_admin)
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => (
                StatusCode::BAD_REQUEST,
                "Username already exists".to_string(),
            ),
            other => map_port_error(other),
        })?;

    info!(
        "User '{}' added by admin: {}",
        user.username, identity.username
    );
    Ok((StatusCode::CREATED, Json(UserInfo::from(user))))
}

/// POST /admin/users/{id}/delete - Remove a dashboard user (admin only)
#[utoipa::path(
    post,
    path = "/admin/users/{id}/delete",
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Attempted self-deletion"),
        (status = 404, description = "Unknown user"),
        (status = 403, description = "Not an administrator"),
        (status = 401, description = "Not logged in")
    ),
    params(("id" = i64, Path, description = "User id"))
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    require_admin(&identity)?;

    // Prevent deleting yourself
    if user_id == identity.user_id {
        return Err((
            StatusCode::BAD_REQUEST,
            "You cannot delete your own account".to_string(),
        ));
    }

    state.db.delete_user(user_id).await.map_err(map_port_error)?;

    info!("User #{} deleted by admin: {}", user_id, identity.username);
    Ok(message("User deleted successfully"))
}

/// POST /admin/change_password - Replace the caller's own password
#[utoipa::path(
    post,
    path = "/admin/change_password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn change_password_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    auth::change_password(
        &state.db,
        identity.user_id,
        &req.current_password,
        &req.new_password,
        &req.confirm_password,
    )
    .await
    .map_err(map_auth_error)?;

    Ok(message("Your password has been updated successfully."))
}

//=========================================================================================
// Tests
//=========================================================================================
