//! services/api/src/web/public.rs
//!
//! The public surface: submit an input string, then view the transformed
//! result at the redirect target. These handlers stay thin; the one-time
//! access decisions are the `AccessController`'s.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use string_transformer_core::access::{SubmitOutcome, ViewOutcome};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::web::client_ip::client_ip;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SubmitRequest {
    pub input_string: String,
}

/// The redirect target for a successful submission.
#[derive(Serialize, ToSchema)]
pub struct SubmitResponse {
    pub entry_id: i64,
    pub view_path: String,
}

#[derive(Serialize, ToSchema)]
pub struct ViewResponse {
    pub input_string: String,
    pub result: String,
    pub one_time: bool,
}

#[derive(Serialize, ToSchema)]
pub struct NoMatchResponse {
    pub status: &'static str,
}

/// The one body every refused or unmatched request gets. A submission with
/// no pattern, a replayed submission, and a locked view are deliberately
/// indistinguishable to the client.
fn no_match_body() -> Json<NoMatchResponse> {
    Json(NoMatchResponse { status: "no_match" })
}

fn internal_error() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An error occurred. Please try again later.".to_string(),
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /submit - Submit an input string for transformation
#[utoipa::path(
    post,
    path = "/submit",
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Submission accepted; follow view_path", body = SubmitResponse),
        (status = 200, description = "No match for this input", body = NoMatchResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<SubmitRequest>,
) -> Result<Response, (StatusCode, String)> {
    let ip_address = client_ip(&headers, peer, state.config.behind_proxy);
    info!(
        "Transformation request from IP: {} for string: {}",
        ip_address, req.input_string
    );

    let outcome = state
        .access
        .submit(&req.input_string, &ip_address)
        .await
        .map_err(|e| {
            error!("Error in submit: {:?}", e);
            internal_error()
        })?;

    match outcome {
        SubmitOutcome::Created { entry_id } => {
            let response = SubmitResponse {
                entry_id,
                view_path: format!("/view/{}", entry_id),
            };
            Ok((StatusCode::OK, Json(response)).into_response())
        }
        SubmitOutcome::NoMatch => {
            info!("No matching pattern found for: {}", req.input_string);
            Ok((StatusCode::OK, no_match_body()).into_response())
        }
        SubmitOutcome::AlreadyAccessed => {
            info!(
                "IP {} already accessed pattern '{}'",
                ip_address, req.input_string
            );
            Ok((StatusCode::OK, no_match_body()).into_response())
        }
    }
}

/// GET /view/{id} - Reveal the transformed result, at most once
#[utoipa::path(
    get,
    path = "/view/{id}",
    responses(
        (status = 200, description = "The transformed result", body = ViewResponse),
        (status = 200, description = "Entry is locked", body = NoMatchResponse),
        (status = 404, description = "Unknown entry", body = NoMatchResponse)
    ),
    params(
        ("id" = i64, Path, description = "The entry id returned by submit")
    )
)]
pub async fn view_handler(
    State(state): State<Arc<AppState>>,
    Path(entry_id): Path<i64>,
) -> Result<Response, (StatusCode, String)> {
    let outcome = state.access.view(entry_id).await.map_err(|e| {
        error!("Error in view for entry #{}: {:?}", entry_id, e);
        internal_error()
    })?;

    match outcome {
        ViewOutcome::Revealed {
            input_string,
            transformed_string,
        } => {
            info!("Entry #{} marked as accessed and reaccess disabled", entry_id);
            let response = ViewResponse {
                input_string,
                result: transformed_string,
                one_time: true,
            };
            Ok((StatusCode::OK, Json(response)).into_response())
        }
        ViewOutcome::Locked => {
            info!(
                "Access denied to entry #{} - already viewed and reaccess not enabled",
                entry_id
            );
            Ok((StatusCode::OK, no_match_body()).into_response())
        }
        ViewOutcome::NotFound => {
            info!("Invalid view ID requested: {}", entry_id);
            Ok((StatusCode::NOT_FOUND, no_match_body()).into_response())
        }
    }
}
