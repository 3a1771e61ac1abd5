//! services/api/src/bin/api.rs

use api_lib::{
    adapters::DbAdapter,
    auth,
    config::Config,
    error::ApiError,
    web::{
        admin::{
            add_user_handler, change_password_handler, clear_entries_handler,
            dashboard_handler, delete_entry_handler, delete_pair_handler, delete_user_handler,
            login_handler, logout_handler, toggle_reaccess_handler, upsert_pair_handler,
        },
        openapi_handler,
        public::{submit_handler, view_handler},
        require_session,
        state::AppState,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");
    if config.behind_proxy {
        info!("Proxy header trust enabled");
    }

    // --- 2. Connect to Database, Run Migrations & Seed Defaults ---
    info!("Connecting to database...");
    let db_adapter = Arc::new(DbAdapter::connect(&config.database_url).await?);
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    let bootstrap_hash = auth::hash_password(&config.bootstrap_admin_password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    db_adapter
        .seed_defaults(&config.bootstrap_admin_username, &bootstrap_hash)
        .await?;
    info!("Database ready.");

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(db_adapter, config.clone()));

    // --- 4. Create the Web Router ---
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/submit", post(submit_handler))
        .route("/view/{id}", get(view_handler))
        .route("/admin/login", post(login_handler))
        .route("/admin/logout", get(logout_handler))
        .route("/api-docs/openapi.json", get(openapi_handler));

    // Protected routes (session required; admin-only operations apply their
    // own guard on top)
    let protected_routes = Router::new()
        .route("/admin/dashboard", get(dashboard_handler))
        .route("/admin/string_pair", post(upsert_pair_handler))
        .route("/admin/string_pair/{id}/delete", post(delete_pair_handler))
        .route("/admin/entry/{id}/toggle_reaccess", post(toggle_reaccess_handler))
        .route("/admin/entry/{id}/delete", post(delete_entry_handler))
        .route("/admin/entries/clear_all", post(clear_entries_handler))
        .route("/admin/users/add", post(add_user_handler))
        .route("/admin/users/{id}/delete", post(delete_user_handler))
        .route("/admin/change_password", post(change_password_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
