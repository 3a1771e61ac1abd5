//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use string_transformer_core::access::AccessController;
use string_transformer_core::ports::StorageService;

/// The shared application state, created once at startup and passed to all handlers.
///
/// There is no other in-process shared mutable state; every request's
/// decisions go through the storage port.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn StorageService>,
    pub access: AccessController,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Arc<dyn StorageService>, config: Arc<Config>) -> Self {
        let access = AccessController::new(db.clone());
        Self { db, access, config }
    }
}
