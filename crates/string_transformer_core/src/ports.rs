//! crates/string_transformer_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AdminLog, SessionIdentity, StringEntry, StringPair, User};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the external store.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Port (Trait)
//=========================================================================================

/// The single persistence port. Every decision the controllers make is a
/// read-then-write through this trait; no state is held between requests.
#[async_trait]
pub trait StorageService: Send + Sync {
    // --- String Pairs (patterns) ---

    /// Exact lookup by the already-lowercased input pattern.
    async fn find_pair_by_input(&self, input_pattern: &str) -> PortResult<Option<StringPair>>;

    /// Insert the pattern, or replace the output in place when the (case
    /// insensitive) input pattern already exists. Identity and `created_at`
    /// are kept on replace.
    async fn upsert_pair(
        &self,
        input_pattern: &str,
        output_pattern: &str,
        created_by: i64,
    ) -> PortResult<StringPair>;

    async fn delete_pair(&self, pair_id: i64) -> PortResult<()>;

    async fn list_pairs(&self) -> PortResult<Vec<StringPair>>;

    // --- String Entries (access ledger) ---

    async fn find_entry(&self, entry_id: i64) -> PortResult<Option<StringEntry>>;

    /// The already-revealed record for this (ip, input), if any.
    async fn find_accessed_entry(
        &self,
        ip_address: &str,
        input_string: &str,
    ) -> PortResult<Option<StringEntry>>;

    async fn create_entry(
        &self,
        input_string: &str,
        transformed_string: &str,
        ip_address: &str,
    ) -> PortResult<StringEntry>;

    /// Consume a reaccess grant: clear both flags, but only while the row
    /// still holds `accessed AND reaccessible`. Returns false if the row was
    /// concurrently changed (or deleted) and nothing was updated.
    async fn reset_entry_for_reaccess(&self, entry_id: i64) -> PortResult<bool>;

    /// The reveal transition, as a compare-and-set: set `accessed = true,
    /// reaccessible = false` only while `accessed = false OR reaccessible =
    /// true`. Returns false when no row qualified, which the caller must
    /// treat as the entry being locked.
    async fn mark_entry_accessed(&self, entry_id: i64) -> PortResult<bool>;

    /// Admin toggle: write both flags as given.
    async fn set_entry_reaccess(
        &self,
        entry_id: i64,
        reaccessible: bool,
        accessed: bool,
    ) -> PortResult<()>;

    async fn delete_entry(&self, entry_id: i64) -> PortResult<()>;

    /// Deletes every entry, returning how many were removed.
    async fn clear_entries(&self) -> PortResult<u64>;

    async fn list_entries(&self) -> PortResult<Vec<StringEntry>>;

    // --- Users ---

    async fn find_user_by_id(&self, user_id: i64) -> PortResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> PortResult<Option<User>>;

    /// Fails with `Conflict` when the username is already taken.
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> PortResult<User>;

    async fn delete_user(&self, user_id: i64) -> PortResult<()>;

    async fn update_user_password(&self, user_id: i64, password_hash: &str) -> PortResult<()>;

    async fn list_users(&self) -> PortResult<Vec<User>>;

    // --- Admin login log ---

    async fn append_admin_log(&self, username: &str, ip_address: &str) -> PortResult<()>;

    async fn list_admin_logs(&self) -> PortResult<Vec<AdminLog>>;

    // --- Auth sessions ---

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves a cookie value to the identity it carries. `Unauthorized`
    /// when the session is unknown or expired relative to `now`.
    async fn validate_auth_session(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> PortResult<SessionIdentity>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}
