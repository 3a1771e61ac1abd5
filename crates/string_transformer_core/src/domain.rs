//! crates/string_transformer_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};

/// An admin-defined input -> output mapping. Lookups are exact and
/// case-insensitive; `input_pattern` is stored lowercased.
#[derive(Debug, Clone)]
pub struct StringPair {
    pub id: i64,
    pub input_pattern: String,
    pub output_pattern: String,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// One submission's reveal state for a specific (IP, input) pair.
///
/// `accessed` means the transformed value has been shown at least once.
/// `reaccessible` is a transient admin grant allowing one more reveal.
#[derive(Debug, Clone)]
pub struct StringEntry {
    pub id: i64,
    pub input_string: String,
    pub transformed_string: String,
    pub ip_address: String,
    pub accessed: bool,
    pub reaccessible: bool,
    pub created_at: DateTime<Utc>,
}

// Represents a dashboard user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// One row per successful dashboard login. Append-only.
#[derive(Debug, Clone)]
pub struct AdminLog {
    pub id: i64,
    pub username: String,
    pub ip_address: String,
    pub logged_in_at: DateTime<Utc>,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// What a valid session cookie resolves to.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user_id: i64,
    pub username: String,
    pub is_admin: bool,
}
