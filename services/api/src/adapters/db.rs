//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `StorageService` port from the `core` crate. It handles all interactions
//! with the SQLite database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use std::time::Duration;
use string_transformer_core::domain::{AdminLog, SessionIdentity, StringEntry, StringPair, User};
use string_transformer_core::ports::{PortError, PortResult, StorageService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `StorageService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter` from an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (and creates, if missing) the SQLite database at `database_url`.
    ///
    /// WAL journal mode and a busy timeout keep concurrent request handlers
    /// from tripping over each other's writes.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Creates an in-memory database (primarily for testing).
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // In-memory databases should use a single connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Ensures the bootstrap admin account exists and seeds the default
    /// `hello -> OLLEH` pattern into an otherwise empty pattern table.
    pub async fn seed_defaults(
        &self,
        admin_username: &str,
        admin_password_hash: &str,
    ) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO users (username, password_hash, is_admin, created_at)
             VALUES (?, ?, 1, ?)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(admin_username)
        .bind(admin_password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let (pair_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM string_pairs")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if pair_count == 0 {
            let admin = self
                .find_user_by_username(admin_username)
                .await?
                .ok_or_else(|| PortError::NotFound(format!("user {}", admin_username)))?;
            self.upsert_pair("hello", "OLLEH", admin.id).await?;
        }

        Ok(())
    }
}

/// Translates `sqlx` failures into the port's error vocabulary.
fn map_sqlx_error(e: sqlx::Error) -> PortError {
    match &e {
        sqlx::Error::RowNotFound => PortError::NotFound(e.to_string()),
        sqlx::Error::Database(db_err)
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            PortError::Conflict(e.to_string())
        }
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct PairRecord {
    id: i64,
    input_pattern: String,
    output_pattern: String,
    created_by: Option<i64>,
    created_at: DateTime<Utc>,
}
impl PairRecord {
    fn to_domain(self) -> StringPair {
        StringPair {
            id: self.id,
            input_pattern: self.input_pattern,
            output_pattern: self.output_pattern,
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct EntryRecord {
    id: i64,
    input_string: String,
    transformed_string: String,
    ip_address: String,
    accessed: bool,
    reaccessible: bool,
    created_at: DateTime<Utc>,
}
impl EntryRecord {
    fn to_domain(self) -> StringEntry {
        StringEntry {
            id: self.id,
            input_string: self.input_string,
            transformed_string: self.transformed_string,
            ip_address: self.ip_address,
            accessed: self.accessed,
            reaccessible: self.reaccessible,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    username: String,
    password_hash: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            is_admin: self.is_admin,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct AdminLogRecord {
    id: i64,
    username: String,
    ip_address: String,
    logged_in_at: DateTime<Utc>,
}
impl AdminLogRecord {
    fn to_domain(self) -> AdminLog {
        AdminLog {
            id: self.id,
            username: self.username,
            ip_address: self.ip_address,
            logged_in_at: self.logged_in_at,
        }
    }
}

//=========================================================================================
// `StorageService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StorageService for DbAdapter {
    async fn find_pair_by_input(&self, input_pattern: &str) -> PortResult<Option<StringPair>> {
        let record = sqlx::query_as::<_, PairRecord>(
            "SELECT id, input_pattern, output_pattern, created_by, created_at
             FROM string_pairs
             WHERE input_pattern = ?",
        )
        .bind(input_pattern)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(record.map(PairRecord::to_domain))
    }

    async fn upsert_pair(
        &self,
        input_pattern: &str,
        output_pattern: &str,
        created_by: i64,
    ) -> PortResult<StringPair> {
        // The conflict arm replaces the output in place, keeping the row's
        // identity and created_at.
        let record = sqlx::query_as::<_, PairRecord>(
            "INSERT INTO string_pairs (input_pattern, output_pattern, created_by, created_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (input_pattern) DO UPDATE SET output_pattern = excluded.output_pattern
             RETURNING id, input_pattern, output_pattern, created_by, created_at",
        )
        .bind(input_pattern.to_lowercase())
        .bind(output_pattern)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(record.to_domain())
    }

    async fn delete_pair(&self, pair_id: i64) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM string_pairs WHERE id = ?")
            .bind(pair_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("string pair {}", pair_id)));
        }
        Ok(())
    }

    async fn list_pairs(&self) -> PortResult<Vec<StringPair>> {
        let records = sqlx::query_as::<_, PairRecord>(
            "SELECT id, input_pattern, output_pattern, created_by, created_at
             FROM string_pairs
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(records.into_iter().map(PairRecord::to_domain).collect())
    }

    async fn find_entry(&self, entry_id: i64) -> PortResult<Option<StringEntry>> {
        let record = sqlx::query_as::<_, EntryRecord>(
            "SELECT id, input_string, transformed_string, ip_address,
                    accessed, reaccessible, created_at
             FROM string_entries
             WHERE id = ?",
        )
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(record.map(EntryRecord::to_domain))
    }

    async fn find_accessed_entry(
        &self,
        ip_address: &str,
        input_string: &str,
    ) -> PortResult<Option<StringEntry>> {
        let record = sqlx::query_as::<_, EntryRecord>(
            "SELECT id, input_string, transformed_string, ip_address,
                    accessed, reaccessible, created_at
             FROM string_entries
             WHERE ip_address = ? AND input_string = ? AND accessed = 1",
        )
        .bind(ip_address)
        .bind(input_string)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(record.map(EntryRecord::to_domain))
    }

    async fn create_entry(
        &self,
        input_string: &str,
        transformed_string: &str,
        ip_address: &str,
    ) -> PortResult<StringEntry> {
        let record = sqlx::query_as::<_, EntryRecord>(
            "INSERT INTO string_entries
                 (input_string, transformed_string, ip_address, accessed, reaccessible, created_at)
             VALUES (?, ?, ?, 0, 0, ?)
             RETURNING id, input_string, transformed_string, ip_address,
                       accessed, reaccessible, created_at",
        )
        .bind(input_string)
        .bind(transformed_string)
        .bind(ip_address)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(record.to_domain())
    }

    async fn reset_entry_for_reaccess(&self, entry_id: i64) -> PortResult<bool> {
        let result = sqlx::query(
            "UPDATE string_entries
             SET accessed = 0, reaccessible = 0
             WHERE id = ? AND accessed = 1 AND reaccessible = 1",
        )
        .bind(entry_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_entry_accessed(&self, entry_id: i64) -> PortResult<bool> {
        // The conditional update is the serialization point: of N concurrent
        // views on one entry, exactly one claims the row.
        let result = sqlx::query(
            "UPDATE string_entries
             SET accessed = 1, reaccessible = 0
             WHERE id = ? AND (accessed = 0 OR reaccessible = 1)",
        )
        .bind(entry_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_entry_reaccess(
        &self,
        entry_id: i64,
        reaccessible: bool,
        accessed: bool,
    ) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE string_entries SET reaccessible = ?, accessed = ? WHERE id = ?",
        )
        .bind(reaccessible)
        .bind(accessed)
        .bind(entry_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("string entry {}", entry_id)));
        }
        Ok(())
    }

    async fn delete_entry(&self, entry_id: i64) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM string_entries WHERE id = ?")
            .bind(entry_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("string entry {}", entry_id)));
        }
        Ok(())
    }

    async fn clear_entries(&self) -> PortResult<u64> {
        let result = sqlx::query("DELETE FROM string_entries")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn list_entries(&self) -> PortResult<Vec<StringEntry>> {
        let records = sqlx::query_as::<_, EntryRecord>(
            "SELECT id, input_string, transformed_string, ip_address,
                    accessed, reaccessible, created_at
             FROM string_entries
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(records.into_iter().map(EntryRecord::to_domain).collect())
    }

    async fn find_user_by_id(&self, user_id: i64) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password_hash, is_admin, created_at
             FROM users
             WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(record.map(UserRecord::to_domain))
    }

    async fn find_user_by_username(&self, username: &str) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password_hash, is_admin, created_at
             FROM users
             WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(record.map(UserRecord::to_domain))
    }

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (username, password_hash, is_admin, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING id, username, password_hash, is_admin, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .bind(is_admin)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(record.to_domain())
    }

    async fn delete_user(&self, user_id: i64) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn update_user_password(&self, user_id: i64, password_hash: &str) -> PortResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password_hash, is_admin, created_at
             FROM users
             ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(records.into_iter().map(UserRecord::to_domain).collect())
    }

    async fn append_admin_log(&self, username: &str, ip_address: &str) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO admin_logs (username, ip_address, logged_in_at) VALUES (?, ?, ?)",
        )
        .bind(username)
        .bind(ip_address)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_admin_logs(&self) -> PortResult<Vec<AdminLog>> {
        let records = sqlx::query_as::<_, AdminLogRecord>(
            "SELECT id, username, ip_address, logged_in_at
             FROM admin_logs
             ORDER BY logged_in_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(records.into_iter().map(AdminLogRecord::to_domain).collect())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO auth_sessions (id, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(user_id)
        .bind(expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn validate_auth_session(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> PortResult<SessionIdentity> {
        let row: Option<(i64, String, bool)> = sqlx::query_as(
            "SELECT u.id, u.username, u.is_admin
             FROM auth_sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.id = ? AND s.expires_at > ?",
        )
        .bind(session_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some((user_id, username, is_admin)) => Ok(SessionIdentity {
                user_id,
                username,
                is_admin,
            }),
            None => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn setup_test_db() -> DbAdapter {
        let db = DbAdapter::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    #[tokio::test]
    async fn upsert_replaces_output_in_place() {
        let db = setup_test_db().await;
        let user = db.create_user("alice", "hash", true).await.unwrap();

        let first = db.upsert_pair("hello", "OLLEH", user.id).await.unwrap();
        let second = db.upsert_pair("hello", "HELLO!", user.id).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.output_pattern, "HELLO!");

        let pairs = db.list_pairs().await.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].output_pattern, "HELLO!");
    }

    #[tokio::test]
    async fn upsert_normalizes_input_case() {
        let db = setup_test_db().await;
        let user = db.create_user("alice", "hash", true).await.unwrap();

        db.upsert_pair("HeLLo", "OLLEH", user.id).await.unwrap();

        let found = db.find_pair_by_input("hello").await.unwrap();
        assert_eq!(found.unwrap().output_pattern, "OLLEH");

        // A differently-cased upsert hits the same row.
        db.upsert_pair("HELLO", "X", user.id).await.unwrap();
        assert_eq!(db.list_pairs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_pair_unknown_id_is_not_found() {
        let db = setup_test_db().await;
        let err = db.delete_pair(99).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn mark_entry_accessed_claims_row_once() {
        let db = setup_test_db().await;
        let entry = db.create_entry("hello", "OLLEH", "1.2.3.4").await.unwrap();

        assert!(db.mark_entry_accessed(entry.id).await.unwrap());
        assert!(!db.mark_entry_accessed(entry.id).await.unwrap());

        let stored = db.find_entry(entry.id).await.unwrap().unwrap();
        assert!(stored.accessed);
        assert!(!stored.reaccessible);
    }

    #[tokio::test]
    async fn reaccess_grant_reopens_the_claim() {
        let db = setup_test_db().await;
        let entry = db.create_entry("hello", "OLLEH", "1.2.3.4").await.unwrap();
        db.mark_entry_accessed(entry.id).await.unwrap();

        // Grant: reaccessible on, accessed reset.
        db.set_entry_reaccess(entry.id, true, false).await.unwrap();
        let stored = db.find_entry(entry.id).await.unwrap().unwrap();
        assert!(stored.reaccessible);
        assert!(!stored.accessed);

        assert!(db.mark_entry_accessed(entry.id).await.unwrap());
        assert!(!db.mark_entry_accessed(entry.id).await.unwrap());
    }

    #[tokio::test]
    async fn reset_for_reaccess_requires_consumed_grant() {
        let db = setup_test_db().await;
        let entry = db.create_entry("hello", "OLLEH", "1.2.3.4").await.unwrap();

        // Fresh entry: nothing to reset.
        assert!(!db.reset_entry_for_reaccess(entry.id).await.unwrap());

        // accessed + reaccessible is the state left by the admin toggling the
        // grant on for an entry submitted again before any view.
        db.mark_entry_accessed(entry.id).await.unwrap();
        db.set_entry_reaccess(entry.id, true, true).await.unwrap();
        assert!(db.reset_entry_for_reaccess(entry.id).await.unwrap());

        let stored = db.find_entry(entry.id).await.unwrap().unwrap();
        assert!(!stored.accessed);
        assert!(!stored.reaccessible);
    }

    #[tokio::test]
    async fn find_accessed_entry_ignores_fresh_entries() {
        let db = setup_test_db().await;
        let entry = db.create_entry("hello", "OLLEH", "1.2.3.4").await.unwrap();

        assert!(db
            .find_accessed_entry("1.2.3.4", "hello")
            .await
            .unwrap()
            .is_none());

        db.mark_entry_accessed(entry.id).await.unwrap();
        let found = db.find_accessed_entry("1.2.3.4", "hello").await.unwrap();
        assert_eq!(found.unwrap().id, entry.id);

        // Scoped by IP.
        assert!(db
            .find_accessed_entry("5.6.7.8", "hello")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn clear_entries_reports_the_count() {
        let db = setup_test_db().await;
        db.create_entry("a", "A", "1.1.1.1").await.unwrap();
        db.create_entry("b", "B", "2.2.2.2").await.unwrap();

        assert_eq!(db.clear_entries().await.unwrap(), 2);
        assert!(db.list_entries().await.unwrap().is_empty());
        assert_eq!(db.clear_entries().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let db = setup_test_db().await;
        db.create_user("alice", "hash", false).await.unwrap();

        let err = db.create_user("alice", "other", true).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict(_)));
    }

    #[tokio::test]
    async fn auth_session_round_trip_and_expiry() {
        let db = setup_test_db().await;
        let user = db.create_user("alice", "hash", true).await.unwrap();
        let now = Utc::now();

        db.create_auth_session("tok-1", user.id, now + Duration::hours(1))
            .await
            .unwrap();

        let identity = db.validate_auth_session("tok-1", now).await.unwrap();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.username, "alice");
        assert!(identity.is_admin);

        // Unknown and expired sessions are both unauthorized.
        assert!(matches!(
            db.validate_auth_session("tok-x", now).await.unwrap_err(),
            PortError::Unauthorized
        ));
        assert!(matches!(
            db.validate_auth_session("tok-1", now + Duration::hours(2))
                .await
                .unwrap_err(),
            PortError::Unauthorized
        ));

        db.delete_auth_session("tok-1").await.unwrap();
        assert!(matches!(
            db.validate_auth_session("tok-1", now).await.unwrap_err(),
            PortError::Unauthorized
        ));
    }

    #[tokio::test]
    async fn admin_log_is_append_only_newest_first() {
        let db = setup_test_db().await;
        db.append_admin_log("alice", "1.1.1.1").await.unwrap();
        db.append_admin_log("bob", "2.2.2.2").await.unwrap();

        let logs = db.list_admin_logs().await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].username, "bob");
        assert_eq!(logs[1].username, "alice");
    }

    #[tokio::test]
    async fn seed_defaults_is_idempotent() {
        let db = setup_test_db().await;

        db.seed_defaults("admin", "hash").await.unwrap();
        db.seed_defaults("admin", "other-hash").await.unwrap();

        let admin = db.find_user_by_username("admin").await.unwrap().unwrap();
        assert!(admin.is_admin);
        // The existing account is not overwritten.
        assert_eq!(admin.password_hash, "hash");

        let pairs = db.list_pairs().await.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].input_pattern, "hello");
        assert_eq!(pairs[0].output_pattern, "OLLEH");
    }
}
