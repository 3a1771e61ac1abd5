//! services/api/src/auth.rs
//!
//! Password hashing and the dashboard authentication flows: login,
//! password change, logout. Handlers stay thin; the decisions live here.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use string_transformer_core::domain::SessionIdentity;
use string_transformer_core::ports::{PortError, StorageService};
use tracing::{info, warn};
use uuid::Uuid;

/// Failures surfaced by the authentication flows.
///
/// `InvalidCredentials` and `Validation` are user-facing; `Port` is a
/// persistence failure and rendered generically.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Port(#[from] PortError),
}

/// An established login session, ready to be turned into a cookie.
#[derive(Debug, Clone)]
pub struct EstablishedSession {
    pub identity: SessionIdentity,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Hashes a password with argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored argon2 hash. An unparseable hash
/// verifies as false rather than erroring; the account is simply unusable
/// until the password is reset.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Verifies the credentials and establishes a dashboard session.
///
/// On success an admin-log row is appended and a session row is created; on
/// failure nothing is written and the attempt is reported to the
/// operational log only.
pub async fn authenticate(
    db: &Arc<dyn StorageService>,
    username: &str,
    password: &str,
    ip_address: &str,
    session_lifetime_secs: i64,
) -> Result<EstablishedSession, AuthError> {
    info!("Login attempt for user: {} from IP: {}", username, ip_address);

    let user = db.find_user_by_username(username).await?;
    let user = match user {
        Some(u) if verify_password(password, &u.password_hash) => u,
        _ => {
            warn!("Failed login attempt for user: {}", username);
            return Err(AuthError::InvalidCredentials);
        }
    };

    db.append_admin_log(&user.username, ip_address).await?;

    let session_id = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::seconds(session_lifetime_secs);
    db.create_auth_session(&session_id, user.id, expires_at)
        .await?;

    info!("Successful login for user: {}", user.username);
    Ok(EstablishedSession {
        identity: SessionIdentity {
            user_id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        },
        session_id,
        expires_at,
    })
}

/// Replaces the caller's password after validating the request.
pub async fn change_password(
    db: &Arc<dyn StorageService>,
    user_id: i64,
    current_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<(), AuthError> {
    if current_password.is_empty() || new_password.is_empty() || confirm_password.is_empty() {
        return Err(AuthError::Validation(
            "All password fields are required.".to_string(),
        ));
    }
    if new_password != confirm_password {
        return Err(AuthError::Validation(
            "New passwords don't match.".to_string(),
        ));
    }

    let user = db
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| PortError::NotFound(format!("user {}", user_id)))?;

    if !verify_password(current_password, &user.password_hash) {
        warn!(
            "Failed password change attempt for {} (incorrect current password)",
            user.username
        );
        return Err(AuthError::Validation(
            "Current password is incorrect.".to_string(),
        ));
    }

    let new_hash = hash_password(new_password)?;
    db.update_user_password(user_id, &new_hash).await?;
    info!("Password changed successfully for user: {}", user.username);
    Ok(())
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::DbAdapter;

    async fn setup_db() -> Arc<dyn StorageService> {
        let db = DbAdapter::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        Arc::new(db)
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn authenticate_logs_and_creates_session() {
        let db = setup_db().await;
        let hash = hash_password("123").unwrap();
        db.create_user("admin", &hash, true).await.unwrap();

        let session = authenticate(&db, "admin", "123", "1.2.3.4", 3600)
            .await
            .unwrap();
        assert_eq!(session.identity.username, "admin");
        assert!(session.identity.is_admin);

        // The session resolves back to the same identity.
        let identity = db
            .validate_auth_session(&session.session_id, Utc::now())
            .await
            .unwrap();
        assert_eq!(identity.user_id, session.identity.user_id);

        // The login is on the audit trail.
        let logs = db.list_admin_logs().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].username, "admin");
        assert_eq!(logs[0].ip_address, "1.2.3.4");
    }

    #[tokio::test]
    async fn authenticate_rejects_bad_password_without_writing() {
        let db = setup_db().await;
        let hash = hash_password("123").unwrap();
        db.create_user("admin", &hash, true).await.unwrap();

        let err = authenticate(&db, "admin", "wrong", "1.2.3.4", 3600)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = authenticate(&db, "nobody", "123", "1.2.3.4", 3600)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        assert!(db.list_admin_logs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn change_password_validates_and_rehashes() {
        let db = setup_db().await;
        let hash = hash_password("old-pass").unwrap();
        let user = db.create_user("alice", &hash, false).await.unwrap();

        let err = change_password(&db, user.id, "", "new", "new")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = change_password(&db, user.id, "old-pass", "new", "other")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = change_password(&db, user.id, "wrong", "new", "new")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        change_password(&db, user.id, "old-pass", "new-pass", "new-pass")
            .await
            .unwrap();
        let stored = db.find_user_by_id(user.id).await.unwrap().unwrap();
        assert!(verify_password("new-pass", &stored.password_hash));
        assert!(!verify_password("old-pass", &stored.password_hash));
    }
}
