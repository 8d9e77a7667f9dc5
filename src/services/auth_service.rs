//! Domain service for authentication and user management.
//!
//! Handles signup, login, and API key verification.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;
use crate::domain::UserId;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// The authenticated caller, attached to requests by the auth middleware.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub is_staff: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl UserInfo {
    /// Authors may change their own cards; staff may change any card.
    #[must_use]
    pub fn can_modify(&self, author_id: i32) -> bool {
        self.is_staff || self.id.value() == author_id
    }
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: UserId::new(user.id),
            username: user.username,
            is_staff: user.is_staff,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Login result containing user info and API key.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub username: String,
    pub api_key: String,
    pub is_staff: bool,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a regular (non-staff) account and returns its API key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] if the name is in use, and
    /// [`AuthError::Validation`] for a too short password.
    async fn signup(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Verifies credentials and returns the API key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Resolves an API key to its user.
    async fn authenticate(&self, api_key: &str) -> Result<Option<UserInfo>, AuthError>;

    /// Regenerates the API key for a user and returns the new one.
    async fn regenerate_api_key(&self, username: &str) -> Result<String, AuthError>;
}
