//! Error types for Tenantkit

use thiserror::Error;

/// Errors raised by data store operations.
///
/// These are terminal for the request that triggered them; nothing retries.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Tenant not found")]
    TenantNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Subdomain already exists: {0}")]
    SubdomainTaken(String),

    #[error("Slug already exists: {0}")]
    SlugTaken(String),

    #[error("User already exists in this tenant: {email}")]
    UserAlreadyExists { email: String },

    #[error("Author does not belong to this tenant")]
    AuthorNotInTenant,

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// True for duplicate-key failures
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SubdomainTaken(_) | Self::SlugTaken(_) | Self::UserAlreadyExists { .. }
        )
    }

    /// True when a referenced record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TenantNotFound | Self::UserNotFound)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        Self::Database(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
