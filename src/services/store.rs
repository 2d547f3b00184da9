use async_trait::async_trait;
use thiserror::Error;
use crate::models::{ScholarshipRecord, UserProfile};

/// Errors that can occur when reading profiles or the catalog
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Read-by-identifier access to scholarship profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fails with `StoreError::NotFound` when the user has no profile
    async fn get_profile(&self, user_id: i64) -> Result<UserProfile, StoreError>;
}

/// Read access to the scholarship catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every catalog record, in a stable order
    async fn list_scholarships(&self) -> Result<Vec<ScholarshipRecord>, StoreError>;
}
