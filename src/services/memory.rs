use std::collections::HashMap;
use std::path::Path;
use async_trait::async_trait;
use crate::models::{ScholarshipRecord, UserProfile};
use super::store::{CatalogStore, ProfileStore, StoreError};

/// Profile and catalog store held entirely in memory
///
/// Used for local runs from JSON fixtures and by the test suites.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    profiles: HashMap<i64, UserProfile>,
    catalog: Vec<ScholarshipRecord>,
}

impl InMemoryStore {
    pub fn new(profiles: Vec<UserProfile>, catalog: Vec<ScholarshipRecord>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.user_id, p)).collect(),
            catalog,
        }
    }

    /// Load from two JSON files: an array of profiles and an array of records
    pub fn from_json_files<P: AsRef<Path>>(profiles: P, catalog: P) -> Result<Self, StoreError> {
        let profiles: Vec<UserProfile> = read_json(profiles.as_ref())?;
        let catalog: Vec<ScholarshipRecord> = read_json(catalog.as_ref())?;

        tracing::info!(
            "Loaded {} profiles and {} scholarships from fixtures",
            profiles.len(),
            catalog.len()
        );

        Ok(Self::new(profiles, catalog))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| StoreError::InvalidRecord(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| StoreError::InvalidRecord(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get_profile(&self, user_id: i64) -> Result<UserProfile, StoreError> {
        self.profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Profile not found for user {}", user_id)))
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn list_scholarships(&self) -> Result<Vec<ScholarshipRecord>, StoreError> {
        Ok(self.catalog.clone())
    }
}
