use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use crate::models::{ScholarshipRecord, UserProfile};
use super::store::{CatalogStore, ProfileStore, StoreError};

/// PostgreSQL-backed profile and catalog store
///
/// Reads the tables owned by the main web application. Nothing is written;
/// NULL text columns come back as empty strings.
pub struct PostgresStore {
    pool: PgPool,
    profile_table: String,
    catalog_table: String,
}

impl PostgresStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
        profile_table: String,
        catalog_table: String,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self::with_pool(pool, profile_table, catalog_table))
    }

    pub fn with_pool(pool: PgPool, profile_table: String, catalog_table: String) -> Self {
        Self {
            pool,
            profile_table,
            catalog_table,
        }
    }

    fn profile_query(&self) -> String {
        format!(
            r#"
            SELECT
                user_id::BIGINT AS user_id,
                COALESCE(university_type, '') AS university_type,
                COALESCE(academic_year_type, '') AS academic_year_type,
                COALESCE(major_field, '') AS major_field,
                COALESCE(region, '') AS region,
                COALESCE(district, '') AS district,
                gpa_last_semester::DOUBLE PRECISION AS gpa_last_semester,
                gpa_overall::DOUBLE PRECISION AS gpa_overall,
                income_level::INTEGER AS income_level,
                COALESCE(is_multi_cultural_family, FALSE) AS is_multi_cultural_family,
                COALESCE(is_single_parent_family, FALSE) AS is_single_parent_family,
                COALESCE(is_multiple_children_family, FALSE) AS is_multiple_children_family,
                COALESCE(is_national_merit, FALSE) AS is_national_merit
            FROM {}
            WHERE user_id = $1
        "#,
            self.profile_table
        )
    }

    fn catalog_query(&self) -> String {
        format!(
            r#"
            SELECT
                product_id::TEXT AS product_id,
                COALESCE(name, '') AS name,
                COALESCE(product_type, '') AS product_type,
                COALESCE(university_type, '') AS university_type,
                COALESCE(academic_year_type, '') AS academic_year_type,
                COALESCE(major_field, '') AS major_field,
                COALESCE(region, '') AS region,
                COALESCE(grade_criteria_details, '') AS grade_criteria_details,
                COALESCE(income_criteria_details, '') AS income_criteria_details,
                COALESCE(specific_qualification_details, '') AS specific_qualification_details,
                recruitment_start_date,
                recruitment_end_date
            FROM {}
            ORDER BY product_id
        "#,
            self.catalog_table
        )
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn profile_from_row(row: &PgRow) -> Result<UserProfile, sqlx::Error> {
    Ok(UserProfile {
        user_id: row.try_get("user_id")?,
        university_type: row.try_get("university_type")?,
        academic_year_type: row.try_get("academic_year_type")?,
        major_field: row.try_get("major_field")?,
        region: row.try_get("region")?,
        district: row.try_get("district")?,
        gpa_last_semester: row.try_get("gpa_last_semester")?,
        gpa_overall: row.try_get("gpa_overall")?,
        income_level: row.try_get("income_level")?,
        is_multi_cultural_family: row.try_get("is_multi_cultural_family")?,
        is_single_parent_family: row.try_get("is_single_parent_family")?,
        is_multiple_children_family: row.try_get("is_multiple_children_family")?,
        is_national_merit: row.try_get("is_national_merit")?,
    })
}

fn scholarship_from_row(row: &PgRow) -> Result<ScholarshipRecord, sqlx::Error> {
    Ok(ScholarshipRecord {
        product_id: row.try_get("product_id")?,
        name: row.try_get("name")?,
        product_type: row.try_get("product_type")?,
        university_type: row.try_get("university_type")?,
        academic_year_type: row.try_get("academic_year_type")?,
        major_field: row.try_get("major_field")?,
        region: row.try_get("region")?,
        grade_criteria_details: row.try_get("grade_criteria_details")?,
        income_criteria_details: row.try_get("income_criteria_details")?,
        specific_qualification_details: row.try_get("specific_qualification_details")?,
        recruitment_start_date: row.try_get("recruitment_start_date")?,
        recruitment_end_date: row.try_get("recruitment_end_date")?,
    })
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn get_profile(&self, user_id: i64) -> Result<UserProfile, StoreError> {
        let row = sqlx::query(&self.profile_query())
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Profile not found for user {}", user_id)))?;

        let profile = profile_from_row(&row)
            .map_err(|e| StoreError::InvalidRecord(format!("profile {}: {}", user_id, e)))?;

        tracing::debug!("Loaded profile for user {}", user_id);

        Ok(profile)
    }
}

#[async_trait]
impl CatalogStore for PostgresStore {
    async fn list_scholarships(&self) -> Result<Vec<ScholarshipRecord>, StoreError> {
        let rows = sqlx::query(&self.catalog_query()).fetch_all(&self.pool).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            match scholarship_from_row(row) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable scholarship row: {}", e),
            }
        }

        tracing::debug!("Loaded {} scholarships from {}", records.len(), self.catalog_table);

        Ok(records)
    }
}
