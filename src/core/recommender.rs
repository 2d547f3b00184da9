use std::sync::Arc;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};
use crate::models::{RankedRecommendation, Recommendation, ScholarshipRecord};
use crate::services::{CatalogStore, ProfileStore, StoreError};
use super::{
    filters::{filter_by_recruitment_date, filter_eligibility},
    generator::RecommendationGenerator,
    region::filter_by_region,
    retry::ResolutionSource,
    scoring::rank_candidates,
};

/// Failures the pipeline cannot absorb
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct RecommendationOutcome {
    pub user_id: i64,
    pub recommendations: Vec<RankedRecommendation>,
    pub source: ResolutionSource,
    pub total_candidates: usize,
    pub eligible_candidates: usize,
    pub regional_candidates: usize,
    pub sampled_candidates: usize,
}

impl RecommendationOutcome {
    fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            recommendations: vec![],
            source: ResolutionSource::Skipped,
            total_candidates: 0,
            eligible_candidates: 0,
            regional_candidates: 0,
            sampled_candidates: 0,
        }
    }

    /// Public (identifier, reason) pairs, order preserved
    pub fn into_recommendations(self) -> Vec<Recommendation> {
        project(self.recommendations)
    }
}

/// Result projector: drop the internal record from each item
pub fn project(items: Vec<RankedRecommendation>) -> Vec<Recommendation> {
    items.into_iter().map(Recommendation::from).collect()
}

/// Main recommendation orchestrator - implements the filter-then-rank pipeline
///
/// # Pipeline Stages
/// 0. Recruitment-date filter (when enabled)
/// 1. Eligibility filter
/// 2. Region filter
/// 3. Relevance scoring and sampling
/// 4. Generator ranking with validation and fallback
/// 5. Projection to public results
#[derive(Clone)]
pub struct Recommender {
    profiles: Arc<dyn ProfileStore>,
    catalog: Arc<dyn CatalogStore>,
    generator: RecommendationGenerator,
}

impl Recommender {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        catalog: Arc<dyn CatalogStore>,
        generator: RecommendationGenerator,
    ) -> Self {
        Self {
            profiles,
            catalog,
            generator,
        }
    }

    /// Recommend scholarships for a user
    ///
    /// Returns an empty list when the user has no profile or nothing survives
    /// filtering. Only store failures other than "not found" are errors.
    pub async fn recommend(&self, user_id: i64) -> Result<Vec<Recommendation>, RecommendError> {
        Ok(self.run(user_id).await?.into_recommendations())
    }

    /// Run the full pipeline against today's date
    pub async fn run(&self, user_id: i64) -> Result<RecommendationOutcome, RecommendError> {
        self.run_on(user_id, chrono::Local::now().date_naive()).await
    }

    /// Run the full pipeline, using `today` for the recruitment-date filter
    pub async fn run_on(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<RecommendationOutcome, RecommendError> {
        info!("Starting recommendation for user {}", user_id);

        let profile = match self.profiles.get_profile(user_id).await {
            Ok(profile) => profile,
            Err(StoreError::NotFound(msg)) => {
                warn!("{}", msg);
                return Ok(RecommendationOutcome::empty(user_id));
            }
            Err(e) => {
                tracing::error!("Failed to load profile for {}: {}", user_id, e);
                return Err(e.into());
            }
        };

        let catalog = self.catalog.list_scholarships().await.map_err(|e| {
            tracing::error!("Failed to load scholarship catalog: {}", e);
            e
        })?;
        let total_candidates = catalog.len();

        let options = self.generator.options();
        let catalog: Vec<ScholarshipRecord> = if options.filter_by_recruitment_date {
            let open = filter_by_recruitment_date(catalog, today);
            info!("Stage 0 (recruitment date {}): {} of {} open", today, open.len(), total_candidates);
            open
        } else {
            catalog
        };

        let eligible = filter_eligibility(catalog, &profile, &options.any_major_labels);
        let eligible_candidates = eligible.len();
        info!("Stage 1 (eligibility): {} candidates", eligible_candidates);

        let regional = filter_by_region(eligible, &profile, &options.nationwide_marker);
        let regional_candidates = regional.len();
        info!("Stage 2 (region '{}'): {} candidates", profile.combined_region(), regional_candidates);

        if regional.is_empty() {
            info!("No candidates left for user {}, skipping generation", user_id);
            return Ok(RecommendationOutcome {
                total_candidates,
                eligible_candidates,
                ..RecommendationOutcome::empty(user_id)
            });
        }

        let ranking = rank_candidates(regional, &profile, &options.nationwide_marker, options.sample_size);
        let sampled_candidates = ranking.sample().len();
        info!("Stage 3 (scoring): sampled {} of {}", sampled_candidates, ranking.scored.len());

        let resolution = self.generator.generate(&profile, &ranking).await;

        info!(
            "Returning {} recommendations for user {} ({})",
            resolution.items.len(),
            user_id,
            resolution.source.as_str()
        );

        Ok(RecommendationOutcome {
            user_id,
            recommendations: resolution.items,
            source: resolution.source,
            total_candidates,
            eligible_candidates,
            regional_candidates,
            sampled_candidates,
        })
    }
}
