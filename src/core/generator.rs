use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::models::{RankedRecommendation, RecommendationOptions, UserProfile};
use crate::services::TextGenerator;
use super::{
    prompt::build_prompt,
    response::{parse_items, validate_items},
    retry::{resolve_with_fallback, FallbackCause, Resolution, ResolutionSource, RetryPolicy},
    scoring::Ranking,
};

/// Ranks sampled candidates through the text generator
///
/// Stage 4 of the recommendation pipeline. The generator's answer is only
/// trusted for identifiers that were in the sample; anything else, and every
/// failure of the remote call, ends in the score-ordered fallback.
#[derive(Clone)]
pub struct RecommendationGenerator {
    llm: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
    options: RecommendationOptions,
}

impl RecommendationGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>, retry: RetryPolicy, options: RecommendationOptions) -> Self {
        Self { llm, retry, options }
    }

    pub fn options(&self) -> &RecommendationOptions {
        &self.options
    }

    /// Rank and explain the sample of `ranking` for `profile`
    ///
    /// Never fails. An empty sample skips the remote call entirely.
    pub async fn generate(
        &self,
        profile: &UserProfile,
        ranking: &Ranking,
    ) -> Resolution<RankedRecommendation> {
        let sample = ranking.sample();
        if sample.is_empty() {
            return Resolution {
                items: vec![],
                source: ResolutionSource::Skipped,
            };
        }

        let prompt = match build_prompt(
            profile,
            sample,
            &self.options.nationwide_marker,
            &self.options.response_language,
        ) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Failed to build prompt for user {}: {}", profile.user_id, e);
                return Resolution {
                    items: self.fallback(ranking, FallbackCause::Unusable),
                    source: ResolutionSource::Fallback(FallbackCause::Unusable),
                };
            }
        };

        info!(
            "Requesting ranking for user {} over {} candidates",
            profile.user_id,
            sample.len()
        );

        let llm = &self.llm;
        let prompt = prompt.as_str();
        let mut resolution = resolve_with_fallback(
            &self.retry,
            move |attempt| {
                debug!("Generator attempt {}", attempt);
                llm.generate(prompt)
            },
            parse_items,
            |items| validate_items(items, sample, &self.options.fallback_reason_unvalidated),
            |cause| self.fallback(ranking, cause),
        )
        .await;

        resolution.items.truncate(self.options.sample_size);

        info!(
            "Ranking for user {} resolved as {:?} with {} items",
            profile.user_id,
            resolution.source,
            resolution.items.len()
        );

        resolution
    }

    fn fallback(&self, ranking: &Ranking, cause: FallbackCause) -> Vec<RankedRecommendation> {
        let reason = match cause {
            FallbackCause::Unusable => &self.options.fallback_reason_unavailable,
            FallbackCause::NothingValidated => &self.options.fallback_reason_unvalidated,
        };
        fallback_recommendations(ranking, reason)
    }
}

/// Score-ordered recommendations with a generic reason
///
/// Bounded by the ranking's sample size, so this is exactly the sample.
pub fn fallback_recommendations(ranking: &Ranking, reason: &str) -> Vec<RankedRecommendation> {
    ranking
        .sample()
        .iter()
        .map(|c| RankedRecommendation {
            product_id: c.record.product_id.clone(),
            reason: reason.to_string(),
            scholarship: c.record.clone(),
        })
        .collect()
}
