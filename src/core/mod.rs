// Core pipeline exports
pub mod filters;
pub mod generator;
pub mod prompt;
pub mod recommender;
pub mod region;
pub mod response;
pub mod retry;
pub mod scoring;

pub use filters::{filter_eligibility, filter_by_recruitment_date, matches_major};
pub use generator::{RecommendationGenerator, fallback_recommendations};
pub use prompt::{build_prompt, SYSTEM_PROMPT};
pub use recommender::{Recommender, RecommendationOutcome, RecommendError, project};
pub use region::{filter_by_region, is_nationwide};
pub use response::{extract_json_span, parse_items, validate_items};
pub use retry::{call_with_retry, resolve_with_fallback, FallbackCause, Resolution, ResolutionSource, RetryPolicy};
pub use scoring::{calculate_relevance_score, rank_candidates, Ranking};
