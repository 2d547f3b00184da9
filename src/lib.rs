//! Scholarship recommender - filter-then-rank pipeline for scholarship matching
//!
//! Narrows a scholarship catalog to what a user is eligible for, samples the
//! most relevant entries, and asks a text-generation service to rank them and
//! explain each pick. The generator's answer is validated against the sample
//! and replaced by a deterministic ranking whenever it cannot be trusted.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use core::{Recommender, RecommendationGenerator, RecommendationOutcome, RecommendError, RetryPolicy};
pub use models::{UserProfile, ScholarshipRecord, ScoredCandidate, RankedRecommendation, Recommendation, RecommendationOptions};
