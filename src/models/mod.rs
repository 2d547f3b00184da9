// Model exports
pub mod domain;
pub mod responses;

pub use domain::{UserProfile, ScholarshipRecord, ScoredCandidate, RankedRecommendation, Recommendation, RecommendationOptions};
pub use responses::{RecommendResponse, ErrorResponse};
