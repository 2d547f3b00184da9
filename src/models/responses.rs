use serde::{Deserialize, Serialize};
use crate::models::domain::Recommendation;

/// Envelope printed by the command-line entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub recommendations: Vec<Recommendation>,
    /// `generated`, `fallback` or `none`
    pub source: String,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Error envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
