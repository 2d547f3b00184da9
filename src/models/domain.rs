use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Scholarship-relevant profile of a single user
///
/// Owned by the profile store; read once per recommendation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "universityType", default)]
    pub university_type: String,
    #[serde(rename = "academicYearType", default)]
    pub academic_year_type: String,
    #[serde(rename = "majorField", default)]
    pub major_field: String,
    /// Province-level region
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub district: String,
    #[serde(rename = "gpaLastSemester", default)]
    pub gpa_last_semester: Option<f64>,
    #[serde(rename = "gpaOverall", default)]
    pub gpa_overall: Option<f64>,
    #[serde(rename = "incomeLevel", default)]
    pub income_level: Option<i32>,
    #[serde(rename = "isMultiCulturalFamily", default)]
    pub is_multi_cultural_family: bool,
    #[serde(rename = "isSingleParentFamily", default)]
    pub is_single_parent_family: bool,
    #[serde(rename = "isMultipleChildrenFamily", default)]
    pub is_multiple_children_family: bool,
    #[serde(rename = "isNationalMerit", default)]
    pub is_national_merit: bool,
}

impl UserProfile {
    /// Province and district joined by a single space, empty parts omitted
    pub fn combined_region(&self) -> String {
        self.region_parts().join(" ")
    }

    /// Trimmed, non-empty province and district, in that order
    pub fn region_parts(&self) -> Vec<&str> {
        [self.region.trim(), self.district.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect()
    }
}

/// A catalog entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipRecord {
    /// Stable identifier; the join key between filtering and response validation
    #[serde(rename = "productId")]
    pub product_id: String,
    pub name: String,
    #[serde(rename = "productType", default)]
    pub product_type: String,
    #[serde(rename = "universityType", default)]
    pub university_type: String,
    #[serde(rename = "academicYearType", default)]
    pub academic_year_type: String,
    #[serde(rename = "majorField", default)]
    pub major_field: String,
    /// Exact province/district string, or text containing the nationwide marker
    #[serde(default)]
    pub region: String,
    #[serde(rename = "gradeCriteriaDetails", default)]
    pub grade_criteria_details: String,
    #[serde(rename = "incomeCriteriaDetails", default)]
    pub income_criteria_details: String,
    #[serde(rename = "specificQualificationDetails", default)]
    pub specific_qualification_details: String,
    #[serde(rename = "recruitmentStartDate", default)]
    pub recruitment_start_date: Option<NaiveDate>,
    #[serde(rename = "recruitmentEndDate", default)]
    pub recruitment_end_date: Option<NaiveDate>,
}

/// Catalog entry annotated with its relevance score for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub record: ScholarshipRecord,
    pub score: i32,
}

/// Generator output: a reason bound to the candidate it was offered for
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecommendation {
    pub product_id: String,
    pub reason: String,
    pub scholarship: ScholarshipRecord,
}

/// Public result shape: identifier and reason only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub reason: String,
}

impl From<RankedRecommendation> for Recommendation {
    fn from(ranked: RankedRecommendation) -> Self {
        Self {
            product_id: ranked.product_id,
            reason: ranked.reason,
        }
    }
}

/// Generator tuning that comes from configuration
#[derive(Debug, Clone)]
pub struct RecommendationOptions {
    pub sample_size: usize,
    pub nationwide_marker: String,
    pub any_major_labels: Vec<String>,
    pub filter_by_recruitment_date: bool,
    pub response_language: String,
    pub fallback_reason_unavailable: String,
    pub fallback_reason_unvalidated: String,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            sample_size: 20,
            nationwide_marker: "전국".to_string(),
            any_major_labels: ["해당없음", "제한없음", "전공무관", "특정학과"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            filter_by_recruitment_date: false,
            response_language: "Korean".to_string(),
            fallback_reason_unavailable: "추천 사유 생성에 실패하여 기본 조건 일치도 순으로 추천된 장학금입니다.".to_string(),
            fallback_reason_unvalidated: "조건 일치도를 기반으로 자동 추천된 장학금입니다.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_region_joins_trimmed_parts() {
        let profile = UserProfile {
            region: " 경기도 ".to_string(),
            district: "파주시".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.combined_region(), "경기도 파주시");
    }

    #[test]
    fn test_combined_region_omits_empty_parts() {
        let profile = UserProfile {
            region: "".to_string(),
            district: "  파주시".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.combined_region(), "파주시");
        assert_eq!(profile.region_parts(), vec!["파주시"]);

        assert_eq!(UserProfile::default().combined_region(), "");
    }

    #[test]
    fn test_projection_drops_record() {
        let ranked = RankedRecommendation {
            product_id: "A1".to_string(),
            reason: "fits".to_string(),
            scholarship: ScholarshipRecord {
                product_id: "A1".to_string(),
                ..Default::default()
            },
        };
        let public: Recommendation = ranked.into();
        assert_eq!(public.product_id, "A1");
        assert_eq!(public.reason, "fits");
    }
}
