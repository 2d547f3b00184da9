use crate::models::{ScholarshipRecord, ScoredCandidate, UserProfile};
use super::{filters::contains_ignore_case, region::is_nationwide};

pub const SCORE_FULL_REGION: i32 = 10;
pub const SCORE_PROVINCE: i32 = 7;
pub const SCORE_MAJOR: i32 = 5;
pub const SCORE_NATIONWIDE: i32 = 1;

/// Relevance score of a record for a user
///
/// First matching rule wins, scores are not additive:
/// ```text
/// region == "province district"   -> 10
/// region == province              ->  7
/// major field contains user field ->  5 (always true for an empty field)
/// region is nationwide            ->  1
/// otherwise                       ->  0
/// ```
pub fn calculate_relevance_score(
    record: &ScholarshipRecord,
    profile: &UserProfile,
    nationwide_marker: &str,
) -> i32 {
    let combined = profile.combined_region();
    let province = profile.region.trim();
    let major = profile.major_field.trim();

    if !combined.is_empty() && record.region == combined {
        SCORE_FULL_REGION
    } else if !province.is_empty() && record.region == province {
        SCORE_PROVINCE
    } else if contains_ignore_case(&record.major_field, major) {
        SCORE_MAJOR
    } else if is_nationwide(&record.region, nationwide_marker) {
        SCORE_NATIONWIDE
    } else {
        0
    }
}

/// Scored candidates and the bounded sample handed to the generator
#[derive(Debug, Clone)]
pub struct Ranking {
    /// Every candidate, best first
    pub scored: Vec<ScoredCandidate>,
    pub sample_size: usize,
}

impl Ranking {
    /// The first `sample_size` candidates
    pub fn sample(&self) -> &[ScoredCandidate] {
        &self.scored[..self.scored.len().min(self.sample_size)]
    }
}

/// Score, sort and bound the region-filtered catalog
///
/// This is Stage 3 of the recommendation pipeline. Sorted by score descending,
/// then by product id ascending so ties never depend on store order.
pub fn rank_candidates(
    candidates: Vec<ScholarshipRecord>,
    profile: &UserProfile,
    nationwide_marker: &str,
    sample_size: usize,
) -> Ranking {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|record| {
            let score = calculate_relevance_score(&record, profile, nationwide_marker);
            ScoredCandidate { record, score }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.record.product_id.cmp(&b.record.product_id))
    });

    Ranking { scored, sample_size }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIONWIDE: &str = "전국";

    fn record(id: &str, region: &str, major: &str) -> ScholarshipRecord {
        ScholarshipRecord {
            product_id: id.to_string(),
            name: id.to_string(),
            region: region.to_string(),
            major_field: major.to_string(),
            ..Default::default()
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            user_id: 3,
            region: "경기도".to_string(),
            district: "파주시".to_string(),
            major_field: "컴퓨터공학".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_score_rules() {
        let p = profile();
        assert_eq!(calculate_relevance_score(&record("a", "경기도 파주시", ""), &p, NATIONWIDE), 10);
        assert_eq!(calculate_relevance_score(&record("b", "경기도", ""), &p, NATIONWIDE), 7);
        assert_eq!(calculate_relevance_score(&record("c", "파주시", "컴퓨터공학과"), &p, NATIONWIDE), 5);
        assert_eq!(calculate_relevance_score(&record("d", "전국", "제한없음"), &p, NATIONWIDE), 1);
        assert_eq!(calculate_relevance_score(&record("e", "파주시", "간호학"), &p, NATIONWIDE), 0);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Full region match and major match: still 10, not 15
        let p = profile();
        assert_eq!(calculate_relevance_score(&record("a", "경기도 파주시", "컴퓨터공학"), &p, NATIONWIDE), 10);
        // Nationwide with a major match scores as a major match
        assert_eq!(calculate_relevance_score(&record("b", "전국", "컴퓨터공학"), &p, NATIONWIDE), 5);
    }

    #[test]
    fn test_empty_major_matches_every_major_field() {
        let mut p = profile();
        p.major_field = " ".to_string();
        assert_eq!(calculate_relevance_score(&record("a", "서울", "아무거나"), &p, NATIONWIDE), 5);
        assert_eq!(calculate_relevance_score(&record("b", "전국", "제한없음"), &p, NATIONWIDE), 5);
        assert_eq!(calculate_relevance_score(&record("c", "파주시", ""), &p, NATIONWIDE), 5);
        // Region rules still come first
        assert_eq!(calculate_relevance_score(&record("d", "경기도", ""), &p, NATIONWIDE), 7);
    }

    #[test]
    fn test_sorted_with_id_tiebreak() {
        let ranking = rank_candidates(
            vec![
                record("z-nation", "전국", ""),
                record("b-province", "경기도", ""),
                record("a-nation", "전국", ""),
                record("c-full", "경기도 파주시", ""),
            ],
            &profile(),
            NATIONWIDE,
            20,
        );
        let order: Vec<&str> = ranking.scored.iter().map(|c| c.record.product_id.as_str()).collect();
        assert_eq!(order, vec!["c-full", "b-province", "a-nation", "z-nation"]);
        assert!(ranking.scored.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_sample_is_bounded() {
        let candidates: Vec<ScholarshipRecord> =
            (0..30).map(|i| record(&format!("{:02}", i), "전국", "")).collect();
        let ranking = rank_candidates(candidates, &profile(), NATIONWIDE, 20);

        assert_eq!(ranking.scored.len(), 30);
        assert_eq!(ranking.sample().len(), 20);
        assert_eq!(ranking.sample()[0].record.product_id, "00");
    }

    #[test]
    fn test_sample_smaller_than_bound() {
        let ranking = rank_candidates(vec![record("only", "전국", "")], &profile(), NATIONWIDE, 20);
        assert_eq!(ranking.sample().len(), 1);
    }
}
