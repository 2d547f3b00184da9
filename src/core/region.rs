use std::collections::HashSet;
use crate::models::{ScholarshipRecord, UserProfile};
use super::filters::contains_ignore_case;

/// Whether a record's region applies to the whole country
#[inline]
pub fn is_nationwide(record_region: &str, nationwide_marker: &str) -> bool {
    contains_ignore_case(record_region, nationwide_marker)
}

/// Narrow the catalog to the user's province/district plus nationwide entries
///
/// This is Stage 2 of the recommendation pipeline. A record is kept when its
/// region equals the combined "province district" string, the province alone,
/// the district alone, or carries the nationwide marker. Without any region on
/// the profile only nationwide records survive. Output is deduplicated by
/// product id, first occurrence wins.
pub fn filter_by_region(
    catalog: Vec<ScholarshipRecord>,
    profile: &UserProfile,
    nationwide_marker: &str,
) -> Vec<ScholarshipRecord> {
    let parts = profile.region_parts();
    let combined = parts.join(" ");

    let mut accepted: HashSet<&str> = parts.iter().copied().collect();
    if !combined.is_empty() {
        accepted.insert(combined.as_str());
    }

    tracing::debug!("Combined user region: '{}'", combined);

    let mut seen = HashSet::new();
    catalog
        .into_iter()
        .filter(|r| accepted.contains(r.region.as_str()) || is_nationwide(&r.region, nationwide_marker))
        .filter(|r| seen.insert(r.product_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIONWIDE: &str = "전국";

    fn record(id: &str, region: &str) -> ScholarshipRecord {
        ScholarshipRecord {
            product_id: id.to_string(),
            name: id.to_string(),
            region: region.to_string(),
            ..Default::default()
        }
    }

    fn profile(region: &str, district: &str) -> UserProfile {
        UserProfile {
            user_id: 7,
            region: region.to_string(),
            district: district.to_string(),
            ..Default::default()
        }
    }

    fn catalog() -> Vec<ScholarshipRecord> {
        vec![
            record("full", "경기도 파주시"),
            record("province", "경기도"),
            record("district", "파주시"),
            record("nation", "전국"),
            record("nation-note", "전국 (일부 지역 제외)"),
            record("other", "서울특별시"),
            record("other-district", "경기도 고양시"),
        ]
    }

    fn ids(records: &[ScholarshipRecord]) -> Vec<&str> {
        records.iter().map(|r| r.product_id.as_str()).collect()
    }

    #[test]
    fn test_full_region_match() {
        let result = filter_by_region(catalog(), &profile("경기도", "파주시"), NATIONWIDE);
        assert_eq!(ids(&result), vec!["full", "province", "district", "nation", "nation-note"]);
    }

    #[test]
    fn test_empty_region_keeps_only_nationwide() {
        let result = filter_by_region(catalog(), &profile(" ", ""), NATIONWIDE);
        assert_eq!(ids(&result), vec!["nation", "nation-note"]);
        assert!(result.iter().all(|r| is_nationwide(&r.region, NATIONWIDE)));
    }

    #[test]
    fn test_province_only_profile() {
        let result = filter_by_region(catalog(), &profile("경기도", ""), NATIONWIDE);
        assert_eq!(ids(&result), vec!["province", "nation", "nation-note"]);
    }

    #[test]
    fn test_output_is_deduplicated() {
        let mut records = catalog();
        records.push(record("full", "경기도 파주시"));
        let result = filter_by_region(records, &profile("경기도", "파주시"), NATIONWIDE);
        assert_eq!(result.iter().filter(|r| r.product_id == "full").count(), 1);
    }
}
