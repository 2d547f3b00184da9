use chrono::NaiveDate;
use crate::models::{ScholarshipRecord, UserProfile};

/// Narrow the catalog by institution type, academic year and field of study
///
/// This is Stage 1 of the recommendation pipeline. Each sub-filter runs only
/// when the matching profile attribute is non-empty after trimming.
///
/// Institution type and academic year fail open: when the user's value matches
/// no remaining record, that sub-filter is skipped instead of emptying the set.
pub fn filter_eligibility(
    catalog: Vec<ScholarshipRecord>,
    profile: &UserProfile,
    any_major_labels: &[String],
) -> Vec<ScholarshipRecord> {
    let mut records = catalog;

    let university = profile.university_type.trim();
    if !university.is_empty() {
        let wanted = normalize_range(university);
        records = narrow_or_keep(records, |r| normalize_range(&r.university_type).contains(&wanted));
        tracing::debug!("After institution type '{}': {} records", university, records.len());
    }

    let year = profile.academic_year_type.trim();
    if !year.is_empty() {
        let wanted = strip_whitespace(year);
        records = narrow_or_keep(records, |r| strip_whitespace(&r.academic_year_type).contains(&wanted));
        tracing::debug!("After academic year '{}': {} records", year, records.len());
    }

    let major = profile.major_field.trim();
    if !major.is_empty() {
        records.retain(|r| matches_major(&r.major_field, major, any_major_labels));
        tracing::debug!("After field of study '{}': {} records", major, records.len());
    }

    records
}

/// Keep records whose recruitment window contains `today`
///
/// Records without both a start and an end date are dropped.
pub fn filter_by_recruitment_date(
    catalog: Vec<ScholarshipRecord>,
    today: NaiveDate,
) -> Vec<ScholarshipRecord> {
    catalog
        .into_iter()
        .filter(|r| is_recruiting(r, today))
        .collect()
}

#[inline]
pub fn is_recruiting(record: &ScholarshipRecord, today: NaiveDate) -> bool {
    match (record.recruitment_start_date, record.recruitment_end_date) {
        (Some(start), Some(end)) => start <= today && today <= end,
        _ => false,
    }
}

/// Field-of-study rule shared by the filter and the scorer
///
/// Case-insensitive substring match, or an exact "any field accepted" label.
#[inline]
pub fn matches_major(record_major: &str, user_major: &str, any_major_labels: &[String]) -> bool {
    contains_ignore_case(record_major, user_major)
        || any_major_labels.iter().any(|label| label == record_major)
}

#[inline]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Map the dash separator onto the catalog's range separator ("1-2" -> "1~2")
#[inline]
fn normalize_range(value: &str) -> String {
    value.replace('-', "~")
}

#[inline]
fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

fn narrow_or_keep<F>(records: Vec<ScholarshipRecord>, matches: F) -> Vec<ScholarshipRecord>
where
    F: Fn(&ScholarshipRecord) -> bool,
{
    if records.iter().any(&matches) {
        records.into_iter().filter(|r| matches(r)).collect()
    } else {
        records
    }
}
