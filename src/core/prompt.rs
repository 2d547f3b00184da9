use serde::Serialize;
use crate::models::{ScoredCandidate, UserProfile};
use super::response::{ID_FIELD, REASON_FIELD};

/// System message sent with every ranking request
pub const SYSTEM_PROMPT: &str = "You write scholarship recommendation reasons. \
Always write concrete, paragraph-style reasons of at least two sentences, \
grounded only in the data you are given.";

/// A special-qualification bonus: profile flag plus keywords in one detail field
#[derive(Debug, Clone, Copy)]
pub struct QualificationBonus {
    pub flag: &'static str,
    pub field: &'static str,
    pub keywords: &'static [&'static str],
}

pub const QUALIFICATION_BONUSES: &[QualificationBonus] = &[
    QualificationBonus {
        flag: "is_multi_cultural_family",
        field: "specific_qualification_details",
        keywords: &["다문화"],
    },
    QualificationBonus {
        flag: "is_single_parent_family",
        field: "income_criteria_details",
        keywords: &["한부모", "가정형편", "경제사정"],
    },
    QualificationBonus {
        flag: "is_multiple_children_family",
        field: "income_criteria_details",
        keywords: &["다자녀"],
    },
    QualificationBonus {
        flag: "is_national_merit",
        field: "income_criteria_details",
        keywords: &["국가유공자", "보훈"],
    },
];

/// Profile fields the generator may justify a recommendation with
#[derive(Debug, Serialize)]
struct PromptProfile<'a> {
    user_id: i64,
    university_type: &'a str,
    academic_year_type: &'a str,
    major_field: &'a str,
    region: String,
    gpa_last_semester: Option<f64>,
    gpa_overall: Option<f64>,
    income_level: Option<i32>,
    is_multi_cultural_family: bool,
    is_single_parent_family: bool,
    is_multiple_children_family: bool,
    is_national_merit: bool,
}

impl<'a> From<&'a UserProfile> for PromptProfile<'a> {
    fn from(p: &'a UserProfile) -> Self {
        Self {
            user_id: p.user_id,
            university_type: p.university_type.trim(),
            academic_year_type: p.academic_year_type.trim(),
            major_field: p.major_field.trim(),
            region: p.combined_region(),
            gpa_last_semester: p.gpa_last_semester,
            gpa_overall: p.gpa_overall,
            income_level: p.income_level,
            is_multi_cultural_family: p.is_multi_cultural_family,
            is_single_parent_family: p.is_single_parent_family,
            is_multiple_children_family: p.is_multiple_children_family,
            is_national_merit: p.is_national_merit,
        }
    }
}

#[derive(Debug, Serialize)]
struct PromptCandidate<'a> {
    product_id: &'a str,
    name: &'a str,
    product_type: &'a str,
    university_type: &'a str,
    academic_year_type: &'a str,
    major_field: &'a str,
    region: &'a str,
    grade_criteria_details: &'a str,
    income_criteria_details: &'a str,
    specific_qualification_details: &'a str,
}

impl<'a> From<&'a ScoredCandidate> for PromptCandidate<'a> {
    fn from(c: &'a ScoredCandidate) -> Self {
        let r = &c.record;
        Self {
            product_id: &r.product_id,
            name: &r.name,
            product_type: &r.product_type,
            university_type: &r.university_type,
            academic_year_type: &r.academic_year_type,
            major_field: &r.major_field,
            region: &r.region,
            grade_criteria_details: &r.grade_criteria_details,
            income_criteria_details: &r.income_criteria_details,
            specific_qualification_details: &r.specific_qualification_details,
        }
    }
}

/// Build the ranking prompt for a user and the sampled candidates
pub fn build_prompt(
    profile: &UserProfile,
    sample: &[ScoredCandidate],
    nationwide_marker: &str,
    response_language: &str,
) -> Result<String, serde_json::Error> {
    let profile_json = serde_json::to_string_pretty(&PromptProfile::from(profile))?;
    let candidates: Vec<PromptCandidate> = sample.iter().map(PromptCandidate::from).collect();
    let candidates_json = serde_json::to_string_pretty(&candidates)?;
    let region = profile.combined_region();

    let bonus_rules: String = QUALIFICATION_BONUSES
        .iter()
        .map(|b| {
            let keywords = b
                .keywords
                .iter()
                .map(|k| format!("'{}'", k))
                .collect::<Vec<_>>()
                .join(" or ");
            format!(
                "   - If the user's '{}' is true and the scholarship's '{}' contains {}, give a strong bonus and say so in the reason.\n",
                b.flag, b.field, keywords
            )
        })
        .collect();

    Ok(format!(
        r#"You compare a user's profile with scholarship eligibility conditions and write a personalised recommendation for each scholarship.

[USER PROFILE]
{profile_json}

[CANDIDATE SCHOLARSHIPS]
{candidates_json}

[TASK]
Rank all {count} scholarships above from best to worst fit for this user and return them as a JSON array.

[RULES]
1. Base every reason only on the rules below. Never guess or invent conditions that are not in the data.
   Rule 1 (region): the more specifically the scholarship's 'region' matches the user's region ('{region}'), the better. '{nationwide_marker}' (nationwide) ranks after specific matches.
   Rule 2 (grades): compare 'gpa_last_semester' and 'gpa_overall' with 'grade_criteria_details' and credit the scholarship when the threshold is met.
   Rule 3 (income): compare 'income_level' with 'income_criteria_details' and credit the scholarship when the user qualifies.
   Rule 4 (special qualifications):
{bonus_rules}   Rule 5 (other): also consider whether the user's major, academic year and institution type align with the scholarship.
2. Each 'reason' must explain which conditions (region, grades, income, major, academic year, special qualifications) the user meets and how, in at least two natural sentences written in {response_language}.

[OUTPUT FORMAT]
- A JSON array only. Each element is an object with exactly two keys: "{id_field}" and "{reason_field}".
- Copy every "{id_field}" exactly as given. Never change, shorten or invent one.

[EXAMPLE]
[
  {{"{id_field}": "SCHOLARSHIP_B", "{reason_field}": "You live in the region this scholarship targets and your last-semester GPA of 4.1 meets its 3.5 requirement. It also gives preference to multiple-children families, which applies to you."}},
  {{"{id_field}": "SCHOLARSHIP_A", "{reason_field}": "Your income level falls within the required range. It is open nationwide and to any major, so you can apply without restriction."}}
]
"#,
        count = sample.len(),
        id_field = ID_FIELD,
        reason_field = REASON_FIELD,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScholarshipRecord;

    fn candidate(id: &str) -> ScoredCandidate {
        ScoredCandidate {
            record: ScholarshipRecord {
                product_id: id.to_string(),
                name: format!("Scholarship {}", id),
                grade_criteria_details: "직전학기 3.5 이상".to_string(),
                ..Default::default()
            },
            score: 1,
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            user_id: 11,
            region: "경기도".to_string(),
            district: "파주시".to_string(),
            major_field: "컴퓨터공학".to_string(),
            gpa_last_semester: Some(4.1),
            is_multiple_children_family: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_prompt_contains_profile_and_candidates() {
        let prompt = build_prompt(&profile(), &[candidate("A1"), candidate("B2")], "전국", "Korean").unwrap();

        assert!(prompt.contains("\"product_id\": \"A1\""));
        assert!(prompt.contains("\"product_id\": \"B2\""));
        assert!(prompt.contains("직전학기 3.5 이상"));
        assert!(prompt.contains("\"region\": \"경기도 파주시\""));
        assert!(prompt.contains("Rank all 2 scholarships"));
        assert!(prompt.contains("written in Korean"));
    }

    #[test]
    fn test_prompt_omits_district_field() {
        let prompt = build_prompt(&profile(), &[candidate("A1")], "전국", "Korean").unwrap();
        assert!(!prompt.contains("\"district\""));
    }

    #[test]
    fn test_prompt_lists_every_bonus_rule() {
        let prompt = build_prompt(&profile(), &[candidate("A1")], "전국", "Korean").unwrap();
        for bonus in QUALIFICATION_BONUSES {
            assert!(prompt.contains(bonus.flag));
            for keyword in bonus.keywords {
                assert!(prompt.contains(keyword));
            }
        }
    }
}
