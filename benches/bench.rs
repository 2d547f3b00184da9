// Criterion benchmarks for the scholarship recommender

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scholarship_recommender::core::{
    filter_by_region, filter_eligibility, parse_items, rank_candidates, validate_items,
};
use scholarship_recommender::models::{RecommendationOptions, ScholarshipRecord, UserProfile};

const REGIONS: [&str; 5] = ["경기도 파주시", "경기도", "전국", "서울특별시", "부산광역시 해운대구"];
const MAJORS: [&str; 4] = ["컴퓨터공학", "전공무관", "간호학", "컴퓨터공학, 전자공학"];

fn create_record(id: usize) -> ScholarshipRecord {
    ScholarshipRecord {
        product_id: format!("P{:05}", id),
        name: format!("장학금 {}", id),
        product_type: "성적우수".to_string(),
        university_type: if id % 3 == 0 { "전문대(2~3년제)" } else { "4년제, 전문대(2~3년제)" }.to_string(),
        academic_year_type: "대학1학년, 대학2학년, 대학3학년, 대학4학년".to_string(),
        major_field: MAJORS[id % MAJORS.len()].to_string(),
        region: REGIONS[id % REGIONS.len()].to_string(),
        grade_criteria_details: "직전학기 3.5 이상".to_string(),
        ..Default::default()
    }
}

fn create_profile() -> UserProfile {
    UserProfile {
        user_id: 1,
        university_type: "4년제".to_string(),
        academic_year_type: "대학3학년".to_string(),
        major_field: "컴퓨터공학".to_string(),
        region: "경기도".to_string(),
        district: "파주시".to_string(),
        gpa_last_semester: Some(3.8),
        ..Default::default()
    }
}

fn bench_eligibility(c: &mut Criterion) {
    let profile = create_profile();
    let options = RecommendationOptions::default();

    let mut group = c.benchmark_group("eligibility");

    for catalog_size in [100, 1000, 10000].iter() {
        let catalog: Vec<ScholarshipRecord> = (0..*catalog_size).map(create_record).collect();

        group.bench_with_input(
            BenchmarkId::new("filter_eligibility", catalog_size),
            catalog_size,
            |b, _| {
                b.iter(|| {
                    filter_eligibility(
                        black_box(catalog.clone()),
                        black_box(&profile),
                        black_box(&options.any_major_labels),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let profile = create_profile();
    let options = RecommendationOptions::default();

    let mut group = c.benchmark_group("pipeline");

    for catalog_size in [100, 1000, 10000].iter() {
        let catalog: Vec<ScholarshipRecord> = (0..*catalog_size).map(create_record).collect();

        group.bench_with_input(
            BenchmarkId::new("filter_and_rank", catalog_size),
            catalog_size,
            |b, _| {
                b.iter(|| {
                    let eligible = filter_eligibility(catalog.clone(), &profile, &options.any_major_labels);
                    let regional = filter_by_region(eligible, &profile, &options.nationwide_marker);
                    let ranking = rank_candidates(
                        regional,
                        &profile,
                        &options.nationwide_marker,
                        options.sample_size,
                    );
                    black_box(ranking)
                });
            },
        );
    }

    group.finish();
}

fn bench_response_validation(c: &mut Criterion) {
    let profile = create_profile();
    let catalog: Vec<ScholarshipRecord> = (0..200).map(create_record).collect();
    let ranking = rank_candidates(catalog, &profile, "전국", 20);

    let items: Vec<String> = ranking
        .sample()
        .iter()
        .rev()
        .map(|c| format!(r#"{{"product_id": "{}", "reason": "지역이 일치합니다. 전공이 맞습니다."}}"#, c.record.product_id))
        .collect();
    let raw = format!("추천 결과입니다.\n[{}]\n", items.join(", "));

    c.bench_function("parse_and_validate_20_items", |b| {
        b.iter(|| {
            let parsed = parse_items(black_box(&raw)).unwrap_or_default();
            black_box(validate_items(parsed, ranking.sample(), "자동 추천"))
        });
    });
}

criterion_group!(
    benches,
    bench_eligibility,
    bench_pipeline,
    bench_response_validation
);

criterion_main!(benches);
