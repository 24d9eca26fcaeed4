// Criterion benchmarks for Screen Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use screen_algo::core::{score_experience, score_skills, Matcher};
use screen_algo::models::{CandidateProfile, EduEntry, JobRequirements, WorkEntry};
use screen_algo::services::InMemoryMatchStore;

const SKILL_POOL: [&str; 8] = ["Python", "SQL", "Rust", "Go", "Kafka", "Docker", "AWS", "React"];

fn create_candidate(id: usize) -> CandidateProfile {
    CandidateProfile {
        name: format!("Candidate {}", id),
        skills: SKILL_POOL
            .iter()
            .cycle()
            .skip(id % SKILL_POOL.len())
            .take(1 + id % 5)
            .map(|s| s.to_string())
            .collect(),
        experience: vec![
            WorkEntry {
                company: "Initech".to_string(),
                title: "Engineer".to_string(),
                start_date: format!("{}-{:02}", 2012 + id % 10, 1 + id % 12),
                end_date: "2022-06".to_string(),
                description: String::new(),
            },
            WorkEntry {
                company: "Globex".to_string(),
                title: "Senior Engineer".to_string(),
                start_date: "2022-07".to_string(),
                end_date: "present".to_string(),
                description: String::new(),
            },
        ],
        education: vec![EduEntry {
            degree: if id % 3 == 0 { "Master of Science" } else { "Bachelor of Arts" }.to_string(),
            institution: "State University".to_string(),
            year: Some(2010),
        }],
        ..Default::default()
    }
}

fn create_requirements() -> JobRequirements {
    JobRequirements {
        skills: vec!["Python".to_string(), "SQL".to_string(), "Kafka".to_string(), "Docker".to_string()],
        experience: "5+ years of professional experience".to_string(),
        education: "Bachelor's degree in Computer Science".to_string(),
        responsibilities: vec![],
    }
}

fn bench_score_skills(c: &mut Criterion) {
    let requirements = create_requirements();
    let candidate = create_candidate(7);

    c.bench_function("score_skills", |b| {
        b.iter(|| score_skills(black_box(&requirements.skills), black_box(&candidate.skills)));
    });
}

fn bench_score_experience(c: &mut Criterion) {
    let candidate = create_candidate(3);

    c.bench_function("score_experience", |b| {
        b.iter(|| {
            score_experience(
                black_box("at least 5 years"),
                black_box(&candidate.experience),
                black_box(2024),
            )
        });
    });
}

fn bench_match_all(c: &mut Criterion) {
    let matcher = Matcher::with_default_config().with_reference_year(2024);
    let requirements = create_requirements();

    let mut group = c.benchmark_group("matching");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<(String, CandidateProfile)> = (0..*candidate_count)
            .map(|i| (format!("cand_{}", i), create_candidate(i)))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("match_all", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    let store = InMemoryMatchStore::new();
                    tokio_test::block_on(matcher.match_all(
                        black_box("job_bench"),
                        black_box(&requirements),
                        black_box(candidates.clone()),
                        &store,
                    ))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_score_skills, bench_score_experience, bench_match_all);

criterion_main!(benches);
