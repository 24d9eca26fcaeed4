// Integration tests for Screen Algo

use screen_algo::core::{format_slots, interview_slots, Matcher, MatchingConfig};
use screen_algo::models::{CandidateProfile, EduEntry, JobRequirements, ScoringWeights, WorkEntry};
use screen_algo::services::extraction::{basic_profile, basic_requirements, parse_profile, parse_requirements};
use screen_algo::services::InMemoryMatchStore;

fn create_test_profile(name: &str, skills: &[&str], start: &str, degree: &str) -> CandidateProfile {
    CandidateProfile {
        name: name.to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        experience: vec![WorkEntry {
            company: "Globex".to_string(),
            title: "Developer".to_string(),
            start_date: start.to_string(),
            end_date: "present".to_string(),
            description: String::new(),
        }],
        education: vec![EduEntry {
            degree: degree.to_string(),
            institution: "State University".to_string(),
            year: None,
        }],
        ..Default::default()
    }
}

fn create_test_requirements() -> JobRequirements {
    JobRequirements {
        skills: vec!["Python".to_string(), "SQL".to_string(), "Airflow".to_string()],
        experience: "3+ years".to_string(),
        education: "Bachelor's degree".to_string(),
        responsibilities: vec!["Build pipelines".to_string()],
    }
}

#[test]
fn test_integration_end_to_end_matching() {
    let matcher = Matcher::with_default_config().with_reference_year(2024);
    let store = InMemoryMatchStore::new();
    let requirements = create_test_requirements();

    let candidates = vec![
        ("c1".to_string(), create_test_profile("Junior", &["Excel"], "2023-06", "High School Diploma")),
        ("c2".to_string(), create_test_profile("Senior", &["python", "SQL", "Airflow"], "2018-01", "Master of Science")),
        ("c3".to_string(), create_test_profile("Mid", &["Python", "PostgreSQL"], "2022-01", "Bachelor of Arts")),
        ("c4".to_string(), CandidateProfile::default()),
    ];

    let results = tokio_test::block_on(matcher.match_all("job_1", &requirements, candidates, &store))
        .expect("in-memory store never fails");

    // One persisted record per candidate, shortlisted or not
    assert_eq!(store.len(), 4);
    assert_eq!(store.results_for_job("job_1").len(), 4);

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].candidate_id, "c2");
    assert_eq!(results[0].overall_score, 100.0);
    assert!(results[0].shortlisted);

    for pair in results.windows(2) {
        assert!(pair[0].overall_score >= pair[1].overall_score);
    }

    for result in &results {
        assert_eq!(result.job_id, "job_1");
        assert_eq!(result.shortlisted, result.overall_score >= 70.0);
    }
}

#[test]
fn test_integration_empty_candidates() {
    let matcher = Matcher::default();
    let store = InMemoryMatchStore::new();

    let results = tokio_test::block_on(matcher.match_all(
        "job_empty",
        &create_test_requirements(),
        Vec::<(String, CandidateProfile)>::new(),
        &store,
    ))
    .unwrap();

    assert!(results.is_empty());
    assert!(store.is_empty());
}

#[test]
fn test_integration_repeated_runs_append() {
    let matcher = Matcher::default().with_reference_year(2024);
    let store = InMemoryMatchStore::new();
    let requirements = create_test_requirements();
    let candidates = || {
        vec![("c1".to_string(), create_test_profile("Ada", &["Python"], "2020-01", "BSc Bachelor"))]
    };

    let first = tokio_test::block_on(matcher.match_all("job_1", &requirements, candidates(), &store)).unwrap();
    let second = tokio_test::block_on(matcher.match_all("job_1", &requirements, candidates(), &store)).unwrap();

    assert_eq!(first, second);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_integration_custom_weights() {
    let config = MatchingConfig {
        weights: ScoringWeights {
            skills: 1.0,
            experience: 0.0,
            education: 0.0,
        },
        threshold: 50.0,
    };
    let matcher = Matcher::new(config).with_reference_year(2024);
    let requirements = create_test_requirements();

    // Two of three skills exact, nothing else matters
    let profile = create_test_profile("Skills Only", &["Python", "SQL"], "", "");
    let result = matcher.aggregate(&requirements, &profile, "c1");

    assert!((result.overall_score - 200.0 / 3.0).abs() < 1e-9);
    assert!(result.shortlisted);
}

#[test]
fn test_integration_llm_reply_to_score() {
    let job_reply = r#"```json
{
  "skills": ["Rust", "PostgreSQL"],
  "experience": "at least 2 years",
  "education": "Bachelor's degree in Computer Science",
  "responsibilities": ["Own the matching service"]
}
```"#;
    let cv_reply = r#"{
  "name": "Grace Hopper",
  "contact": {"email": "grace@example.com", "phone": null},
  "skills": ["Rust", "PostgreSQL", "Kubernetes"],
  "experience": [
    {"company": "Initech", "title": "Engineer", "start_date": "2021-03", "end_date": "2024-03", "description": null}
  ],
  "education": [
    {"degree": "Master of Engineering", "institution": "Yale", "year": 2020}
  ]
}"#;

    let requirements = parse_requirements(job_reply).unwrap();
    let profile = parse_profile(cv_reply).unwrap();
    assert_eq!(profile.contact.phone, "");

    let result = Matcher::default()
        .with_reference_year(2024)
        .aggregate(&requirements, &profile, "grace");

    assert_eq!(result.skills_score, 100.0);
    assert_eq!(result.experience_score, 100.0);
    assert_eq!(result.education_score, 100.0);
    assert_eq!(result.candidate_name, "Grace Hopper");
    assert!(result.shortlisted);
}

#[test]
fn test_integration_regex_fallback_pipeline() {
    let description = "Backend Engineer

Qualifications:
- Rust
- Kafka

Looking for 2-4 years experience building services.

Responsibilities:
- Operate streaming infrastructure at scale
";
    let resume = "Linus Torvalds
linus@example.org

Skills: Rust, Kafka, Linux

Experience:
Transmeta, 1997-2003
";

    let requirements = basic_requirements(description);
    assert_eq!(requirements.skills, vec!["Rust", "Kafka"]);
    assert_eq!(requirements.experience, "2 years");

    let profile = basic_profile(resume);
    assert_eq!(profile.name, "Linus Torvalds");
    assert_eq!(profile.skills, vec!["Rust", "Kafka", "Linux"]);

    // No dated work history from the fallback parser
    let result = Matcher::default().aggregate(&requirements, &profile, "linus");
    assert_eq!(result.skills_score, 100.0);
    assert_eq!(result.experience_score, 0.0);
    assert_eq!(result.education_score, 50.0);
}

#[test]
fn test_integration_interview_slots_skip_weekends() {
    use chrono::{Datelike, NaiveDate, Weekday};

    // Friday
    let today = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
    let slots = interview_slots(today, 4, 3);

    assert_eq!(slots.len(), 4);
    for slot in &slots {
        assert!(!matches!(slot.weekday(), Weekday::Sat | Weekday::Sun));
        assert!(slot.date() >= today + chrono::Duration::days(3));
    }

    let formatted = format_slots(&slots);
    assert_eq!(formatted[0], "Monday, March 11 at 10:00 AM");
    assert_eq!(formatted[1], "Monday, March 11 at 02:00 PM");
}
