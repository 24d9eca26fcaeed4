use chrono::Datelike;
use std::future::Future;

use crate::core::scoring::calculate_match_result;
use crate::models::{CandidateProfile, JobRequirements, MatchResult, ScoringWeights};

/// Default shortlist threshold (0-100)
pub const DEFAULT_THRESHOLD: f64 = 70.0;

/// Persistence collaborator for match results
///
/// Implementations must be append-only: storing the same pair twice keeps
/// both records. Returns the identifier of the stored record.
pub trait MatchStore {
    type Error: std::error::Error;

    fn store(&self, result: &MatchResult) -> impl Future<Output = Result<i64, Self::Error>> + Send;
}

/// Weights and threshold handed to the matcher at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingConfig {
    pub weights: ScoringWeights,
    pub threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Candidate screening orchestrator
///
/// # Pipeline
/// 1. Score skills, experience and education per candidate
/// 2. Combine into a weighted overall score and shortlist decision
/// 3. Persist each result as it is produced
/// 4. Rank by overall score
///
/// Holds no mutable state, so a shared `&Matcher` can score candidates
/// from several threads at once.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchingConfig,
    reference_year: Option<i32>,
}

impl Matcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self {
            config,
            reference_year: None,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(MatchingConfig::default())
    }

    /// Pin the year used as the end of open-ended work entries
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Same weights, different shortlist threshold
    pub fn with_threshold(&self, threshold: f64) -> Self {
        let mut matcher = self.clone();
        matcher.config.threshold = threshold;
        matcher
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    fn current_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Utc::now().year())
    }

    /// Score one candidate against a job's requirements
    pub fn aggregate(
        &self,
        requirements: &JobRequirements,
        profile: &CandidateProfile,
        candidate_id: &str,
    ) -> MatchResult {
        calculate_match_result(
            requirements,
            profile,
            candidate_id,
            &self.config.weights,
            self.config.threshold,
            self.current_year(),
        )
    }

    /// Match every candidate to a job, persisting each result
    ///
    /// # Arguments
    /// * `job_id` - Job the results are tagged with
    /// * `requirements` - The job's extracted requirements
    /// * `candidates` - `(candidate_id, profile)` pairs in source order
    /// * `store` - Receives one record per candidate, shortlisted or not
    ///
    /// # Returns
    /// Results sorted by overall score, descending. Ties keep the order in
    /// which they were persisted. A store failure aborts the run; records
    /// already stored are left in place.
    pub async fn match_all<I, S>(
        &self,
        job_id: &str,
        requirements: &JobRequirements,
        candidates: I,
        store: &S,
    ) -> Result<Vec<MatchResult>, S::Error>
    where
        I: IntoIterator<Item = (String, CandidateProfile)>,
        S: MatchStore,
    {
        let mut results = Vec::new();

        for (candidate_id, profile) in candidates {
            let result = self
                .aggregate(requirements, &profile, &candidate_id)
                .tagged(job_id);

            let record_id = store.store(&result).await?;

            tracing::debug!(
                "Scored {} for {}: overall={:.1} (skills={:.1}, experience={:.1}, education={:.1}) record={}",
                candidate_id,
                job_id,
                result.overall_score,
                result.skills_score,
                result.experience_score,
                result.education_score,
                record_id
            );

            results.push(result);
        }

        // Stable sort: ties keep persistence order
        results.sort_by(|a, b| {
            b.overall_score
                .partial_cmp(&a.overall_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let shortlisted = results.iter().filter(|r| r.shortlisted).count();
        tracing::info!(
            "Matched {} candidates for job {} ({} shortlisted at threshold {})",
            results.len(),
            job_id,
            shortlisted,
            self.config.threshold
        );

        Ok(results)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EduEntry, WorkEntry};
    use crate::services::memory::{InMemoryMatchStore, MemoryStoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_candidate(name: &str, skills: &[&str], start: &str, degree: &str) -> CandidateProfile {
        CandidateProfile {
            name: name.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: vec![WorkEntry {
                company: "Globex".to_string(),
                title: "Engineer".to_string(),
                start_date: start.to_string(),
                end_date: "present".to_string(),
                description: String::new(),
            }],
            education: vec![EduEntry {
                degree: degree.to_string(),
                institution: "Springfield University".to_string(),
                year: None,
            }],
            ..Default::default()
        }
    }

    fn create_requirements() -> JobRequirements {
        JobRequirements {
            skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            experience: "3+ years".to_string(),
            education: "Bachelor's degree".to_string(),
            responsibilities: vec![],
        }
    }

    /// Fails on the nth store call
    struct FailingStore {
        calls: AtomicUsize,
        fail_at: usize,
    }

    impl MatchStore for FailingStore {
        type Error = MemoryStoreError;

        async fn store(&self, _result: &MatchResult) -> Result<i64, Self::Error> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == self.fail_at {
                Err(MemoryStoreError::Unavailable("disk full".to_string()))
            } else {
                Ok(call as i64 + 1)
            }
        }
    }

    #[tokio::test]
    async fn test_match_all_ranks_descending() {
        let matcher = Matcher::with_default_config().with_reference_year(2024);
        let store = InMemoryMatchStore::new();

        let candidates = vec![
            ("c1".to_string(), create_candidate("Weak", &["COBOL"], "2023", "Associate degree")),
            ("c2".to_string(), create_candidate("Strong", &["rust", "postgresql"], "2018", "Master of Science")),
            ("c3".to_string(), create_candidate("Middling", &["Rust"], "2021", "Bachelor of Science")),
        ];

        let results = matcher
            .match_all("job_1", &create_requirements(), candidates, &store)
            .await
            .unwrap();

        let order: Vec<&str> = results.iter().map(|r| r.candidate_id.as_str()).collect();
        assert_eq!(order, vec!["c2", "c3", "c1"]);
        assert!(results.iter().all(|r| r.job_id == "job_1"));
        assert_eq!(store.len(), 3);
        assert!(results[0].shortlisted);
        assert!(!results[2].shortlisted);
    }

    #[tokio::test]
    async fn test_match_all_ties_keep_persistence_order() {
        let matcher = Matcher::with_default_config().with_reference_year(2024);
        let store = InMemoryMatchStore::new();

        let candidates: Vec<(String, CandidateProfile)> = ["b", "a", "c"]
            .iter()
            .map(|id| (id.to_string(), create_candidate(id, &["Rust"], "2020", "BSc")))
            .collect();

        let results = matcher
            .match_all("job_1", &create_requirements(), candidates, &store)
            .await
            .unwrap();

        let order: Vec<&str> = results.iter().map(|r| r.candidate_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        let stored: Vec<String> = store.results().into_iter().map(|r| r.candidate_id).collect();
        assert_eq!(stored, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_match_all_empty_makes_no_store_calls() {
        let matcher = Matcher::with_default_config();
        let store = InMemoryMatchStore::new();

        let results = matcher
            .match_all("job_1", &create_requirements(), Vec::new(), &store)
            .await
            .unwrap();

        assert!(results.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_match_all_surfaces_store_failure() {
        let matcher = Matcher::with_default_config().with_reference_year(2024);
        let store = FailingStore { calls: AtomicUsize::new(0), fail_at: 1 };

        let candidates = vec![
            ("c1".to_string(), create_candidate("One", &["Rust"], "2020", "BSc")),
            ("c2".to_string(), create_candidate("Two", &["Rust"], "2020", "BSc")),
            ("c3".to_string(), create_candidate("Three", &["Rust"], "2020", "BSc")),
        ];

        let err = matcher
            .match_all("job_1", &create_requirements(), candidates, &store)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("disk full"));
        // Third candidate is never scored
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let matcher = Matcher::with_default_config().with_reference_year(2024);
        let reqs = create_requirements();
        let profile = create_candidate("Repeat", &["Rust programming"], "2022-03", "Bachelor");

        let first = matcher.aggregate(&reqs, &profile, "c1");
        let second = matcher.aggregate(&reqs, &profile, "c1");
        assert_eq!(first, second);
    }

    #[test]
    fn test_with_threshold_keeps_weights() {
        let matcher = Matcher::new(MatchingConfig {
            weights: ScoringWeights { skills: 0.6, experience: 0.2, education: 0.2 },
            threshold: 70.0,
        });
        let lowered = matcher.with_threshold(40.0);

        assert_eq!(lowered.config().threshold, 40.0);
        assert_eq!(lowered.config().weights, matcher.config().weights);
    }
}
