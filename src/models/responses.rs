use serde::{Deserialize, Serialize};

use crate::models::domain::{CandidateProfile, JobRequirements, MatchResult, ShortlistedCandidate};

/// Response for job creation and requirement lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub job_id: String,
    pub requirements: JobRequirements,
}

/// Response for candidate registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResponse {
    pub candidate_id: String,
    pub profile: CandidateProfile,
}

/// Ranked match results for a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResultsResponse {
    pub job_id: String,
    pub results: Vec<MatchResult>,
    pub total_candidates: usize,
    pub shortlisted_count: usize,
}

impl MatchResultsResponse {
    pub fn new(job_id: &str, results: Vec<MatchResult>) -> Self {
        let shortlisted_count = results.iter().filter(|r| r.shortlisted).count();
        Self {
            job_id: job_id.to_string(),
            total_candidates: results.len(),
            shortlisted_count,
            results,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortlistResponse {
    pub job_id: String,
    pub candidates: Vec<ShortlistedCandidate>,
}

/// One drafted invitation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledInterview {
    pub interview_id: i64,
    pub candidate: ShortlistedCandidate,
    pub email: String,
    pub proposed_slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInterviewsResponse {
    pub job_id: String,
    pub interviews: Vec<ScheduledInterview>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
