use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::{CandidateProfile, JobRequirements};

/// Request to register a job posting
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[validate(length(min = 1))]
    pub description: String,
    /// Pre-extracted requirements; extracted from `description` when absent
    #[serde(default)]
    pub requirements: Option<JobRequirements>,
}

/// Request to register a candidate
///
/// Either `resume_text` or `profile` must be present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_candidate_source"))]
pub struct CreateCandidateRequest {
    #[serde(default, alias = "candidateId")]
    #[validate(length(min = 1))]
    pub candidate_id: Option<String>,
    #[serde(default, alias = "resumeText")]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub profile: Option<CandidateProfile>,
}

fn validate_candidate_source(req: &CreateCandidateRequest) -> Result<(), ValidationError> {
    let has_text = req
        .resume_text
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty());

    if has_text || req.profile.is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("resume_text_or_profile_required"))
    }
}

/// Request to match candidates against a job
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MatchCandidatesRequest {
    /// Restrict matching to these candidates; all candidates when absent
    #[serde(default, alias = "candidateIds")]
    pub candidate_ids: Option<Vec<String>>,
    /// Overrides the configured shortlist threshold
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub threshold: Option<f64>,
}

/// Request to send interview invitations to a job's shortlist
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ScheduleInterviewsRequest {
    #[serde(default, alias = "jobTitle")]
    pub job_title: Option<String>,
    #[serde(default, alias = "companyName")]
    pub company_name: Option<String>,
}
