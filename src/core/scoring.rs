use crate::core::{
    education::score_education, experience::score_experience, skills::score_skills,
};
use crate::models::{CandidateProfile, JobRequirements, MatchResult, ScoringWeights};

/// Calculate the full score breakdown (0-100) for one candidate against a job
///
/// Scoring formula:
/// overall = (
///     skills_score * 0.5 +         # Required skills present
///     experience_score * 0.3 +     # Years of work history vs requirement
///     education_score * 0.2        # Degree level vs requirement
/// )
///
/// The returned result carries no job id yet; the batch matcher tags it.
pub fn calculate_match_result(
    requirements: &JobRequirements,
    profile: &CandidateProfile,
    candidate_id: &str,
    weights: &ScoringWeights,
    threshold: f64,
    current_year: i32,
) -> MatchResult {
    let skills_score = score_skills(&requirements.skills, &profile.skills);
    let experience_score =
        score_experience(&requirements.experience, &profile.experience, current_year);
    let education_score = score_education(&requirements.education, &profile.education);

    let overall_score = (skills_score * weights.skills
        + experience_score * weights.experience
        + education_score * weights.education)
        .clamp(0.0, 100.0);

    MatchResult {
        job_id: String::new(),
        candidate_id: candidate_id.to_string(),
        candidate_name: profile.name.clone(),
        skills_score,
        experience_score,
        education_score,
        overall_score,
        shortlisted: overall_score >= threshold,
    }
}
