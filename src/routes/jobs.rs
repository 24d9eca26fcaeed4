use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::core::scheduler::INVITATION_SENT;
use crate::core::{format_slots, interview_slots};
use crate::models::{
    CreateJobRequest, JobRequirements, JobResponse, MatchCandidatesRequest, MatchResultsResponse,
    ScheduleInterviewsRequest, ScheduleInterviewsResponse, ScheduledInterview, ShortlistResponse,
};
use crate::routes::{error_response, AppState};
use crate::services::{CacheKey, PostgresError};

/// Configure all job-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/jobs", web::post().to(create_job))
        .route("/jobs/{job_id}/requirements", web::get().to(get_requirements))
        .route("/jobs/{job_id}/match", web::post().to(match_candidates))
        .route("/jobs/{job_id}/matches", web::get().to(get_matches))
        .route("/jobs/{job_id}/shortlist", web::get().to(get_shortlist))
        .route("/jobs/{job_id}/interviews", web::post().to(schedule_interviews));
}

fn new_job_id() -> String {
    format!("job_{}", uuid::Uuid::new_v4().simple())
}

fn lookup_error(context: &str, job_id: &str, err: PostgresError) -> HttpResponse {
    match err {
        PostgresError::NotFound(what) => {
            error_response(StatusCode::NOT_FOUND, &format!("{} not found", context), what)
        }
        e => {
            tracing::error!("Failed to load {} for {}: {}", context, job_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to load {}", context),
                e,
            )
        }
    }
}

/// Optional JSON body: empty means defaults, anything else must parse
fn parse_optional_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, HttpResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::info!("Rejected request body: {}", e);
        error_response(StatusCode::BAD_REQUEST, "invalid_json", format!("Invalid JSON: {}", e))
    })
}

/// Requirements for a job, read through the cache when one is configured
async fn load_requirements(state: &AppState, job_id: &str) -> Result<JobRequirements, HttpResponse> {
    if let Some(cache) = &state.cache {
        match cache.get_requirements(job_id).await {
            Ok(requirements) => {
                tracing::debug!("Requirements cache hit for {}", job_id);
                return Ok(requirements);
            }
            Err(e) => tracing::trace!("Requirements cache lookup for {}: {}", job_id, e),
        }
    }

    let requirements = state
        .postgres
        .get_job_requirements(job_id)
        .await
        .map_err(|e| lookup_error("Job requirements", job_id, e))?;

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.set(&CacheKey::requirements(job_id), &requirements).await {
            tracing::warn!("Failed to cache requirements for {}: {}", job_id, e);
        }
    }

    Ok(requirements)
}

/// Register a job posting
///
/// POST /api/v1/jobs
///
/// Request body:
/// ```json
/// {
///   "title": "string",
///   "company": "string",
///   "description": "string",
///   "requirements": { "skills": [], "experience": "", "education": "", "responsibilities": [] }
/// }
/// ```
///
/// Requirements are extracted from the description when not supplied.
async fn create_job(state: web::Data<AppState>, req: web::Json<CreateJobRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let req = req.into_inner();
    let job_id = new_job_id();
    let company = req.company.unwrap_or_default();

    let requirements = match req.requirements {
        Some(requirements) => requirements,
        None => state.jd_analyzer.extract_requirements(&req.description).await,
    };

    if let Err(e) = state
        .postgres
        .store_job(&job_id, &req.title, &company, &req.description)
        .await
    {
        tracing::error!("Failed to store job {}: {}", job_id, e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store job", e);
    }

    if let Err(e) = state.postgres.store_job_requirements(&job_id, &requirements).await {
        tracing::error!("Failed to store requirements for {}: {}", job_id, e);
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to store job requirements",
            e,
        );
    }

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.set_requirements(&job_id, &requirements).await {
            tracing::warn!("Failed to cache requirements for {}: {}", job_id, e);
        }
    }

    tracing::info!(
        "Created job {} ({}) with {} required skills",
        job_id,
        req.title,
        requirements.skills.len()
    );

    HttpResponse::Created().json(JobResponse { job_id, requirements })
}

/// GET /api/v1/jobs/{job_id}/requirements
async fn get_requirements(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let job_id = path.into_inner();

    match load_requirements(&state, &job_id).await {
        Ok(requirements) => HttpResponse::Ok().json(JobResponse { job_id, requirements }),
        Err(response) => response,
    }
}

/// Score candidates against a job and persist every result
///
/// POST /api/v1/jobs/{job_id}/match
///
/// Request body (optional):
/// ```json
/// {
///   "candidate_ids": ["string"],
///   "threshold": 70.0
/// }
/// ```
async fn match_candidates(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> impl Responder {
    let job_id = path.into_inner();
    let req: MatchCandidatesRequest = match parse_optional_body(&body) {
        Ok(req) => req,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let requirements = match load_requirements(&state, &job_id).await {
        Ok(requirements) => requirements,
        Err(response) => return response,
    };

    let candidates = match state
        .postgres
        .get_candidate_profiles(req.candidate_ids.as_deref())
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to load candidates for {}: {}", job_id, e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load candidates",
                e,
            );
        }
    };

    tracing::debug!("Matching {} candidates against {}", candidates.len(), job_id);

    let matcher = match req.threshold {
        Some(threshold) => state.matcher.with_threshold(threshold),
        None => state.matcher.clone(),
    };

    let results = match matcher
        .match_all(&job_id, &requirements, candidates, state.postgres.as_ref())
        .await
    {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Match run for {} aborted: {}", job_id, e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store match results",
                e,
            );
        }
    };

    // The cached ranking covers every candidate; a partial run makes it stale
    if let Some(cache) = &state.cache {
        if let Err(e) = cache.delete(&CacheKey::matches(&job_id)).await {
            tracing::warn!("Failed to invalidate match cache for {}: {}", job_id, e);
        }
    }

    HttpResponse::Ok().json(MatchResultsResponse::new(&job_id, results))
}

/// Latest result per candidate, best first
///
/// GET /api/v1/jobs/{job_id}/matches
async fn get_matches(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let job_id = path.into_inner();

    if let Some(cache) = &state.cache {
        if let Ok(results) = cache.get_matches(&job_id).await {
            tracing::debug!("Match cache hit for {}", job_id);
            return HttpResponse::Ok().json(MatchResultsResponse::new(&job_id, results));
        }
    }

    let results = match state.postgres.get_latest_match_results(&job_id).await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Failed to load match results for {}: {}", job_id, e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load match results",
                e,
            );
        }
    };

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.set_matches(&job_id, &results).await {
            tracing::warn!("Failed to cache match results for {}: {}", job_id, e);
        }
    }

    HttpResponse::Ok().json(MatchResultsResponse::new(&job_id, results))
}

/// GET /api/v1/jobs/{job_id}/shortlist
async fn get_shortlist(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let job_id = path.into_inner();

    match state.postgres.get_shortlisted_candidates(&job_id).await {
        Ok(candidates) => HttpResponse::Ok().json(ShortlistResponse { job_id, candidates }),
        Err(e) => {
            tracing::error!("Failed to load shortlist for {}: {}", job_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load shortlist", e)
        }
    }
}

/// Draft and record interview invitations for a job's shortlist
///
/// POST /api/v1/jobs/{job_id}/interviews
///
/// Request body (optional, defaults to the stored job):
/// ```json
/// {
///   "job_title": "string",
///   "company_name": "string"
/// }
/// ```
async fn schedule_interviews(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> impl Responder {
    let job_id = path.into_inner();
    let req: ScheduleInterviewsRequest = match parse_optional_body(&body) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let job = match state.postgres.get_job(&job_id).await {
        Ok(job) => job,
        Err(e) => return lookup_error("Job", &job_id, e),
    };

    let job_title = req.job_title.unwrap_or(job.title);
    let company_name = req.company_name.unwrap_or(job.company);

    let shortlist = match state.postgres.get_shortlisted_candidates(&job_id).await {
        Ok(shortlist) => shortlist,
        Err(e) => {
            tracing::error!("Failed to load shortlist for {}: {}", job_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load shortlist", e);
        }
    };

    let today = chrono::Utc::now().date_naive();
    let slots = format_slots(&interview_slots(
        today,
        state.scheduling.default_slots,
        state.scheduling.min_days_ahead,
    ));

    let mut interviews = Vec::with_capacity(shortlist.len());

    for candidate in shortlist {
        let email = state
            .email_drafter
            .draft(&candidate.name, &job_title, &company_name, &slots)
            .await;

        let interview_id = match state
            .postgres
            .record_interview(&job_id, &candidate.candidate_id, &slots, INVITATION_SENT)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(
                    "Failed to record interview for {} on {}: {}",
                    candidate.candidate_id,
                    job_id,
                    e
                );
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to record interview",
                    e,
                );
            }
        };

        interviews.push(ScheduledInterview {
            interview_id,
            candidate,
            email,
            proposed_slots: slots.clone(),
        });
    }

    tracing::info!("Scheduled {} interviews for job {}", interviews.len(), job_id);

    HttpResponse::Ok().json(ScheduleInterviewsResponse { job_id, interviews })
}
