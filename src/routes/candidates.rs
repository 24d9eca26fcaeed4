use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{CandidateResponse, CreateCandidateRequest};
use crate::routes::{error_response, AppState};

/// Configure all candidate-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/candidates", web::post().to(create_candidate));
}

fn new_candidate_id() -> String {
    format!("cand_{}", uuid::Uuid::new_v4().simple())
}

/// Register or update a candidate
///
/// POST /api/v1/candidates
///
/// Request body:
/// ```json
/// {
///   "candidate_id": "string",
///   "resume_text": "string",
///   "profile": { "name": "string", "skills": [], "experience": [], "education": [] }
/// }
/// ```
///
/// A supplied profile is stored as-is; otherwise one is extracted from the
/// résumé text. Re-posting an existing `candidate_id` replaces its profile.
async fn create_candidate(
    state: web::Data<AppState>,
    req: web::Json<CreateCandidateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let req = req.into_inner();
    let candidate_id = req.candidate_id.unwrap_or_else(new_candidate_id);

    let profile = match (req.profile, req.resume_text.as_deref()) {
        (Some(profile), _) => profile,
        (None, Some(text)) => state.cv_parser.extract_profile(text).await,
        // Rejected by validation above
        (None, None) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                "resume_text or profile is required",
            )
        }
    };

    if let Err(e) = state
        .postgres
        .store_candidate_profile(&candidate_id, &profile, req.resume_text.as_deref())
        .await
    {
        tracing::error!("Failed to store candidate {}: {}", candidate_id, e);
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to store candidate",
            e,
        );
    }

    tracing::info!(
        "Stored candidate {} ({}) with {} skills",
        candidate_id,
        profile.name,
        profile.skills.len()
    );

    HttpResponse::Created().json(CandidateResponse { candidate_id, profile })
}
