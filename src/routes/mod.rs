// Route exports
pub mod candidates;
pub mod jobs;

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;

use crate::config::SchedulingSettings;
use crate::core::Matcher;
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{CacheManager, CvParser, EmailDrafter, JdAnalyzer, PostgresClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    /// Absent when Redis was unreachable at startup
    pub cache: Option<Arc<CacheManager>>,
    pub jd_analyzer: JdAnalyzer,
    pub cv_parser: CvParser,
    pub email_drafter: EmailDrafter,
    pub matcher: Matcher,
    pub scheduling: SchedulingSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(jobs::configure)
            .configure(candidates::configure),
    );
}

/// JSON error body with a matching status code
pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
