use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use screen_algo::config::{LoggingSettings, Settings};
use screen_algo::core::Matcher;
use screen_algo::models::ErrorResponse;
use screen_algo::routes::{self, AppState};
use screen_algo::services::{CacheManager, CvParser, EmailDrafter, JdAnalyzer, LlmClient, PostgresClient};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error for rejected request payloads
#[derive(Debug)]
struct PayloadError(ErrorResponse);

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl error::ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    PayloadError(ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    })
    .into()
}

fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    PayloadError(ErrorResponse {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    })
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting screening service...");

    // Initialize PostgreSQL client
    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
        )
        .await
        .map_err(|e| startup_error("PostgreSQL connection error", e))?,
    );

    info!("PostgreSQL client initialized");

    // Initialize cache manager (optional - the service runs uncached without it)
    let cache = match &settings.cache {
        Some(cache_settings) => {
            let ttl = cache_settings.ttl_secs.unwrap_or(300);
            let l1_size = cache_settings.l1_cache_size.unwrap_or(1000);

            match CacheManager::new(&cache_settings.redis_url, l1_size, ttl).await {
                Ok(c) => {
                    info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_size, ttl);
                    Some(Arc::new(c))
                }
                Err(e) => {
                    warn!("Failed to connect to Redis ({}), running without cache", e);
                    None
                }
            }
        }
        None => {
            info!("No cache configured, running without cache");
            None
        }
    };

    // Initialize LLM-backed agents
    let llm = LlmClient::new(
        settings.llm.endpoint.clone(),
        settings.llm.model.clone(),
        settings.llm.timeout_secs,
    )
    .map_err(|e| startup_error("LLM client error", e))?;

    info!("LLM client initialized ({} at {})", llm.model(), settings.llm.endpoint);

    let matching = settings.matching.to_matching_config();
    let matcher = Matcher::new(matching);

    info!(
        "Matcher initialized with weights: {:?}, threshold: {}",
        matching.weights, matching.threshold
    );

    // Build application state
    let app_state = AppState {
        postgres,
        cache,
        jd_analyzer: JdAnalyzer::new(llm.clone()),
        cv_parser: CvParser::new(llm.clone()),
        email_drafter: EmailDrafter::new(llm),
        matcher,
        scheduling: settings.scheduling.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
