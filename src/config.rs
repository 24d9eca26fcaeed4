use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::MatchingConfig;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: Option<CacheSettings>,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scheduling: SchedulingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_llm_endpoint() -> String { "http://localhost:11434".to_string() }
fn default_llm_model() -> String { "mistral".to_string() }
fn default_llm_timeout() -> u64 { 120 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub weights: WeightsConfig,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            weights: WeightsConfig::default(),
        }
    }
}

fn default_threshold() -> f64 { 70.0 }

impl MatchingSettings {
    /// Reject settings that would push scores outside 0-100
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(ConfigError::Message(format!(
                "matching.threshold must be within 0-100, got {}",
                self.threshold
            )));
        }

        let w = &self.weights;
        for (name, value) in [("skills", w.skills), ("experience", w.experience), ("education", w.education)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Message(format!(
                    "matching.weights.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    pub fn to_matching_config(&self) -> MatchingConfig {
        MatchingConfig {
            weights: ScoringWeights {
                skills: self.weights.skills,
                experience: self.weights.experience,
                education: self.weights.education,
            },
            threshold: self.threshold,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skills_weight")]
    pub skills: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_education_weight")]
    pub education: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skills: default_skills_weight(),
            experience: default_experience_weight(),
            education: default_education_weight(),
        }
    }
}

fn default_skills_weight() -> f64 { 0.5 }
fn default_experience_weight() -> f64 { 0.3 }
fn default_education_weight() -> f64 { 0.2 }

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingSettings {
    #[serde(default = "default_min_days_ahead")]
    pub min_days_ahead: u32,
    #[serde(default = "default_slots")]
    pub default_slots: usize,
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            min_days_ahead: default_min_days_ahead(),
            default_slots: default_slots(),
        }
    }
}

fn default_min_days_ahead() -> u32 { 3 }
fn default_slots() -> usize { 3 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCREEN__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCREEN__MATCHING__THRESHOLD -> matching.threshold
            .add_source(
                Environment::with_prefix("SCREEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.matching.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SCREEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.matching.validate()?;
        Ok(settings)
    }
}

/// Apply well-known unprefixed environment variables on top of the layered config
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }
    if let Ok(llm_endpoint) = env::var("OLLAMA_HOST") {
        builder = builder.set_override("llm.endpoint", llm_endpoint)?;
    }
    if let Ok(log_level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", log_level)?;
    }
    if let Ok(log_format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", log_format)?;
    }

    builder.build()
}
