use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::core::MatchStore;
use crate::models::{
    CandidateProfile, Contact, EduEntry, Job, JobRequirements, MatchResult, ShortlistedCandidate,
    WorkEntry,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// PostgreSQL client for jobs, candidates, match results and interviews
///
/// Match results are append-only: every match run inserts new rows and
/// readers pick the latest row per candidate.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Store a job posting
    pub async fn store_job(
        &self,
        job_id: &str,
        title: &str,
        company: &str,
        description: &str,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO jobs (job_id, title, company, description, date_posted)
            VALUES ($1, $2, $3, $4, CURRENT_DATE)
        "#;

        sqlx::query(query)
            .bind(job_id)
            .bind(title)
            .bind(company)
            .bind(description)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Stored job {} ({})", job_id, title);
        Ok(())
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Job, PostgresError> {
        let query = r#"
            SELECT job_id, title, company, description, date_posted
            FROM jobs
            WHERE job_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Job {}", job_id)))?;

        Ok(Job {
            job_id: row.get("job_id"),
            title: row.get("title"),
            company: row.get("company"),
            description: row.get("description"),
            date_posted: row.get("date_posted"),
        })
    }

    /// Store the requirements extracted for a job
    pub async fn store_job_requirements(
        &self,
        job_id: &str,
        requirements: &JobRequirements,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO job_requirements (job_id, skills, experience, education, responsibilities)
            VALUES ($1, $2, $3, $4, $5)
        "#;

        sqlx::query(query)
            .bind(job_id)
            .bind(Json(&requirements.skills))
            .bind(&requirements.experience)
            .bind(&requirements.education)
            .bind(Json(&requirements.responsibilities))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Latest requirements stored for a job
    pub async fn get_job_requirements(&self, job_id: &str) -> Result<JobRequirements, PostgresError> {
        let query = r#"
            SELECT skills, experience, education, responsibilities
            FROM job_requirements
            WHERE job_id = $1
            ORDER BY requirement_id DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Requirements for job {}", job_id)))?;

        let Json(skills): Json<Vec<String>> = row.get("skills");
        let Json(responsibilities): Json<Vec<String>> = row.get("responsibilities");

        Ok(JobRequirements {
            skills,
            experience: row.get("experience"),
            education: row.get("education"),
            responsibilities,
        })
    }

    /// Store (or replace) a candidate profile
    pub async fn store_candidate_profile(
        &self,
        candidate_id: &str,
        profile: &CandidateProfile,
        resume_text: Option<&str>,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO candidates (candidate_id, name, email, phone, skills, experience, education, resume_text)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (candidate_id)
            DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                skills = EXCLUDED.skills,
                experience = EXCLUDED.experience,
                education = EXCLUDED.education,
                resume_text = COALESCE(EXCLUDED.resume_text, candidates.resume_text)
        "#;

        sqlx::query(query)
            .bind(candidate_id)
            .bind(&profile.name)
            .bind(&profile.contact.email)
            .bind(&profile.contact.phone)
            .bind(Json(&profile.skills))
            .bind(Json(&profile.experience))
            .bind(Json(&profile.education))
            .bind(resume_text)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Stored candidate {} ({})", candidate_id, profile.name);
        Ok(())
    }

    /// Candidate profiles in insertion order, optionally restricted to `candidate_ids`
    pub async fn get_candidate_profiles(
        &self,
        candidate_ids: Option<&[String]>,
    ) -> Result<Vec<(String, CandidateProfile)>, PostgresError> {
        let rows = match candidate_ids {
            Some(ids) => {
                let query = r#"
                    SELECT candidate_id, name, email, phone, skills, experience, education
                    FROM candidates
                    WHERE candidate_id = ANY($1)
                    ORDER BY created_at, candidate_id
                "#;
                sqlx::query(query).bind(ids).fetch_all(&self.pool).await?
            }
            None => {
                let query = r#"
                    SELECT candidate_id, name, email, phone, skills, experience, education
                    FROM candidates
                    ORDER BY created_at, candidate_id
                "#;
                sqlx::query(query).fetch_all(&self.pool).await?
            }
        };

        let profiles = rows
            .iter()
            .map(|row| {
                let Json(skills): Json<Vec<String>> = row.get("skills");
                let Json(experience): Json<Vec<WorkEntry>> = row.get("experience");
                let Json(education): Json<Vec<EduEntry>> = row.get("education");

                let profile = CandidateProfile {
                    name: row.get("name"),
                    contact: Contact {
                        email: row.get("email"),
                        phone: row.get("phone"),
                    },
                    skills,
                    experience,
                    education,
                };

                (row.get("candidate_id"), profile)
            })
            .collect();

        Ok(profiles)
    }

    /// Insert one match result and return its record id
    pub async fn store_match_result(&self, result: &MatchResult) -> Result<i64, PostgresError> {
        let query = r#"
            INSERT INTO match_results (
                job_id, candidate_id, skills_score, experience_score,
                education_score, overall_score, shortlisted
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING match_id
        "#;

        let row = sqlx::query(query)
            .bind(&result.job_id)
            .bind(&result.candidate_id)
            .bind(result.skills_score)
            .bind(result.experience_score)
            .bind(result.education_score)
            .bind(result.overall_score)
            .bind(result.shortlisted)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("match_id"))
    }

    /// Latest result per candidate for a job, ranked by overall score
    pub async fn get_latest_match_results(&self, job_id: &str) -> Result<Vec<MatchResult>, PostgresError> {
        let query = r#"
            SELECT latest.*, c.name AS candidate_name
            FROM (
                SELECT DISTINCT ON (candidate_id)
                    match_id, job_id, candidate_id, skills_score, experience_score,
                    education_score, overall_score, shortlisted
                FROM match_results
                WHERE job_id = $1
                ORDER BY candidate_id, match_id DESC
            ) latest
            JOIN candidates c ON c.candidate_id = latest.candidate_id
            ORDER BY latest.overall_score DESC, latest.match_id
        "#;

        let rows = sqlx::query(query).bind(job_id).fetch_all(&self.pool).await?;

        let results = rows
            .iter()
            .map(|row| MatchResult {
                job_id: row.get("job_id"),
                candidate_id: row.get("candidate_id"),
                candidate_name: row.get("candidate_name"),
                skills_score: row.get("skills_score"),
                experience_score: row.get("experience_score"),
                education_score: row.get("education_score"),
                overall_score: row.get("overall_score"),
                shortlisted: row.get("shortlisted"),
            })
            .collect();

        Ok(results)
    }

    /// Shortlisted candidates for a job, judged on each candidate's latest result
    pub async fn get_shortlisted_candidates(
        &self,
        job_id: &str,
    ) -> Result<Vec<ShortlistedCandidate>, PostgresError> {
        let query = r#"
            SELECT latest.candidate_id, c.name, c.email, c.phone, latest.overall_score
            FROM (
                SELECT DISTINCT ON (candidate_id)
                    candidate_id, overall_score, shortlisted
                FROM match_results
                WHERE job_id = $1
                ORDER BY candidate_id, match_id DESC
            ) latest
            JOIN candidates c ON c.candidate_id = latest.candidate_id
            WHERE latest.shortlisted
            ORDER BY latest.overall_score DESC
        "#;

        let rows = sqlx::query(query).bind(job_id).fetch_all(&self.pool).await?;

        let shortlisted = rows
            .iter()
            .map(|row| ShortlistedCandidate {
                candidate_id: row.get("candidate_id"),
                name: row.get("name"),
                email: row.get("email"),
                phone: row.get("phone"),
                match_score: row.get("overall_score"),
            })
            .collect();

        Ok(shortlisted)
    }

    /// Record an interview invitation and return its id
    pub async fn record_interview(
        &self,
        job_id: &str,
        candidate_id: &str,
        proposed_dates: &[String],
        status: &str,
    ) -> Result<i64, PostgresError> {
        let query = r#"
            INSERT INTO interviews (job_id, candidate_id, proposed_dates, status)
            VALUES ($1, $2, $3, $4)
            RETURNING interview_id
        "#;

        let row = sqlx::query(query)
            .bind(job_id)
            .bind(candidate_id)
            .bind(Json(proposed_dates))
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        let interview_id: i64 = row.get("interview_id");
        tracing::debug!("Recorded interview {} for {} on {}", interview_id, candidate_id, job_id);
        Ok(interview_id)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

impl MatchStore for PostgresClient {
    type Error = PostgresError;

    async fn store(&self, result: &MatchResult) -> Result<i64, Self::Error> {
        self.store_match_result(result).await
    }
}
