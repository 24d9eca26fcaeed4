use serde::{Deserialize, Deserializer, Serialize};

/// Structured requirements extracted from a job description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    #[serde(default, deserialize_with = "strings_or_null")]
    pub skills: Vec<String>,
    /// Free-text requirement such as "3+ years" or "2-4 years"
    #[serde(default, deserialize_with = "string_or_null")]
    pub experience: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub education: String,
    /// Carried for display only, never scored
    #[serde(default, deserialize_with = "strings_or_null")]
    pub responsibilities: Vec<String>,
}

/// Candidate profile extracted from a résumé
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default = "unknown_name", deserialize_with = "name_or_unknown")]
    pub name: String,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default, deserialize_with = "strings_or_null")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "vec_or_null")]
    pub experience: Vec<WorkEntry>,
    #[serde(default, deserialize_with = "vec_or_null")]
    pub education: Vec<EduEntry>,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            name: unknown_name(),
            contact: Contact::default(),
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, deserialize_with = "string_or_null")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub phone: String,
}

/// One position in a candidate's work history
///
/// Dates are `YYYY` or `YYYY-MM`; `end_date` may also be `"present"`.
/// Anything else is scored as zero duration rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    #[serde(default, deserialize_with = "string_or_null")]
    pub company: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub start_date: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub end_date: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EduEntry {
    #[serde(default, deserialize_with = "string_or_null")]
    pub degree: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,
}

/// Score breakdown for one (job, candidate) pair
///
/// Never updated in place: re-matching produces a new result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: String,
    pub candidate_id: String,
    pub candidate_name: String,
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub overall_score: f64,
    pub shortlisted: bool,
}

impl MatchResult {
    /// Attach the job this result was computed for
    pub fn tagged(mut self, job_id: &str) -> Self {
        self.job_id = job_id.to_string();
        self
    }
}

/// A job posting as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub date_posted: chrono::NaiveDate,
}

/// Shortlisted candidate joined with contact details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortlistedCandidate {
    pub candidate_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub match_score: f64,
}

/// Sub-score weights used by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.5,
            experience: 0.3,
            education: 0.2,
        }
    }
}

fn unknown_name() -> String { "Unknown".to_string() }

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn name_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    if name.trim().is_empty() {
        Ok(unknown_name())
    } else {
        Ok(name)
    }
}

fn strings_or_null<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Option<String>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .into_iter()
        .flatten()
        .filter(|item| !item.trim().is_empty())
        .collect())
}

fn vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `2019`, `"2019"`, `null`, or junk text (treated as absent)
fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(i64),
        Float(f64),
        Text(String),
    }

    let year = match Option::<RawYear>::deserialize(deserializer)? {
        Some(RawYear::Number(n)) => i32::try_from(n).ok(),
        Some(RawYear::Float(f)) if f.is_finite() => Some(f as i32),
        Some(RawYear::Text(s)) => s.trim().parse::<i32>().ok(),
        _ => None,
    };

    // LLM output uses 0 for "unknown"
    Ok(year.filter(|y| *y > 0))
}
