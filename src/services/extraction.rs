//! LLM-backed extraction of job requirements and candidate profiles.
//!
//! The LLM is asked for JSON; its reply is parsed into typed records here so
//! scoring never sees loosely shaped data. When the reply is not valid JSON
//! the individual fields are salvaged with regexes, and when the LLM cannot
//! be reached a regex-only extraction runs over the raw text instead.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::core::scheduler::{fallback_invitation, invitation_prompt};
use crate::models::{CandidateProfile, Contact, EduEntry, JobRequirements};
use crate::services::llm::LlmClient;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("LLM reply contained no usable fields: {0}")]
    Unusable(String),
}

macro_rules! re {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

re!(FENCED_JSON_RE, r"(?s)```(?:json)?\s*(.*?)\s*```");
re!(QUOTED_RE, r#""([^"]+)""#);
re!(SKILLS_FIELD_RE, r#"(?s)"skills":\s*\[(.*?)\]"#);
re!(RESPONSIBILITIES_FIELD_RE, r#"(?s)"responsibilities":\s*\[(.*?)\]"#);
re!(EXPERIENCE_FIELD_RE, r#""experience":\s*"([^"]+)""#);
re!(EDUCATION_FIELD_RE, r#""education":\s*"([^"]+)""#);
re!(NAME_FIELD_RE, r#""name":\s*"([^"]+)""#);
re!(EMAIL_FIELD_RE, r#""email":\s*"([^"]+)""#);
re!(PHONE_FIELD_RE, r#""phone":\s*"([^"]+)""#);

re!(JD_SKILLS_SECTION_RE, r"(?is)(?:Requirements|Skills|Qualifications):(.*?)(?:Responsibilities|About Us|Benefits|$)");
re!(JD_BULLET_RE, r"(?m)^[ \t]*(?:•|\*|-|\d+\.)[ \t]*([A-Za-z0-9+# \t]+)(?:[ \t]*\([^)]+\))?");
re!(JD_YEARS_RE, r"(?i)(\d+\+?)\s*(?:-\s*\d+)?\s*years?(?:\s+of)?\s+experience");
re!(JD_EDUCATION_RE, r"(?i)\b(?:Bachelor|Master|PhD|Degree|BS|MS|BA|MBA)(?:'s)?\s+(?:degree\s+)?(?:in|of|with)?\s*[^,.\n]+");
re!(JD_RESPONSIBILITIES_SECTION_RE, r"(?is)(?:Responsibilities|Duties|You will):(.*?)(?:Requirements|Qualifications|Skills|About Us|Benefits|$)");
re!(JD_RESPONSIBILITY_BULLET_RE, r"(?m)^[ \t]*(?:•|\*|-|\d+\.)[ \t]*([A-Za-z][^•*\-\d.\n]+)");

re!(CV_NAME_RE, r"^([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){1,3})");
re!(CV_EMAIL_RE, r"[\w.-]+@[\w.-]+\.\w+");
re!(CV_PHONE_RE, r"(?:\+\d{1,2}\s?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}");
re!(CV_SKILLS_SECTION_RE, r"(?is)(?:Skills|Proficiencies|Abilities)(?::|\.)(.*?)(?:Education|Experience|Reference|$)");
re!(CV_SKILL_ITEM_RE, r"(?:^|•|\*|-|,|\n)\s*([A-Za-z0-9+#]+(?:[ \t]+[A-Za-z0-9+#]+){0,3})");
re!(CV_EDUCATION_SECTION_RE, r"(?is)(?:Education|Academic Background|Qualifications)(?::|\.)(.*?)(?:Experience|Skills|References|$)");
re!(CV_DEGREE_RE, r"(?:Bachelor|Master|PhD|MBA|BS|MS|BA|MD|JD)[^\n,]+(?: of | in )[^\n,]+");
re!(CV_INSTITUTION_RE, r"(?:University|College|Institute|School) of [A-Za-z ]+");

const MAX_FALLBACK_SKILLS: usize = 10;
const MAX_FALLBACK_RESPONSIBILITIES: usize = 5;

fn requirements_prompt(description: &str) -> String {
    format!(
        r#"Extract the following information from this job description:
1. Required skills (list all technical and soft skills)
2. Years of experience required
3. Education requirements
4. Key responsibilities

Format the output as JSON with the following keys:
"skills": [list of skills],
"experience": "experience requirement as text",
"education": "education requirement as text",
"responsibilities": [list of key responsibilities]

Here is the job description:
{description}"#
    )
}

fn profile_prompt(resume: &str) -> String {
    format!(
        r#"Extract the following information from this resume:
1. Candidate name
2. Contact information (email, phone)
3. Skills (list all technical and soft skills)
4. Work experience (for each position: company, title, dates, description)
5. Education (for each entry: degree, institution, year)

Format the output as JSON with the following structure:
{{
    "name": "candidate name",
    "contact": {{"email": "email address", "phone": "phone number"}},
    "skills": ["skill1", "skill2"],
    "experience": [
        {{
            "company": "company name",
            "title": "job title",
            "start_date": "YYYY-MM",
            "end_date": "YYYY-MM or 'present'",
            "description": "job description"
        }}
    ],
    "education": [
        {{"degree": "degree name", "institution": "institution name", "year": 2020}}
    ]
}}

Here is the resume:
{resume}"#
    )
}

/// The JSON payload of an LLM reply, with any markdown fence removed
pub fn extract_json_block(reply: &str) -> &str {
    if let Some(inner) = FENCED_JSON_RE.captures(reply).and_then(|c| c.get(1)) {
        return inner.as_str();
    }

    let trimmed = reply.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn quoted_list(re: &Regex, text: &str) -> Vec<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|list| {
            QUOTED_RE
                .captures_iter(list.as_str())
                .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn quoted_field(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parse an LLM reply into job requirements
pub fn parse_requirements(reply: &str) -> Result<JobRequirements, ExtractionError> {
    let json = extract_json_block(reply);

    match serde_json::from_str::<JobRequirements>(json) {
        Ok(requirements) => Ok(requirements),
        Err(e) => {
            tracing::debug!("Requirements reply is not valid JSON ({}), salvaging fields", e);

            let requirements = JobRequirements {
                skills: quoted_list(&SKILLS_FIELD_RE, reply),
                experience: quoted_field(&EXPERIENCE_FIELD_RE, reply).unwrap_or_default(),
                education: quoted_field(&EDUCATION_FIELD_RE, reply).unwrap_or_default(),
                responsibilities: quoted_list(&RESPONSIBILITIES_FIELD_RE, reply),
            };

            if requirements == JobRequirements::default() {
                Err(ExtractionError::Unusable(e.to_string()))
            } else {
                Ok(requirements)
            }
        }
    }
}

/// Parse an LLM reply into a candidate profile
pub fn parse_profile(reply: &str) -> Result<CandidateProfile, ExtractionError> {
    let json = extract_json_block(reply);

    match serde_json::from_str::<CandidateProfile>(json) {
        Ok(profile) => Ok(profile),
        Err(e) => {
            tracing::debug!("Profile reply is not valid JSON ({}), salvaging fields", e);

            let name = quoted_field(&NAME_FIELD_RE, reply);
            let email = quoted_field(&EMAIL_FIELD_RE, reply);
            let phone = quoted_field(&PHONE_FIELD_RE, reply);
            let skills = quoted_list(&SKILLS_FIELD_RE, reply);

            if name.is_none() && email.is_none() && phone.is_none() && skills.is_empty() {
                return Err(ExtractionError::Unusable(e.to_string()));
            }

            Ok(CandidateProfile {
                name: name.unwrap_or_else(|| "Unknown".to_string()),
                contact: Contact {
                    email: email.unwrap_or_default(),
                    phone: phone.unwrap_or_default(),
                },
                skills,
                ..Default::default()
            })
        }
    }
}

fn bullet_items(re: &Regex, text: &str, min_len: usize) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|item| item.len() > min_len)
        .collect()
}

/// Regex-only requirement extraction from a raw job description
pub fn basic_requirements(description: &str) -> JobRequirements {
    let skills_text = JD_SKILLS_SECTION_RE
        .captures(description)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(description);

    let mut skills = bullet_items(&JD_BULLET_RE, skills_text, 2);
    skills.truncate(MAX_FALLBACK_SKILLS);

    let experience = JD_YEARS_RE
        .captures(description)
        .and_then(|c| c.get(1))
        .map(|m| format!("{} years", m.as_str()))
        .unwrap_or_default();

    let education = JD_EDUCATION_RE
        .find(description)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let responsibilities_text = JD_RESPONSIBILITIES_SECTION_RE
        .captures(description)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");

    let mut responsibilities = bullet_items(&JD_RESPONSIBILITY_BULLET_RE, responsibilities_text, 10);
    responsibilities.truncate(MAX_FALLBACK_RESPONSIBILITIES);

    JobRequirements {
        skills,
        experience,
        education,
        responsibilities,
    }
}

/// Regex-only profile extraction from raw résumé text
///
/// Work history is left empty: without reliable dates it would score zero anyway.
pub fn basic_profile(resume: &str) -> CandidateProfile {
    let name = CV_NAME_RE
        .captures(resume.trim_start())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let email = CV_EMAIL_RE
        .find(resume)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let phone = CV_PHONE_RE
        .find(resume)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let skills = CV_SKILLS_SECTION_RE
        .captures(resume)
        .and_then(|c| c.get(1))
        .map(|section| bullet_items(&CV_SKILL_ITEM_RE, section.as_str(), 2))
        .unwrap_or_default();

    let education = CV_EDUCATION_SECTION_RE
        .captures(resume)
        .and_then(|c| c.get(1))
        .and_then(|section| {
            let section = section.as_str();
            let degree = CV_DEGREE_RE.find(section)?.as_str().trim().to_string();
            let institution = CV_INSTITUTION_RE
                .find(section)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            Some(vec![EduEntry { degree, institution, year: None }])
        })
        .unwrap_or_default();

    CandidateProfile {
        name,
        contact: Contact { email, phone },
        skills,
        experience: Vec::new(),
        education,
    }
}

/// Extracts structured requirements from job descriptions
#[derive(Clone)]
pub struct JdAnalyzer {
    llm: LlmClient,
}

impl JdAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Extract requirements, degrading to regex extraction when the LLM fails
    pub async fn extract_requirements(&self, description: &str) -> JobRequirements {
        let reply = match self.llm.chat(&requirements_prompt(description)).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("LLM requirement extraction failed ({}), using basic extraction", e);
                return basic_requirements(description);
            }
        };

        parse_requirements(&reply).unwrap_or_else(|e| {
            tracing::warn!("{}; using basic extraction", e);
            basic_requirements(description)
        })
    }
}

/// Extracts candidate profiles from résumé text
#[derive(Clone)]
pub struct CvParser {
    llm: LlmClient,
}

impl CvParser {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Extract a profile, degrading to regex extraction when the LLM fails
    pub async fn extract_profile(&self, resume: &str) -> CandidateProfile {
        let reply = match self.llm.chat(&profile_prompt(resume)).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("LLM profile extraction failed ({}), using basic extraction", e);
                return basic_profile(resume);
            }
        };

        parse_profile(&reply).unwrap_or_else(|e| {
            tracing::warn!("{}; using basic extraction", e);
            basic_profile(resume)
        })
    }
}

/// Drafts interview invitation emails
#[derive(Clone)]
pub struct EmailDrafter {
    llm: LlmClient,
}

impl EmailDrafter {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// LLM-drafted invitation, or the fixed template if the LLM is unavailable
    pub async fn draft(
        &self,
        candidate_name: &str,
        job_title: &str,
        company_name: &str,
        slots: &[String],
    ) -> String {
        match self
            .llm
            .chat(&invitation_prompt(candidate_name, job_title, company_name, slots))
            .await
        {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!("LLM email drafting failed for {} ({}), using template", candidate_name, e);
                fallback_invitation(candidate_name, job_title, company_name, slots)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JD: &str = "Data Engineer at Initech

Requirements:
- Python
- SQL (PostgreSQL or MySQL)
- Airflow

We are looking for 3+ years of experience in data engineering.
Bachelor's degree in Computer Science, or equivalent.

Responsibilities:
- Design and maintain batch pipelines
- Partner with analysts on reporting
";

    const SAMPLE_CV: &str = "Jane Doe
jane.doe@example.com | (555) 123-4567

Skills: Python, SQL, Apache Spark

Education:
Master of Science in Data Science, University of Somewhere
";

    #[test]
    fn test_extract_json_block_fenced() {
        let reply = "Here you go:\n```json\n{\"skills\": []}\n```\nThanks";
        assert_eq!(extract_json_block(reply), "{\"skills\": []}");
    }

    #[test]
    fn test_extract_json_block_prose() {
        let reply = "Sure! {\"skills\": [\"Rust\"]} Hope this helps.";
        assert_eq!(extract_json_block(reply), "{\"skills\": [\"Rust\"]}");
    }

    #[test]
    fn test_parse_requirements_valid_json() {
        let reply = r#"```json
{"skills": ["Python", "SQL"], "experience": "3+ years", "education": "Bachelor's degree"}
```"#;
        let reqs = parse_requirements(reply).unwrap();
        assert_eq!(reqs.skills, vec!["Python", "SQL"]);
        assert_eq!(reqs.experience, "3+ years");
        assert!(reqs.responsibilities.is_empty());
    }

    #[test]
    fn test_parse_requirements_salvages_broken_json() {
        let reply = r#"{"skills": ["Python", "SQL"], "experience": "2-4 years", "education": "Master's",}"#;
        let reqs = parse_requirements(reply).unwrap();
        assert_eq!(reqs.skills, vec!["Python", "SQL"]);
        assert_eq!(reqs.experience, "2-4 years");
        assert_eq!(reqs.education, "Master's");
    }

    #[test]
    fn test_parse_requirements_unusable() {
        assert!(parse_requirements("I cannot help with that.").is_err());
    }

    #[test]
    fn test_parse_profile_valid_json() {
        let reply = r#"{
            "name": "Jane Doe",
            "contact": {"email": "jane@example.com", "phone": ""},
            "skills": ["Python"],
            "experience": [{"company": "Initech", "title": "Engineer", "start_date": "2020-01", "end_date": "present", "description": ""}],
            "education": [{"degree": "BSc Computer Science", "institution": "MIT", "year": "2019"}]
        }"#;
        let profile = parse_profile(reply).unwrap();
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.experience.len(), 1);
        assert_eq!(profile.education[0].year, Some(2019));
    }

    #[test]
    fn test_parse_profile_salvages_fields() {
        let reply = r#"{"name": "Jane Doe", "contact": {"email": "jane@example.com"}, "skills": ["Python", "SQL"] oops"#;
        let profile = parse_profile(reply).unwrap();
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.contact.email, "jane@example.com");
        assert_eq!(profile.skills, vec!["Python", "SQL"]);
    }

    #[test]
    fn test_basic_requirements() {
        let reqs = basic_requirements(SAMPLE_JD);
        assert_eq!(reqs.skills, vec!["Python", "SQL", "Airflow"]);
        assert_eq!(reqs.experience, "3+ years");
        assert!(reqs.education.starts_with("Bachelor's degree in Computer Science"));
        assert_eq!(
            reqs.responsibilities,
            vec!["Design and maintain batch pipelines", "Partner with analysts on reporting"]
        );
    }

    #[test]
    fn test_basic_profile() {
        let profile = basic_profile(SAMPLE_CV);
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.contact.email, "jane.doe@example.com");
        assert_eq!(profile.contact.phone, "(555) 123-4567");
        assert_eq!(profile.skills, vec!["Python", "SQL", "Apache Spark"]);
        assert_eq!(profile.education.len(), 1);
        assert!(profile.education[0].degree.starts_with("Master of Science"));
        assert_eq!(profile.education[0].institution, "University of Somewhere");
    }

    #[tokio::test]
    async fn test_jd_analyzer_uses_llm_reply() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "message": {
                        "role": "assistant",
                        "content": "```json\n{\"skills\": [\"Rust\"], \"experience\": \"5 years\", \"education\": \"\", \"responsibilities\": []}\n```"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let llm = LlmClient::new(server.url(), "mistral".to_string(), 5).unwrap();
        let reqs = JdAnalyzer::new(llm).extract_requirements(SAMPLE_JD).await;

        assert_eq!(reqs.skills, vec!["Rust"]);
        assert_eq!(reqs.experience, "5 years");
    }

    #[tokio::test]
    async fn test_cv_parser_falls_back_when_llm_down() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(400)
            .create_async()
            .await;

        let llm = LlmClient::new(server.url(), "mistral".to_string(), 5).unwrap();
        let profile = CvParser::new(llm).extract_profile(SAMPLE_CV).await;

        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.contact.email, "jane.doe@example.com");
    }

    #[tokio::test]
    async fn test_email_drafter_prompt_carries_slots() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_body(mockito::Matcher::Regex(
                "Tuesday, March 12 at 02:00 PM".to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"message":{"role":"assistant","content":"Dear Jane, see you Tuesday."}}"#)
            .expect(1)
            .create_async()
            .await;

        let llm = LlmClient::new(server.url(), "mistral".to_string(), 5).unwrap();
        let slots = vec!["Tuesday, March 12 at 02:00 PM".to_string()];
        let email = EmailDrafter::new(llm).draft("Jane Doe", "Data Engineer", "Initech", &slots).await;

        assert_eq!(email, "Dear Jane, see you Tuesday.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_email_drafter_falls_back_to_template() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/chat")
            .with_status(404)
            .create_async()
            .await;

        let llm = LlmClient::new(server.url(), "mistral".to_string(), 5).unwrap();
        let slots = vec!["Monday, March 11 at 10:00 AM".to_string()];
        let email = EmailDrafter::new(llm).draft("Jane Doe", "Data Engineer", "Initech", &slots).await;

        assert!(email.contains("Dear Jane Doe,"));
        assert!(email.contains("- Monday, March 11 at 10:00 AM"));
    }
}
