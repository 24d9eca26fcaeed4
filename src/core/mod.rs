// Core algorithm exports
pub mod education;
pub mod experience;
pub mod matcher;
pub mod scheduler;
pub mod scoring;
pub mod skills;

pub use education::score_education;
pub use experience::{parse_required_years, score_experience, YearsPattern};
pub use matcher::{MatchStore, Matcher, MatchingConfig, DEFAULT_THRESHOLD};
pub use scheduler::{fallback_invitation, format_slots, interview_slots};
pub use scoring::calculate_match_result;
pub use skills::score_skills;
