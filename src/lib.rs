//! Screen Algo - candidate screening service
//!
//! Scores candidate profiles against job requirements on skills, experience
//! and education, shortlists the strongest matches and drafts interview
//! invitations for them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_result, MatchStore, Matcher, MatchingConfig};
pub use models::{CandidateProfile, JobRequirements, MatchResult, ScoringWeights};
