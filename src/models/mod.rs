// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CandidateProfile, Contact, EduEntry, Job, JobRequirements, MatchResult, ScoringWeights,
    ShortlistedCandidate, WorkEntry,
};
pub use requests::{CreateCandidateRequest, CreateJobRequest, MatchCandidatesRequest, ScheduleInterviewsRequest};
pub use responses::{
    CandidateResponse, ErrorResponse, HealthResponse, JobResponse, MatchResultsResponse,
    ScheduleInterviewsResponse, ScheduledInterview, ShortlistResponse,
};
