pub mod cv_data;
pub mod job;
pub mod match_score;
pub mod response;

pub use cv_data::{CandidateProfile, Experience, PersonalInfo, Skills};
pub use job::{
    ContractType, ExperienceLevel, JobListing, JobSearchFilters, PostedSince, RemoteWork,
    SalaryRange,
};
pub use match_score::{
    JobMatchScore, JobStats, MatchBreakdown, PersonalizedRecommendation, Priority,
    RecommendationType,
};
