// src/types/match_score.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBreakdown {
    pub skills_match: u8,
    pub experience_match: u8,
    pub location_match: u8,
    pub salary_match: u8,
    pub remote_pref_match: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchScore {
    pub job_id: String,
    pub overall_score: u8,
    pub breakdown: MatchBreakdown,
    pub recommendations: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    SkillGap,
    SalaryNegotiation,
    LocationAdvice,
    ExperienceBoost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedRecommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub title: String,
    pub description: String,
    pub action_items: Vec<String>,
    pub priority: Priority,
}

/// Aggregate figures over the controller's current result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total_jobs: usize,
    pub scored_jobs: usize,
    pub average_match_score: Option<u8>,
    pub favorites: usize,
    pub remote_jobs: usize,
    pub hybrid_jobs: usize,
    pub jobs_with_salary: usize,
    pub by_source: Vec<(String, usize)>,
    pub by_contract_type: Vec<(String, usize)>,
}
