// src/types/job.rs
//! Job listing and search filter types shared by sources, matching and the controller

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ContractType {
    #[default]
    FullTime,
    PartTime,
    Freelance,
    Internship,
    Apprenticeship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    #[default]
    Intermediate,
    Senior,
    Executive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RemoteWork {
    #[default]
    No,
    Hybrid,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostedSince {
    Day,
    Week,
    Month,
    #[default]
    Any,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::FullTime => "full-time",
            ContractType::PartTime => "part-time",
            ContractType::Freelance => "freelance",
            ContractType::Internship => "internship",
            ContractType::Apprenticeship => "apprenticeship",
        }
    }
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Executive => "executive",
        }
    }
}

impl RemoteWork {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteWork::No => "no",
            RemoteWork::Hybrid => "hybrid",
            RemoteWork::Full => "full",
        }
    }
}

impl PostedSince {
    /// Maximum listing age in days understood by the official job APIs
    pub fn max_days_old(&self) -> Option<u32> {
        match self {
            PostedSince::Day => Some(1),
            PostedSince::Week => Some(7),
            PostedSince::Month => Some(30),
            PostedSince::Any => None,
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RemoteWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub contract_type: ContractType,
    pub experience_level: ExperienceLevel,
    pub remote: RemoteWork,
    pub url: String,
    pub source: String,
    pub posted_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u8>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl JobListing {
    /// Key used to collapse the same posting published by several sources
    pub fn dedup_key(&self) -> String {
        format!(
            "{}-{}",
            self.title.to_lowercase(),
            self.company.to_lowercase()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobSearchFilters {
    pub query: String,
    pub location: String,
    pub radius: Option<u32>,
    pub contract_type: Vec<ContractType>,
    pub experience_level: Vec<ExperienceLevel>,
    pub remote: Vec<RemoteWork>,
    pub salary_range: Option<SalaryRange>,
    pub posted_since: PostedSince,
}

impl JobSearchFilters {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Empty allow-lists pass every listing through
    pub fn accepts(&self, job: &JobListing) -> bool {
        (self.contract_type.is_empty() || self.contract_type.contains(&job.contract_type))
            && (self.experience_level.is_empty()
                || self.experience_level.contains(&job.experience_level))
            && (self.remote.is_empty() || self.remote.contains(&job.remote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&ContractType::FullTime).unwrap(),
            "\"full-time\""
        );
        assert_eq!(
            serde_json::from_str::<ExperienceLevel>("\"senior\"").unwrap(),
            ExperienceLevel::Senior
        );
        assert_eq!(serde_json::to_string(&RemoteWork::No).unwrap(), "\"no\"");
    }

    #[test]
    fn test_posted_since_days() {
        assert_eq!(PostedSince::Day.max_days_old(), Some(1));
        assert_eq!(PostedSince::Week.max_days_old(), Some(7));
        assert_eq!(PostedSince::Month.max_days_old(), Some(30));
        assert_eq!(PostedSince::Any.max_days_old(), None);
    }

    #[test]
    fn test_filters_deserialize_with_missing_fields() {
        let filters: JobSearchFilters =
            serde_json::from_str(r#"{"query":"rust","remote":["full"]}"#).unwrap();
        assert_eq!(filters.query, "rust");
        assert_eq!(filters.remote, vec![RemoteWork::Full]);
        assert!(filters.contract_type.is_empty());
        assert_eq!(filters.posted_since, PostedSince::Any);
    }
}
