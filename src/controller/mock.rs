// src/controller/mock.rs
//! Stand-in listings shown when a search fails outright

use crate::types::{ContractType, ExperienceLevel, JobListing, JobSearchFilters, RemoteWork};
use chrono::{Duration, Utc};

pub const MOCK_SOURCE: &str = "mock";

const MOCK_TITLES: &[(&str, &str)] = &[
    ("Software Developer", "TechCorp"),
    ("Data Analyst", "DataWorks"),
    ("DevOps Engineer", "CloudNine"),
    ("Product Manager", "Innovate Labs"),
    ("UX Designer", "PixelStudio"),
];

fn pick<T: Copy>(selected: &[T], index: usize, default: T) -> T {
    if selected.is_empty() {
        default
    } else {
        selected[index % selected.len()]
    }
}

/// One listing per fixed title, shaped to pass the given filters
pub fn mock_listings(country: &str, filters: &JobSearchFilters) -> Vec<JobListing> {
    let now = Utc::now();
    let query = filters.query.trim();
    let location = match filters.location.trim() {
        "" => country.to_string(),
        loc => loc.to_string(),
    };

    MOCK_TITLES
        .iter()
        .enumerate()
        .map(|(i, (title, company))| {
            let title = if query.is_empty() {
                title.to_string()
            } else {
                format!("{} - {}", title, query)
            };
            JobListing {
                id: format!("mock-{}", i),
                description: format!(
                    "{} position at {} in {}. Sample listing shown while job sources are unavailable.",
                    title, company, location
                ),
                title,
                company: company.to_string(),
                location: location.clone(),
                salary: None,
                contract_type: pick(&filters.contract_type, i, ContractType::FullTime),
                experience_level: pick(
                    &filters.experience_level,
                    i,
                    ExperienceLevel::Intermediate,
                ),
                remote: pick(&filters.remote, i, RemoteWork::No),
                url: String::new(),
                source: MOCK_SOURCE.to_string(),
                posted_date: now - Duration::days(i as i64),
                match_score: None,
                is_favorite: false,
            }
        })
        .collect()
}
