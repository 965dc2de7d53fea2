// src/types/cv_data.rs
//! Candidate profile as served by the collaborator `/api/user/cv` endpoint

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CandidateProfile {
    pub personal_info: PersonalInfo,
    pub work_experience: Vec<Experience>,
    pub skills: Skills,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    /// City or free-form address
    #[serde(alias = "address", alias = "city")]
    pub location: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub title: String,
    pub start_date: String,
    /// None means current
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<String>,
    pub programming_languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
    pub soft_skills: Vec<String>,
}

const ONGOING_MARKERS: [&str; 6] = [
    "present",
    "current",
    "now",
    "ongoing",
    "aujourd'hui",
    "présent",
];

impl Skills {
    /// Every skill across categories, in declaration order, without duplicates
    pub fn all(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.technical
            .iter()
            .chain(&self.programming_languages)
            .chain(&self.frameworks)
            .chain(&self.tools)
            .chain(&self.soft_skills)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.to_lowercase()))
            .map(str::to_string)
            .collect()
    }
}

impl CandidateProfile {
    pub fn skill_list(&self) -> Vec<String> {
        let mut skills = self.skills.all();
        for exp in &self.work_experience {
            for tech in exp.technologies.iter().flatten() {
                if !skills.iter().any(|s| s.eq_ignore_ascii_case(tech)) {
                    skills.push(tech.clone());
                }
            }
        }
        skills
    }

    /// Total years across experience entries, ongoing entries counted up to `now`
    pub fn total_experience_years(&self, now: DateTime<Utc>) -> Result<f64> {
        let mut days = 0i64;
        for exp in &self.work_experience {
            let start = parse_profile_date(&exp.start_date).with_context(|| {
                format!("Invalid start date for {} at {}", exp.title, exp.company)
            })?;
            let end = match exp.end_date.as_deref().map(str::trim) {
                None | Some("") => now,
                Some(raw) if is_ongoing(raw) => now,
                Some(raw) => parse_profile_date(raw).with_context(|| {
                    format!("Invalid end date for {} at {}", exp.title, exp.company)
                })?,
            };
            days += (end - start).num_days().max(0);
        }
        Ok(days as f64 / 365.25)
    }

    /// Free text describing the candidate, fed to the similarity model
    pub fn summary_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(title) = &self.personal_info.title {
            parts.push(title.clone());
        }
        if let Some(summary) = &self.personal_info.summary {
            parts.push(summary.clone());
        }
        let skills = self.skill_list();
        if !skills.is_empty() {
            parts.push(format!("Skills: {}", skills.join(", ")));
        }
        for exp in &self.work_experience {
            parts.push(format!("{} at {}", exp.title, exp.company));
            if let Some(desc) = &exp.description {
                parts.push(desc.clone());
            }
        }
        parts.join(". ")
    }
}

fn is_ongoing(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    ONGOING_MARKERS.iter().any(|m| lower == *m)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM`, `MM/YYYY` and `YYYY`
pub fn parse_profile_date(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    let date = if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        d
    } else if let Ok(d) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
        d
    } else if let Some((month, year)) = raw.split_once('/') {
        let month: u32 = month.trim().parse().context("Invalid month")?;
        let year: i32 = year.trim().parse().context("Invalid year")?;
        NaiveDate::from_ymd_opt(year, month, 1).context("Date out of range")?
    } else {
        let year: i32 = raw
            .parse()
            .with_context(|| format!("Unrecognized date: {}", raw))?;
        NaiveDate::from_ymd_opt(year, 1, 1).context("Date out of range")?
    };

    let midnight = date.and_hms_opt(0, 0, 0).context("Invalid time")?;
    Ok(Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experience(start: &str, end: Option<&str>) -> Experience {
        Experience {
            company: "Acme".to_string(),
            title: "Developer".to_string(),
            start_date: start.to_string(),
            end_date: end.map(str::to_string),
            description: None,
            technologies: None,
        }
    }

    #[test]
    fn test_parse_profile_date_formats() {
        assert_eq!(
            parse_profile_date("2021-03-15").unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2021, 3, 15).unwrap()
        );
        assert_eq!(
            parse_profile_date("2021-03").unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
        );
        assert_eq!(
            parse_profile_date("03/2021").unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
        );
        assert_eq!(
            parse_profile_date("2021").unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );
        assert!(parse_profile_date("last spring").is_err());
    }

    #[test]
    fn test_total_experience_years_counts_current_roles() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let profile = CandidateProfile {
            work_experience: vec![
                experience("2019-01", Some("2020-01")),
                experience("2022-01", Some("present")),
                experience("2023-01", None),
            ],
            ..Default::default()
        };
        let years = profile.total_experience_years(now).unwrap();
        assert!((years - 4.0).abs() < 0.05, "got {}", years);
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        let profile = CandidateProfile {
            work_experience: vec![experience("someday", None)],
            ..Default::default()
        };
        assert!(profile.total_experience_years(Utc::now()).is_err());
    }

    #[test]
    fn test_skill_list_merges_categories_and_technologies() {
        let mut exp = experience("2020", None);
        exp.technologies = Some(vec!["Docker".to_string(), "react".to_string()]);
        let profile = CandidateProfile {
            skills: Skills {
                programming_languages: vec!["JavaScript".to_string()],
                frameworks: vec!["React".to_string()],
                ..Default::default()
            },
            work_experience: vec![exp],
            ..Default::default()
        };
        assert_eq!(profile.skill_list(), vec!["JavaScript", "React", "Docker"]);
    }

    #[test]
    fn test_profile_accepts_city_alias() {
        let profile: CandidateProfile =
            serde_json::from_str(r#"{"personal_info":{"name":"A","city":"Lyon"}}"#).unwrap();
        assert_eq!(profile.personal_info.location.as_deref(), Some("Lyon"));
    }
}
