// src/matching/engine.rs
use super::inference::InferenceBackend;
use super::location::location_match;
use super::recommendations::{generic_recommendations, score_recommendations};
use super::skills::{extract_vocabulary_skills, partition_skills};
use super::weights::MatchingConfig;
use crate::types::{CandidateProfile, JobListing, JobMatchScore, MatchBreakdown, RemoteWork};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

const NEUTRAL: f64 = 0.5;

/// Scores one candidate against one listing. Stateless; callers cache results.
pub struct JobMatchingEngine {
    inference: Arc<dyn InferenceBackend>,
    config: MatchingConfig,
}

/// Sub-scores in [0, 1] before weighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub skills: f64,
    pub experience: f64,
    pub semantic: f64,
    pub location: f64,
    pub salary: f64,
    pub remote: f64,
}

fn to_percent(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 100.0).round() as u8
}

pub fn experience_ratio_score(years: f64, required: f64) -> f64 {
    if required <= 0.0 {
        return 1.0;
    }
    let ratio = years / required;
    if ratio >= 1.0 {
        1.0
    } else if ratio >= 0.7 {
        0.8
    } else if ratio >= 0.5 {
        0.6
    } else {
        0.3
    }
}

pub fn salary_score(job: &JobListing) -> f64 {
    if job.salary.is_some() {
        0.7
    } else {
        0.5
    }
}

// No candidate preference exists yet, so this is a fixed lookup
pub fn remote_preference_score(remote: RemoteWork) -> f64 {
    match remote {
        RemoteWork::Full => 0.8,
        RemoteWork::Hybrid => 0.9,
        RemoteWork::No => 0.7,
    }
}

impl JobMatchingEngine {
    pub fn new(inference: Arc<dyn InferenceBackend>, config: MatchingConfig) -> Self {
        Self { inference, config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Never fails: remote errors degrade individual sub-scores, local errors
    /// degrade to the placeholder score.
    pub async fn calculate_job_match(
        &self,
        profile: &CandidateProfile,
        job: &JobListing,
    ) -> JobMatchScore {
        self.calculate_job_match_at(profile, job, Utc::now()).await
    }

    pub async fn calculate_job_match_at(
        &self,
        profile: &CandidateProfile,
        job: &JobListing,
        now: DateTime<Utc>,
    ) -> JobMatchScore {
        match self.compute(profile, job, now).await {
            Ok(score) => score,
            Err(e) => {
                warn!("Match computation failed for job {}: {:#}", job.id, e);
                self.placeholder(&job.id)
            }
        }
    }

    pub fn placeholder(&self, job_id: &str) -> JobMatchScore {
        let value = self.config.placeholder_score;
        JobMatchScore {
            job_id: job_id.to_string(),
            overall_score: value,
            breakdown: MatchBreakdown {
                skills_match: value,
                experience_match: value,
                location_match: value,
                salary_match: value,
                remote_pref_match: value,
            },
            recommendations: generic_recommendations(),
            missing_skills: Vec::new(),
        }
    }

    /// NER first; the fixed vocabulary scan when the call fails or finds nothing
    pub async fn extract_job_skills(&self, job: &JobListing) -> Vec<String> {
        let text = format!("{}\n{}", job.title, job.description);
        match self.inference.extract_skills(&text).await {
            Ok(skills) if !skills.is_empty() => skills,
            Ok(_) => {
                debug!("No entities for job {}, using vocabulary scan", job.id);
                extract_vocabulary_skills(&text, &self.config.skill_vocabulary)
            }
            Err(e) => {
                debug!("Skill extraction failed for job {}: {}", job.id, e);
                extract_vocabulary_skills(&text, &self.config.skill_vocabulary)
            }
        }
    }

    async fn semantic_similarity(&self, profile: &CandidateProfile, job: &JobListing) -> f64 {
        let job_text = format!("{}. {}", job.title, job.description);
        match self
            .inference
            .similarity(&profile.summary_text(), &job_text)
            .await
        {
            Ok(score) if score.is_finite() => score.clamp(0.0, 1.0),
            Ok(_) => NEUTRAL,
            Err(e) => {
                debug!("Similarity failed for job {}: {}", job.id, e);
                NEUTRAL
            }
        }
    }

    async fn compute(
        &self,
        profile: &CandidateProfile,
        job: &JobListing,
        now: DateTime<Utc>,
    ) -> Result<JobMatchScore> {
        let years = profile.total_experience_years(now)?;
        let required = self
            .config
            .required_years
            .for_level(job.experience_level);

        let (job_skills, semantic) =
            futures::join!(self.extract_job_skills(job), self.semantic_similarity(profile, job));

        let candidate_skills = profile.skill_list();
        let (matched, missing) =
            partition_skills(&job_skills, &candidate_skills, self.config.fuzzy_threshold);
        let skills = if job_skills.is_empty() {
            NEUTRAL
        } else {
            matched.len() as f64 / job_skills.len() as f64
        };

        let sub = SubScores {
            skills,
            experience: experience_ratio_score(years, required),
            semantic,
            location: location_match(
                profile.personal_info.location.as_deref(),
                &job.location,
                job.remote,
            ),
            salary: salary_score(job),
            remote: remote_preference_score(job.remote),
        };

        let overall = self.weighted_score(&sub);
        debug!(
            "Job {} scored {} ({:.0} yrs vs {} required, {}/{} skills)",
            job.id,
            overall,
            years,
            required,
            matched.len(),
            job_skills.len()
        );

        Ok(JobMatchScore {
            job_id: job.id.clone(),
            overall_score: overall,
            breakdown: MatchBreakdown {
                skills_match: to_percent(sub.skills),
                experience_match: to_percent(sub.experience),
                location_match: to_percent(sub.location),
                salary_match: to_percent(sub.salary),
                remote_pref_match: to_percent(sub.remote),
            },
            recommendations: score_recommendations(overall),
            missing_skills: missing,
        })
    }

    pub fn weighted_score(&self, sub: &SubScores) -> u8 {
        let w = &self.config.weights;
        let total = w.skills * sub.skills
            + w.experience * sub.experience
            + w.semantic * sub.semantic
            + w.location * sub.location
            + w.salary * sub.salary
            + w.remote * sub.remote;
        to_percent(total)
    }
}
