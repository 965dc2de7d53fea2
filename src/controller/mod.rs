// src/controller/mod.rs
//! Per-session search state: country, filters, current listings, cached match scores

pub mod mock;
pub mod session;

pub use mock::{mock_listings, MOCK_SOURCE};
pub use session::SessionManager;

use crate::core::service_client::CollaboratorApi;
use crate::matching::{personalized_recommendations, JobMatchingEngine};
use crate::scraping::{filter_jobs, JobScrapingService};
use crate::types::{
    CandidateProfile, JobListing, JobMatchScore, JobSearchFilters, JobStats,
    PersonalizedRecommendation, RemoteWork,
};
use anyhow::{Context, Result};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Scored,
    Fallback,
}

#[derive(Debug, Clone, Default)]
struct ControllerState {
    country: String,
    filters: JobSearchFilters,
    jobs: Vec<JobListing>,
    matches: HashMap<String, JobMatchScore>,
    favorites: HashSet<String>,
    profile: Option<CandidateProfile>,
    // Bumped on every profile change so scores computed against an older one are dropped
    profile_version: u64,
    phase: SearchPhase,
}

/// What a client renders after any controller operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    pub country: String,
    pub phase: SearchPhase,
    pub filters: JobSearchFilters,
    pub has_profile: bool,
    pub total: usize,
    pub jobs: Vec<JobListing>,
}

impl ControllerState {
    fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            country: self.country.clone(),
            phase: self.phase,
            filters: self.filters.clone(),
            has_profile: self.profile.is_some(),
            total: self.jobs.len(),
            jobs: self.jobs.clone(),
        }
    }
}

pub struct JobsController {
    scraper: Arc<JobScrapingService>,
    engine: Arc<JobMatchingEngine>,
    collaborator: Arc<dyn CollaboratorApi>,
    state: RwLock<ControllerState>,
    search_token: AtomicU64,
}

impl JobsController {
    pub fn new(
        scraper: Arc<JobScrapingService>,
        engine: Arc<JobMatchingEngine>,
        collaborator: Arc<dyn CollaboratorApi>,
        country: &str,
    ) -> Self {
        Self {
            scraper,
            engine,
            collaborator,
            state: RwLock::new(ControllerState {
                country: country.to_lowercase(),
                ..Default::default()
            }),
            search_token: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn jobs(&self) -> Vec<JobListing> {
        self.state.read().await.jobs.clone()
    }

    pub async fn phase(&self) -> SearchPhase {
        self.state.read().await.phase
    }

    pub async fn country(&self) -> String {
        self.state.read().await.country.clone()
    }

    pub async fn filters(&self) -> JobSearchFilters {
        self.state.read().await.filters.clone()
    }

    pub async fn profile(&self) -> Option<CandidateProfile> {
        self.state.read().await.profile.clone()
    }

    /// Replaces the filters used by the next search; current listings are untouched
    pub async fn update_filters(&self, filters: JobSearchFilters) {
        let mut state = self.state.write().await;
        debug!("Filters updated for {}: {:?}", state.country, filters);
        state.filters = filters;
    }

    /// Switches country and drops everything derived from the previous one,
    /// including any search still in flight.
    pub async fn set_country(&self, country: &str) {
        self.search_token.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        let next = ControllerState {
            country: country.to_lowercase(),
            filters: state.filters.clone(),
            favorites: state.favorites.clone(),
            profile: state.profile.clone(),
            profile_version: state.profile_version,
            ..Default::default()
        };
        *state = next;
        info!("Country set to {}", state.country);
    }

    /// Runs a search for the current country and filters. Only the most recent
    /// search publishes its results; older ones finish silently.
    pub async fn search_jobs(&self) -> SearchSnapshot {
        let token = self.search_token.fetch_add(1, Ordering::SeqCst) + 1;
        let (country, filters, profile, profile_version) = {
            let mut state = self.state.write().await;
            state.phase = SearchPhase::Searching;
            (
                state.country.clone(),
                state.filters.clone(),
                state.profile.clone(),
                state.profile_version,
            )
        };

        let (jobs, matches, phase) = match self.scraper.scrape_jobs(&country, &filters).await {
            Ok(jobs) => {
                let jobs = filter_jobs(jobs, &filters);
                match &profile {
                    Some(profile) => {
                        let (jobs, matches) = self.score_all(profile, jobs).await;
                        (jobs, matches, SearchPhase::Scored)
                    }
                    None => (jobs, HashMap::new(), SearchPhase::Scored),
                }
            }
            Err(e) => {
                error!(
                    "Search for {} failed, showing sample listings: {:#}",
                    country, e
                );
                (
                    mock_listings(&country, &filters),
                    HashMap::new(),
                    SearchPhase::Fallback,
                )
            }
        };

        let mut state = self.state.write().await;
        if self.search_token.load(Ordering::SeqCst) != token {
            debug!("Discarding results of superseded search {}", token);
            return state.snapshot();
        }

        let mut jobs = jobs;
        let matches = if state.profile_version == profile_version {
            matches
        } else {
            for job in &mut jobs {
                job.match_score = None;
            }
            HashMap::new()
        };
        for job in &mut jobs {
            job.is_favorite = state.favorites.contains(&job.id);
        }

        info!(
            "Search for {} finished with {} jobs ({:?})",
            country,
            jobs.len(),
            phase
        );
        let next = ControllerState {
            jobs,
            matches,
            phase,
            ..state.clone()
        };
        *state = next;
        state.snapshot()
    }

    async fn score_all(
        &self,
        profile: &CandidateProfile,
        mut jobs: Vec<JobListing>,
    ) -> (Vec<JobListing>, HashMap<String, JobMatchScore>) {
        let scores = join_all(
            jobs.iter()
                .map(|job| self.engine.calculate_job_match(profile, job)),
        )
        .await;

        let mut matches = HashMap::with_capacity(scores.len());
        for (job, score) in jobs.iter_mut().zip(scores) {
            job.match_score = Some(score.overall_score);
            matches.insert(job.id.clone(), score);
        }
        // Stable, so equal scores keep merge order
        jobs.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        (jobs, matches)
    }

    /// Flips the flag locally and returns the new value. Adding a favorite is
    /// persisted in the background; failures there are only logged.
    pub async fn toggle_favorite(&self, job_id: &str, token: Option<String>) -> Result<bool> {
        let is_favorite = {
            let mut state = self.state.write().await;
            let job = state
                .jobs
                .iter_mut()
                .find(|j| j.id == job_id)
                .with_context(|| format!("Job not found: {}", job_id))?;
            job.is_favorite = !job.is_favorite;
            let is_favorite = job.is_favorite;
            if is_favorite {
                state.favorites.insert(job_id.to_string());
            } else {
                state.favorites.remove(job_id);
            }
            is_favorite
        };

        if is_favorite {
            let collaborator = self.collaborator.clone();
            let job_id = job_id.to_string();
            tokio::spawn(async move {
                if let Err(e) = collaborator.save_favorite(token.as_deref(), &job_id).await {
                    warn!("Failed to persist favorite {}: {:#}", job_id, e);
                }
            });
        }
        Ok(is_favorite)
    }

    /// Lazily scores one listing against the loaded profile; memoized per job
    pub async fn evaluate_job_match(&self, job_id: &str) -> Result<JobMatchScore> {
        let (job, profile, profile_version) = {
            let state = self.state.read().await;
            if let Some(score) = state.matches.get(job_id) {
                return Ok(score.clone());
            }
            let job = state
                .jobs
                .iter()
                .find(|j| j.id == job_id)
                .cloned()
                .with_context(|| format!("Job not found: {}", job_id))?;
            let profile = state
                .profile
                .clone()
                .context("No candidate profile loaded")?;
            (job, profile, state.profile_version)
        };

        let score = self.engine.calculate_job_match(&profile, &job).await;

        let mut state = self.state.write().await;
        if state.profile_version == profile_version {
            if let Some(listing) = state.jobs.iter_mut().find(|j| j.id == job_id) {
                listing.match_score = Some(score.overall_score);
            }
            state.matches.insert(job_id.to_string(), score.clone());
        }
        Ok(score)
    }

    /// Installs a profile; scores computed for the previous one are discarded
    pub async fn set_profile(&self, profile: CandidateProfile) {
        let mut state = self.state.write().await;
        info!(
            "Candidate profile set: {} ({} skills)",
            profile.personal_info.name,
            profile.skill_list().len()
        );
        state.profile = Some(profile);
        state.profile_version += 1;
        state.matches.clear();
        for job in &mut state.jobs {
            job.match_score = None;
        }
    }

    pub async fn load_profile(&self, token: Option<&str>) -> Result<CandidateProfile> {
        let profile = self
            .collaborator
            .fetch_candidate_profile(token)
            .await
            .context("Failed to load candidate profile")?;
        self.set_profile(profile.clone()).await;
        Ok(profile)
    }

    /// Adds an externally imported listing at the top; false when already present
    pub async fn add_job(&self, job: JobListing) -> bool {
        let mut state = self.state.write().await;
        let key = job.dedup_key();
        if state.jobs.iter().any(|j| j.dedup_key() == key) {
            return false;
        }
        state.jobs.insert(0, job);
        true
    }

    pub async fn stats(&self) -> JobStats {
        let state = self.state.read().await;
        compute_stats(&state.jobs, &state.matches)
    }

    pub async fn recommendations(&self) -> Vec<PersonalizedRecommendation> {
        let state = self.state.read().await;
        personalized_recommendations(&state.jobs, &state.matches)
    }
}

fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key.to_string(), 1)),
        }
    }
    counts
}

pub fn compute_stats(jobs: &[JobListing], matches: &HashMap<String, JobMatchScore>) -> JobStats {
    let scores: Vec<u8> = jobs
        .iter()
        .filter_map(|j| matches.get(&j.id).map(|m| m.overall_score))
        .collect();
    let average_match_score = if scores.is_empty() {
        None
    } else {
        let sum: u32 = scores.iter().map(|s| *s as u32).sum();
        Some((sum as f64 / scores.len() as f64).round() as u8)
    };

    JobStats {
        total_jobs: jobs.len(),
        scored_jobs: scores.len(),
        average_match_score,
        favorites: jobs.iter().filter(|j| j.is_favorite).count(),
        remote_jobs: jobs.iter().filter(|j| j.remote == RemoteWork::Full).count(),
        hybrid_jobs: jobs.iter().filter(|j| j.remote == RemoteWork::Hybrid).count(),
        jobs_with_salary: jobs.iter().filter(|j| j.salary.is_some()).count(),
        by_source: count_by(jobs.iter().map(|j| j.source.as_str())),
        by_contract_type: count_by(jobs.iter().map(|j| j.contract_type.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{DisabledInference, MatchingConfig};
    use crate::scraping::{JobSource, ScrapeFilters};
    use crate::types::{ContractType, ExperienceLevel, Experience, Skills};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    fn listing(id: &str, title: &str, description: &str) -> JobListing {
        JobListing {
            id: id.to_string(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Paris".to_string(),
            description: description.to_string(),
            salary: None,
            contract_type: ContractType::FullTime,
            experience_level: ExperienceLevel::Entry,
            remote: RemoteWork::No,
            url: String::new(),
            source: "static".to_string(),
            posted_date: Utc::now(),
            match_score: None,
            is_favorite: false,
        }
    }

    struct StaticSource(Vec<JobListing>);

    #[async_trait]
    impl JobSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn scrape(&self, _filters: &ScrapeFilters) -> Result<Vec<JobListing>> {
            Ok(self.0.clone())
        }
    }

    /// First call is slow and returns "old", later calls return "new" at once
    struct RacingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl JobSource for RacingSource {
        fn name(&self) -> &str {
            "racing"
        }

        async fn scrape(&self, _filters: &ScrapeFilters) -> Result<Vec<JobListing>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(vec![listing("old", "Old", "")])
            } else {
                Ok(vec![listing("new", "New", "")])
            }
        }
    }

    #[derive(Default)]
    struct RecordingCollaborator {
        favorites: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CollaboratorApi for RecordingCollaborator {
        async fn fetch_candidate_profile(&self, _token: Option<&str>) -> Result<CandidateProfile> {
            Ok(profile())
        }

        async fn save_favorite(&self, _token: Option<&str>, job_id: &str) -> Result<()> {
            self.favorites.lock().unwrap().push(job_id.to_string());
            Ok(())
        }
    }

    fn profile() -> CandidateProfile {
        CandidateProfile {
            skills: Skills {
                programming_languages: vec!["Rust".to_string()],
                ..Default::default()
            },
            work_experience: vec![Experience {
                company: "Initech".to_string(),
                title: "Developer".to_string(),
                start_date: "2020-01".to_string(),
                end_date: None,
                description: None,
                technologies: None,
            }],
            ..Default::default()
        }
    }

    fn controller_with(
        sources: Vec<Arc<dyn JobSource>>,
        collaborator: Arc<dyn CollaboratorApi>,
    ) -> JobsController {
        let mut scraper = JobScrapingService::new(10);
        scraper.add_country("france");
        for source in sources {
            scraper.register("france", source);
        }
        let engine = JobMatchingEngine::new(Arc::new(DisabledInference), MatchingConfig::default());
        JobsController::new(Arc::new(scraper), Arc::new(engine), collaborator, "france")
    }

    fn controller(jobs: Vec<JobListing>) -> JobsController {
        controller_with(
            vec![Arc::new(StaticSource(jobs))],
            Arc::new(RecordingCollaborator::default()),
        )
    }

    #[tokio::test]
    async fn test_search_without_profile_is_unscored() {
        let ctrl = controller(vec![listing("1", "Dev", "Rust")]);
        assert_eq!(ctrl.phase().await, SearchPhase::Idle);

        let snapshot = ctrl.search_jobs().await;
        assert_eq!(snapshot.phase, SearchPhase::Scored);
        assert_eq!(snapshot.total, 1);
        assert_eq!(snapshot.jobs[0].match_score, None);
    }

    #[tokio::test]
    async fn test_search_with_profile_sorts_by_score() {
        let ctrl = controller(vec![
            listing("weak", "Accountant", "Java and PHP"),
            listing("strong", "Rust Developer", "Rust"),
        ]);
        ctrl.set_profile(profile()).await;

        let snapshot = ctrl.search_jobs().await;
        let ids: Vec<&str> = snapshot.jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["strong", "weak"]);
        assert!(snapshot.jobs.iter().all(|j| j.match_score.is_some()));

        let stats = ctrl.stats().await;
        assert_eq!(stats.scored_jobs, 2);
        assert!(stats.average_match_score.is_some());
    }

    #[tokio::test]
    async fn test_unknown_country_falls_back_to_mock_data() {
        let ctrl = controller(vec![]);
        ctrl.set_country("atlantis").await;

        let snapshot = ctrl.search_jobs().await;
        assert_eq!(snapshot.phase, SearchPhase::Fallback);
        assert!(!snapshot.jobs.is_empty());
        assert!(snapshot.jobs.iter().all(|j| j.source == MOCK_SOURCE));
    }

    #[tokio::test]
    async fn test_latest_search_wins() {
        let ctrl = controller_with(
            vec![Arc::new(RacingSource {
                calls: AtomicUsize::new(0),
            })],
            Arc::new(RecordingCollaborator::default()),
        );

        let (first, second) = tokio::join!(ctrl.search_jobs(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            ctrl.search_jobs().await
        });

        assert_eq!(second.jobs[0].id, "new");
        // The slow search finished last but must not overwrite the newer results
        assert_eq!(first.jobs[0].id, "new");
        assert_eq!(ctrl.jobs().await[0].id, "new");
    }

    #[tokio::test]
    async fn test_set_country_resets_state() {
        let ctrl = controller(vec![listing("1", "Dev", "")]);
        ctrl.search_jobs().await;
        ctrl.set_country("Morocco").await;

        let snapshot = ctrl.snapshot().await;
        assert_eq!(snapshot.country, "morocco");
        assert_eq!(snapshot.phase, SearchPhase::Idle);
        assert!(snapshot.jobs.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_favorite_persists_additions_only() {
        let collaborator = Arc::new(RecordingCollaborator::default());
        let ctrl = controller_with(
            vec![Arc::new(StaticSource(vec![listing("1", "Dev", "")]))],
            collaborator.clone(),
        );
        ctrl.search_jobs().await;

        assert!(ctrl.toggle_favorite("1", None).await.unwrap());
        assert!(!ctrl.toggle_favorite("1", None).await.unwrap());
        assert!(ctrl.toggle_favorite("missing", None).await.is_err());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*collaborator.favorites.lock().unwrap(), vec!["1".to_string()]);
    }

    #[tokio::test]
    async fn test_evaluate_job_match_is_memoized() {
        let ctrl = controller(vec![listing("1", "Rust Developer", "Rust")]);
        ctrl.search_jobs().await;
        assert!(ctrl.evaluate_job_match("1").await.is_err());

        ctrl.load_profile(None).await.unwrap();
        let first = ctrl.evaluate_job_match("1").await.unwrap();
        let second = ctrl.evaluate_job_match("1").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(ctrl.jobs().await[0].match_score, Some(first.overall_score));
    }

    #[tokio::test]
    async fn test_add_job_rejects_duplicates() {
        let ctrl = controller(vec![listing("1", "Dev", "")]);
        ctrl.search_jobs().await;

        assert!(!ctrl.add_job(listing("2", "DEV", "")).await);
        assert!(ctrl.add_job(listing("3", "Ops", "")).await);
        assert_eq!(ctrl.jobs().await[0].id, "3");
    }

    #[test]
    fn test_compute_stats_counts() {
        let mut remote = listing("2", "Ops", "");
        remote.remote = RemoteWork::Full;
        remote.source = "indeed".to_string();
        remote.salary = Some("40k".to_string());
        let jobs = vec![listing("1", "Dev", ""), remote];

        let stats = compute_stats(&jobs, &HashMap::new());
        assert_eq!(stats.total_jobs, 2);
        assert_eq!(stats.remote_jobs, 1);
        assert_eq!(stats.jobs_with_salary, 1);
        assert_eq!(stats.average_match_score, None);
        assert_eq!(
            stats.by_source,
            vec![("static".to_string(), 1), ("indeed".to_string(), 1)]
        );
    }
}
