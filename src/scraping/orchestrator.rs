// src/scraping/orchestrator.rs
use super::{
    AfricanJobsScraper, IndeedScraper, JobSource, LinkedInScraper, OfficialApiSource,
    ScrapeFilters, ScraperKind, ScrapingProxy, SourceRegistry,
};
use crate::classifier::JobClassifier;
use crate::types::{JobListing, JobSearchFilters};
use anyhow::Result;
use futures::future::join_all;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fans a search out to every source registered for a country
pub struct JobScrapingService {
    sources: HashMap<String, Vec<Arc<dyn JobSource>>>,
    results_per_source: u32,
}

impl JobScrapingService {
    pub fn new(results_per_source: u32) -> Self {
        Self {
            sources: HashMap::new(),
            results_per_source,
        }
    }

    /// Register a source for a country. Merge order follows registration order.
    pub fn register(&mut self, country: &str, source: Arc<dyn JobSource>) {
        self.sources
            .entry(country.to_lowercase())
            .or_default()
            .push(source);
    }

    /// Declare a country with no sources yet, so searches for it succeed empty
    pub fn add_country(&mut self, country: &str) {
        self.sources.entry(country.to_lowercase()).or_default();
    }

    /// Builds every enabled source once. Official APIs without credentials are skipped.
    pub fn from_registry(
        registry: &SourceRegistry,
        client: Client,
        proxy: ScrapingProxy,
        classifier: Arc<dyn JobClassifier>,
        results_per_source: u32,
    ) -> Self {
        let mut service = Self::new(results_per_source);

        for (key, country) in &registry.countries {
            service.add_country(key);

            for api in country.apis.iter().filter(|a| a.enabled) {
                if !api.has_credentials() {
                    warn!("{} for {} has no credentials, skipping", api.name, key);
                    continue;
                }
                let source = OfficialApiSource::new(
                    client.clone(),
                    api.name.clone(),
                    api.endpoint.clone(),
                    country.country_code.clone(),
                    country.currency.clone(),
                    api.app_id.clone().unwrap_or_default(),
                    api.app_key.clone().unwrap_or_default(),
                    classifier.clone(),
                );
                service.register(key, Arc::new(source));
            }

            for target in country.scrapers.iter().filter(|t| t.enabled) {
                let source: Arc<dyn JobSource> = match (target.kind, target.site.as_deref()) {
                    (ScraperKind::Indeed, _) => Arc::new(IndeedScraper::new(
                        proxy.clone(),
                        key.clone(),
                        classifier.clone(),
                    )),
                    (ScraperKind::Linkedin, _) => Arc::new(LinkedInScraper::new(
                        proxy.clone(),
                        key.clone(),
                        classifier.clone(),
                    )),
                    (ScraperKind::African, Some(site)) => Arc::new(AfricanJobsScraper::new(
                        proxy.clone(),
                        key.clone(),
                        site,
                        classifier.clone(),
                    )),
                    (ScraperKind::African, None) => {
                        warn!("Regional scraper for {} has no site, skipping", key);
                        continue;
                    }
                };
                service.register(key, source);
            }

            debug!(
                "{}: {} sources registered",
                key,
                service.sources.get(key).map(Vec::len).unwrap_or(0)
            );
        }

        service
    }

    pub fn countries(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.sources.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn supports_country(&self, country: &str) -> bool {
        self.sources.contains_key(&country.to_lowercase())
    }

    pub fn source_names(&self, country: &str) -> Vec<String> {
        self.sources
            .get(&country.to_lowercase())
            .map(|sources| sources.iter().map(|s| s.name().to_string()).collect())
            .unwrap_or_default()
    }

    /// Queries every source concurrently and waits for all of them. A failing source
    /// contributes nothing; only an unknown country is an error.
    pub async fn scrape_jobs(
        &self,
        country: &str,
        filters: &JobSearchFilters,
    ) -> Result<Vec<JobListing>> {
        let sources = self
            .sources
            .get(&country.to_lowercase())
            .ok_or_else(|| anyhow::anyhow!("Unsupported country: {}", country))?;

        let scrape_filters = ScrapeFilters::from_search(filters, self.results_per_source);

        info!(
            "Scraping {} sources for {} (query: {:?})",
            sources.len(),
            country,
            scrape_filters.query
        );

        let results = join_all(sources.iter().map(|source| {
            let scrape_filters = &scrape_filters;
            async move {
                match source.scrape(scrape_filters).await {
                    Ok(jobs) => {
                        debug!("{} returned {} jobs", source.name(), jobs.len());
                        jobs
                    }
                    Err(e) => {
                        warn!("Source {} failed: {:#}", source.name(), e);
                        Vec::new()
                    }
                }
            }
        }))
        .await;

        let merged: Vec<JobListing> = results.into_iter().flatten().collect();
        let total = merged.len();
        let unique = deduplicate_jobs(merged);

        info!(
            "{}: {} jobs collected, {} after deduplication",
            country,
            total,
            unique.len()
        );
        Ok(unique)
    }
}

/// Keeps the first listing for each lowercase title+company pair, preserving order
pub fn deduplicate_jobs(jobs: Vec<JobListing>) -> Vec<JobListing> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(job.dedup_key()))
        .collect()
}

pub fn filter_jobs(jobs: Vec<JobListing>, filters: &JobSearchFilters) -> Vec<JobListing> {
    jobs.into_iter().filter(|job| filters.accepts(job)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContractType, ExperienceLevel, RemoteWork};
    use async_trait::async_trait;
    use chrono::Utc;

    fn listing(id: &str, title: &str, company: &str) -> JobListing {
        JobListing {
            id: id.to_string(),
            title: title.to_string(),
            company: company.to_string(),
            location: "Paris".to_string(),
            description: String::new(),
            salary: None,
            contract_type: ContractType::FullTime,
            experience_level: ExperienceLevel::Intermediate,
            remote: RemoteWork::No,
            url: String::new(),
            source: "test".to_string(),
            posted_date: Utc::now(),
            match_score: None,
            is_favorite: false,
        }
    }

    struct StaticSource {
        name: String,
        jobs: Vec<JobListing>,
    }

    #[async_trait]
    impl JobSource for StaticSource {
        fn name(&self) -> &str {
            &self.name
        }

        async fn scrape(&self, _filters: &ScrapeFilters) -> Result<Vec<JobListing>> {
            Ok(self.jobs.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl JobSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn scrape(&self, _filters: &ScrapeFilters) -> Result<Vec<JobListing>> {
            anyhow::bail!("upstream returned 503")
        }
    }

    struct SlowSource {
        jobs: Vec<JobListing>,
    }

    #[async_trait]
    impl JobSource for SlowSource {
        fn name(&self) -> &str {
            "slow"
        }

        async fn scrape(&self, _filters: &ScrapeFilters) -> Result<Vec<JobListing>> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok(self.jobs.clone())
        }
    }

    #[test]
    fn test_deduplicate_case_insensitive_first_wins() {
        let jobs = vec![
            listing("1", "Dev", "Acme"),
            listing("2", "DEV", "acme"),
            listing("3", "Dev", "Globex"),
        ];
        let unique = deduplicate_jobs(jobs);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].id, "1");
        assert_eq!(unique[1].id, "3");
    }

    #[test]
    fn test_deduplicate_is_idempotent() {
        let jobs = vec![
            listing("1", "Dev", "Acme"),
            listing("2", "dev", "ACME"),
            listing("3", "Ops", "Acme"),
            listing("4", "ops", "acme"),
        ];
        let once = deduplicate_jobs(jobs);
        let twice = deduplicate_jobs(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_with_empty_arrays_is_identity() {
        let mut remote = listing("2", "Ops", "Acme");
        remote.remote = RemoteWork::Full;
        remote.contract_type = ContractType::Freelance;
        let jobs = vec![listing("1", "Dev", "Acme"), remote];

        let filters = JobSearchFilters {
            query: "anything".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_jobs(jobs.clone(), &filters), jobs);
    }

    #[test]
    fn test_filter_membership() {
        let mut remote = listing("2", "Ops", "Acme");
        remote.remote = RemoteWork::Full;
        let jobs = vec![listing("1", "Dev", "Acme"), remote];

        let filters = JobSearchFilters {
            remote: vec![RemoteWork::Full, RemoteWork::Hybrid],
            ..Default::default()
        };
        let filtered = filter_jobs(jobs, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "2");
    }

    #[tokio::test]
    async fn test_failing_source_is_isolated() {
        let mut service = JobScrapingService::new(10);
        service.register("france", Arc::new(FailingSource));
        service.register(
            "france",
            Arc::new(StaticSource {
                name: "static".to_string(),
                jobs: vec![
                    listing("a", "Dev", "Acme"),
                    listing("b", "Ops", "Acme"),
                    listing("c", "Data", "Acme"),
                ],
            }),
        );

        let jobs = service
            .scrape_jobs("france", &JobSearchFilters::default())
            .await
            .unwrap();
        let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_merge_follows_registration_order_and_dedupes_across_sources() {
        let mut service = JobScrapingService::new(10);
        service.register(
            "uk",
            Arc::new(SlowSource {
                jobs: vec![listing("slow-1", "Dev", "Acme")],
            }),
        );
        service.register(
            "uk",
            Arc::new(StaticSource {
                name: "fast".to_string(),
                jobs: vec![listing("fast-1", "DEV", "acme"), listing("fast-2", "QA", "Initech")],
            }),
        );

        let jobs = service
            .scrape_jobs("UK", &JobSearchFilters::default())
            .await
            .unwrap();
        let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["slow-1", "fast-2"]);
    }

    #[tokio::test]
    async fn test_unknown_country_is_an_error() {
        let service = JobScrapingService::new(10);
        assert!(service
            .scrape_jobs("atlantis", &JobSearchFilters::default())
            .await
            .is_err());
    }

    #[test]
    fn test_from_registry_skips_apis_without_credentials() {
        let registry = SourceRegistry::default();
        let client = Client::new();
        let proxy = ScrapingProxy::new(client.clone(), "http://localhost:3000");
        let service = JobScrapingService::from_registry(
            &registry,
            client,
            proxy,
            Arc::new(crate::classifier::KeywordClassifier),
            10,
        );

        let morocco = service.source_names("morocco");
        assert_eq!(
            morocco,
            vec!["indeed/morocco", "linkedin/morocco", "rekrute/morocco", "emploi-ma/morocco"]
        );
        assert_eq!(service.countries().len(), registry.countries.len());
    }
}
