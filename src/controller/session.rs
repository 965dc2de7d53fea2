// src/controller/session.rs
use super::JobsController;
use crate::core::service_client::CollaboratorApi;
use crate::matching::JobMatchingEngine;
use crate::scraping::JobScrapingService;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// One controller per client session, created on first use
pub struct SessionManager {
    scraper: Arc<JobScrapingService>,
    engine: Arc<JobMatchingEngine>,
    collaborator: Arc<dyn CollaboratorApi>,
    default_country: String,
    sessions: RwLock<HashMap<String, Arc<JobsController>>>,
}

impl SessionManager {
    pub fn new(
        scraper: Arc<JobScrapingService>,
        engine: Arc<JobMatchingEngine>,
        collaborator: Arc<dyn CollaboratorApi>,
        default_country: &str,
    ) -> Self {
        Self {
            scraper,
            engine,
            collaborator,
            default_country: default_country.to_lowercase(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn scraper(&self) -> &JobScrapingService {
        &self.scraper
    }

    pub async fn session(&self, id: &str) -> Arc<JobsController> {
        if let Some(controller) = self.sessions.read().await.get(id) {
            return controller.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                info!("Creating search session {}", id);
                Arc::new(JobsController::new(
                    self.scraper.clone(),
                    self.engine.clone(),
                    self.collaborator.clone(),
                    &self.default_country,
                ))
            })
            .clone()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service_client::ServiceClient;
    use crate::matching::{DisabledInference, MatchingConfig};

    fn manager() -> SessionManager {
        let engine = JobMatchingEngine::new(Arc::new(DisabledInference), MatchingConfig::default());
        let collaborator = ServiceClient::new("http://127.0.0.1:9", 1).unwrap();
        SessionManager::new(
            Arc::new(JobScrapingService::new(5)),
            Arc::new(engine),
            Arc::new(collaborator),
            "France",
        )
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_and_reused() {
        let manager = manager();
        let a = manager.session("a").await;
        let again = manager.session("a").await;
        let b = manager.session("b").await;

        assert!(Arc::ptr_eq(&a, &again));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(manager.session_count().await, 2);

        a.set_country("uk").await;
        assert_eq!(a.country().await, "uk");
        assert_eq!(b.country().await, "france");
    }
}
