//! HTTP API smoke tests through rocket's local client

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use job_matcher::classifier::KeywordClassifier;
use job_matcher::controller::SessionManager;
use job_matcher::core::ServiceClient;
use job_matcher::matching::{DisabledInference, JobMatchingEngine, MatchingConfig};
use job_matcher::scraping::{JobPageScraper, JobScrapingService, JobSource, ScrapeFilters, SourceRegistry};
use job_matcher::types::{ContractType, ExperienceLevel, JobListing, RemoteWork};
use job_matcher::web::{build_rocket, ServerState};
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StaticSource;

fn listing(id: &str, title: &str, description: &str, remote: RemoteWork) -> JobListing {
    JobListing {
        id: id.to_string(),
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Lyon".to_string(),
        description: description.to_string(),
        salary: None,
        contract_type: ContractType::FullTime,
        experience_level: ExperienceLevel::Entry,
        remote,
        url: String::new(),
        source: "static".to_string(),
        posted_date: Utc::now(),
        match_score: None,
        is_favorite: false,
    }
}

#[async_trait]
impl JobSource for StaticSource {
    fn name(&self) -> &str {
        "static/france"
    }

    async fn scrape(&self, _filters: &ScrapeFilters) -> Result<Vec<JobListing>> {
        Ok(vec![
            listing("a", "Rust Developer", "Rust and Docker", RemoteWork::Hybrid),
            listing("b", "PHP Developer", "PHP and Laravel", RemoteWork::No),
        ])
    }
}

async fn client() -> Client {
    let mut scraper = JobScrapingService::new(10);
    scraper.register("france", Arc::new(StaticSource));

    let engine = JobMatchingEngine::new(Arc::new(DisabledInference), MatchingConfig::default());
    // Nothing listens here; favorites are persisted in the background and only logged on failure
    let collaborator = ServiceClient::new("http://127.0.0.1:9", 1).unwrap();

    let state = ServerState {
        sessions: SessionManager::new(
            Arc::new(scraper),
            Arc::new(engine),
            Arc::new(collaborator),
            "france",
        ),
        registry: SourceRegistry::default(),
        importer: JobPageScraper::new(5, Arc::new(KeywordClassifier)).unwrap(),
    };
    Client::tracked(build_rocket(state)).await.unwrap()
}

fn session(id: &str) -> Header<'static> {
    Header::new("X-Session-Id", id.to_string())
}

#[tokio::test]
async fn test_health_and_countries() {
    let client = client().await;

    let response = client.get("/api/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["type"], "text");
    assert_eq!(body["success"], true);

    let response = client.get("/api/countries").dispatch().await;
    let body: Value = response.into_json().await.unwrap();
    let countries = body["data"].as_array().unwrap();
    let france = countries.iter().find(|c| c["key"] == "france").unwrap();
    assert_eq!(france["currency"], "EUR");
    assert_eq!(france["sources"], json!(["static/france"]));
}

#[tokio::test]
async fn test_unsupported_country_is_rejected() {
    let client = client().await;
    let response = client
        .post("/api/jobs/country")
        .header(ContentType::JSON)
        .json(&json!({ "country": "atlantis" }))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "UNSUPPORTED_COUNTRY");
    assert_eq!(body["type"], "error");
}

#[tokio::test]
async fn test_search_score_and_favorite_flow() {
    let client = client().await;

    let response = client
        .post("/api/jobs/search")
        .header(session("flow"))
        .json(&json!({ "remote": ["hybrid"], "conversation_id": "c-1" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["conversation_id"], "c-1");
    assert_eq!(body["data"]["phase"], "scored");
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["jobs"][0]["id"], "a");

    let response = client
        .get("/api/jobs/a/match")
        .header(session("flow"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    let response = client
        .post("/api/profile")
        .header(session("flow"))
        .json(&json!({
            "personal_info": { "name": "Sam", "location": "Lyon" },
            "skills": { "programming_languages": ["Rust"] }
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .get("/api/jobs/a/match")
        .header(session("flow"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"]["jobId"], "a");
    assert_eq!(body["data"]["breakdown"]["locationMatch"], 100);
    assert_eq!(body["data"]["missingSkills"], json!(["Docker"]));

    let response = client
        .post("/api/jobs/a/favorite")
        .header(session("flow"))
        .header(Header::new("Authorization", "Bearer token-1"))
        .dispatch()
        .await;
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"]["isFavorite"], true);

    let response = client
        .get("/api/jobs/stats")
        .header(session("flow"))
        .dispatch()
        .await;
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"]["totalJobs"], 1);
    assert_eq!(body["data"]["favorites"], 1);
    assert_eq!(body["data"]["hybridJobs"], 1);

    // Other sessions never see this state
    let response = client
        .get("/api/jobs")
        .header(session("other"))
        .dispatch()
        .await;
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["phase"], "idle");
}

#[tokio::test]
async fn test_missing_job_and_bad_headers() {
    let client = client().await;

    let response = client.post("/api/jobs/nope/favorite").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "JOB_NOT_FOUND");

    let response = client
        .get("/api/jobs")
        .header(session("../../etc"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client
        .post("/api/profile/load")
        .header(Header::new("Authorization", "Token abc"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn test_salary_conversion_endpoint() {
    let client = client().await;

    let response = client
        .get("/api/salary/convert?amount=1000&from=EUR&to=GBP")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"]["converted"], 860.0);
    assert_eq!(body["data"]["formatted"], "£860");

    let response = client
        .get("/api/salary/convert?amount=1000&from=EUR&to=ABC")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "UNKNOWN_CURRENCY");
}

#[tokio::test]
async fn test_import_job_from_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><h1>Data Engineer</h1><span class=\"company\">Globex</span>\
             <article>Spark and SQL pipelines.</article></body></html>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client().await;

    let response = client
        .post("/api/jobs/import")
        .header(session("importer"))
        .json(&json!({ "url": format!("{}/jobs/42", server.uri()) }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"]["title"], "Data Engineer");
    assert_eq!(body["data"]["company"], "Globex");
    assert_eq!(body["data"]["source"], "import");

    let response = client
        .get("/api/jobs")
        .header(session("importer"))
        .dispatch()
        .await;
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"]["total"], 1);

    let response = client
        .post("/api/jobs/import")
        .header(session("importer"))
        .json(&json!({ "url": format!("{}/jobs/gone", server.uri()) }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadGateway);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "SCRAPING_ERROR");
}

#[tokio::test]
async fn test_import_rejects_non_http_url() {
    let client = client().await;
    let response = client
        .post("/api/jobs/import")
        .json(&json!({ "url": "ftp://jobs.example/42" }))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "INVALID_URL");
}
