// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::auth::{BearerToken, SessionId};
use crate::controller::SearchSnapshot;
use crate::core::{AppServices, ConfigManager};
use crate::types::{
    CandidateProfile, JobListing, JobMatchScore, JobSearchFilters, JobStats,
    PersonalizedRecommendation,
};
use anyhow::Result;
use handlers::ApiError;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::{error, info};

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[get("/health")]
pub async fn health(state: &State<ServerState>) -> Json<TextResponse> {
    handlers::health_handler(state.inner()).await
}

#[get("/countries")]
pub fn countries(state: &State<ServerState>) -> Json<DataResponse<Vec<CountryInfo>>> {
    handlers::countries_handler(state.inner())
}

#[post("/jobs/country", data = "<request>")]
pub async fn set_country(
    request: Json<StandardRequest<SetCountryRequest>>,
    session: SessionId,
    state: &State<ServerState>,
) -> Result<Json<DataResponse<SearchSnapshot>>, ApiError> {
    handlers::set_country_handler(request, session, state.inner()).await
}

#[post("/jobs/filters", data = "<request>")]
pub async fn update_filters(
    request: Json<StandardRequest<JobSearchFilters>>,
    session: SessionId,
    state: &State<ServerState>,
) -> Json<ActionResponse> {
    handlers::update_filters_handler(request, session, state.inner()).await
}

#[post("/jobs/search", data = "<request>")]
pub async fn search_jobs(
    request: Option<Json<StandardRequest<JobSearchFilters>>>,
    session: SessionId,
    state: &State<ServerState>,
) -> Json<DataResponse<SearchSnapshot>> {
    handlers::search_jobs_handler(request, session, state.inner()).await
}

#[get("/jobs")]
pub async fn get_jobs(
    session: SessionId,
    state: &State<ServerState>,
) -> Json<DataResponse<SearchSnapshot>> {
    handlers::get_jobs_handler(session, state.inner()).await
}

#[get("/jobs/stats")]
pub async fn job_stats(session: SessionId, state: &State<ServerState>) -> Json<DataResponse<JobStats>> {
    handlers::stats_handler(session, state.inner()).await
}

#[get("/jobs/recommendations")]
pub async fn recommendations(
    session: SessionId,
    state: &State<ServerState>,
) -> Json<DataResponse<Vec<PersonalizedRecommendation>>> {
    handlers::recommendations_handler(session, state.inner()).await
}

#[post("/jobs/import", data = "<request>")]
pub async fn import_job(
    request: Json<StandardRequest<ImportJobRequest>>,
    session: SessionId,
    state: &State<ServerState>,
) -> Result<Json<DataResponse<JobListing>>, ApiError> {
    handlers::import_job_handler(request, session, state.inner()).await
}

#[post("/jobs/<id>/favorite")]
pub async fn toggle_favorite(
    id: &str,
    session: SessionId,
    token: BearerToken,
    state: &State<ServerState>,
) -> Result<Json<DataResponse<FavoriteData>>, ApiError> {
    handlers::toggle_favorite_handler(id, session, token, state.inner()).await
}

#[get("/jobs/<id>/match")]
pub async fn job_match(
    id: &str,
    session: SessionId,
    state: &State<ServerState>,
) -> Result<Json<DataResponse<JobMatchScore>>, ApiError> {
    handlers::job_match_handler(id, session, state.inner()).await
}

#[post("/profile", data = "<request>")]
pub async fn set_profile(
    request: Json<StandardRequest<CandidateProfile>>,
    session: SessionId,
    state: &State<ServerState>,
) -> Json<ActionResponse> {
    handlers::set_profile_handler(request, session, state.inner()).await
}

#[post("/profile/load")]
pub async fn load_profile(
    session: SessionId,
    token: BearerToken,
    state: &State<ServerState>,
) -> Result<Json<DataResponse<CandidateProfile>>, ApiError> {
    handlers::load_profile_handler(session, token, state.inner()).await
}

#[get("/salary/convert?<amount>&<from>&<to>")]
pub fn convert(
    amount: f64,
    from: &str,
    to: &str,
) -> Result<Json<DataResponse<ConversionData>>, ApiError> {
    handlers::convert_salary_handler(amount, from, to)
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

fn catcher_response(error: &str, code: &str, suggestions: &[&str]) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        error.to_string(),
        code.to_string(),
        suggestions.iter().map(|s| s.to_string()).collect(),
        None,
    ))
}

#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    catcher_response(
        "Invalid request format",
        "BAD_REQUEST",
        &[
            "Check your request JSON format",
            "X-Session-Id may only contain letters, digits, '-' and '_'",
        ],
    )
}

#[rocket::catch(401)]
pub fn unauthorized() -> Json<StandardErrorResponse> {
    catcher_response(
        "Invalid authorization header",
        "UNAUTHORIZED",
        &["Send the token as 'Authorization: Bearer <token>'"],
    )
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    catcher_response(
        "Endpoint not found",
        "NOT_FOUND",
        &["Check the endpoint path and HTTP method"],
    )
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    catcher_response(
        "Request body does not match the expected shape",
        "INVALID_BODY",
        &[
            "Verify all required fields are present",
            "Enum values are lowercase, e.g. \"full-time\", \"senior\", \"hybrid\"",
        ],
    )
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    catcher_response(
        "Internal server error",
        "INTERNAL_ERROR",
        &[
            "Try again in a few moments",
            "Contact support if the problem persists",
        ],
    )
}

/// Routes, catchers and fairings around the given state, without binding a port
pub fn build_rocket(state: ServerState) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, unauthorized, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                health,
                countries,
                set_country,
                update_filters,
                search_jobs,
                get_jobs,
                job_stats,
                recommendations,
                import_job,
                toggle_favorite,
                job_match,
                set_profile,
                load_profile,
                convert,
                options,
            ],
        )
}

pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    let services = AppServices::from_config(&config)?;
    let state = ServerState {
        sessions: services.session_manager(&config.default_country),
        registry: services.registry,
        importer: services.importer,
    };

    info!(
        "Starting jobmatch API on port {} ({} countries, default {})",
        config.port,
        state.registry.countries.len(),
        config.default_country
    );

    let figment = rocket::Config::figment()
        .merge(("port", config.port))
        .merge(("address", "0.0.0.0"));

    if let Err(e) = build_rocket(state).configure(figment).launch().await {
        error!("Server stopped with error: {}", e);
        anyhow::bail!("Rocket failed: {}", e);
    }
    Ok(())
}
