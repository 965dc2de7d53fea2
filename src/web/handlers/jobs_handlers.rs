// src/web/handlers/jobs_handlers.rs
use super::{bad_request, error_response, ApiError};
use crate::auth::{BearerToken, SessionId};
use crate::controller::{SearchPhase, SearchSnapshot};
use crate::types::{
    JobListing, JobMatchScore, JobSearchFilters, JobStats, PersonalizedRecommendation,
};
use crate::web::types::*;

use rocket::serde::json::Json;
use tracing::info;

pub async fn set_country_handler(
    request: Json<StandardRequest<SetCountryRequest>>,
    session: SessionId,
    state: &ServerState,
) -> Result<Json<DataResponse<SearchSnapshot>>, ApiError> {
    let conversation_id = request.conversation_id.clone();
    let country = request.data.country.trim().to_lowercase();

    if !state.sessions.scraper().supports_country(&country) {
        return Err(bad_request(
            format!("Unsupported country: {}", request.data.country),
            "UNSUPPORTED_COUNTRY",
            vec![format!(
                "Available countries: {}",
                state.sessions.scraper().countries().join(", ")
            )],
            conversation_id,
        ));
    }

    let controller = state.sessions.session(session.as_str()).await;
    controller.set_country(&country).await;

    Ok(Json(DataResponse::success(
        format!("Country set to {}", country),
        controller.snapshot().await,
        conversation_id,
    )))
}

pub async fn update_filters_handler(
    request: Json<StandardRequest<JobSearchFilters>>,
    session: SessionId,
    state: &ServerState,
) -> Json<ActionResponse> {
    let request = request.into_inner();
    let controller = state.sessions.session(session.as_str()).await;
    controller.update_filters(request.data).await;

    Json(
        ActionResponse::success(
            "Filters updated".to_string(),
            "filters_updated".to_string(),
            request.conversation_id,
        )
        .with_next_actions(vec!["search_jobs".to_string()]),
    )
}

/// An optional body replaces the filters before searching
pub async fn search_jobs_handler(
    request: Option<Json<StandardRequest<JobSearchFilters>>>,
    session: SessionId,
    state: &ServerState,
) -> Json<DataResponse<SearchSnapshot>> {
    let controller = state.sessions.session(session.as_str()).await;

    let conversation_id = match request {
        Some(request) => {
            let request = request.into_inner();
            controller.update_filters(request.data).await;
            request.conversation_id
        }
        None => None,
    };

    let snapshot = controller.search_jobs().await;
    info!(
        "Session {} search in {}: {} jobs",
        session.as_str(),
        snapshot.country,
        snapshot.total
    );

    let message = match snapshot.phase {
        SearchPhase::Fallback => {
            "Job sources are unavailable, showing sample listings".to_string()
        }
        _ => format!("Found {} jobs in {}", snapshot.total, snapshot.country),
    };
    Json(DataResponse::success(message, snapshot, conversation_id))
}

pub async fn get_jobs_handler(
    session: SessionId,
    state: &ServerState,
) -> Json<DataResponse<SearchSnapshot>> {
    let controller = state.sessions.session(session.as_str()).await;
    let snapshot = controller.snapshot().await;
    Json(DataResponse::success(
        format!("{} jobs", snapshot.total),
        snapshot,
        None,
    ))
}

pub async fn toggle_favorite_handler(
    job_id: &str,
    session: SessionId,
    token: BearerToken,
    state: &ServerState,
) -> Result<Json<DataResponse<FavoriteData>>, ApiError> {
    let controller = state.sessions.session(session.as_str()).await;
    let is_favorite = controller
        .toggle_favorite(job_id, token.0)
        .await
        .map_err(|e| error_response(&e, None))?;

    let message = if is_favorite {
        "Added to favorites"
    } else {
        "Removed from favorites"
    };
    Ok(Json(DataResponse::success(
        message.to_string(),
        FavoriteData {
            job_id: job_id.to_string(),
            is_favorite,
        },
        None,
    )))
}

pub async fn job_match_handler(
    job_id: &str,
    session: SessionId,
    state: &ServerState,
) -> Result<Json<DataResponse<JobMatchScore>>, ApiError> {
    let controller = state.sessions.session(session.as_str()).await;
    let score = controller
        .evaluate_job_match(job_id)
        .await
        .map_err(|e| error_response(&e, None))?;

    Ok(Json(DataResponse::success(
        format!("Match score: {}%", score.overall_score),
        score,
        None,
    )))
}

pub async fn stats_handler(session: SessionId, state: &ServerState) -> Json<DataResponse<JobStats>> {
    let controller = state.sessions.session(session.as_str()).await;
    let stats = controller.stats().await;
    Json(DataResponse::success(
        format!("{} jobs analysed", stats.total_jobs),
        stats,
        None,
    ))
}

pub async fn recommendations_handler(
    session: SessionId,
    state: &ServerState,
) -> Json<DataResponse<Vec<PersonalizedRecommendation>>> {
    let controller = state.sessions.session(session.as_str()).await;
    let recommendations = controller.recommendations().await;
    Json(DataResponse::success(
        format!("{} recommendations", recommendations.len()),
        recommendations,
        None,
    ))
}

pub async fn import_job_handler(
    request: Json<StandardRequest<ImportJobRequest>>,
    session: SessionId,
    state: &ServerState,
) -> Result<Json<DataResponse<JobListing>>, ApiError> {
    let conversation_id = request.conversation_id.clone();
    let url = request.data.url.trim();

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(bad_request(
            format!("Invalid job URL: {}", url),
            "INVALID_URL",
            vec!["Provide the full http(s) URL of the job post".to_string()],
            conversation_id,
        ));
    }

    let job = state
        .importer
        .import_job(url)
        .await
        .map_err(|e| error_response(&e, conversation_id.clone()))?;

    let controller = state.sessions.session(session.as_str()).await;
    let message = if controller.add_job(job.clone()).await {
        format!("Imported {} at {}", job.title, job.company)
    } else {
        format!("{} at {} is already in your results", job.title, job.company)
    };

    Ok(Json(DataResponse::success(message, job, conversation_id)))
}
