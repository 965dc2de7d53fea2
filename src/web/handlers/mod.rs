// src/web/handlers/mod.rs
pub mod jobs_handlers;
pub mod profile_handlers;
pub mod system_handlers;

pub use jobs_handlers::*;
pub use profile_handlers::*;
pub use system_handlers::*;

use crate::web::types::StandardErrorResponse;
use rocket::http::Status;
use rocket::serde::json::Json;
use tracing::error;

pub type ApiError = (Status, Json<StandardErrorResponse>);

/// Maps an internal error message to a status, an error code and hints for the client
pub fn categorize_error(error_msg: &str) -> (Status, &'static str, Vec<String>) {
    if error_msg.contains("Job not found") {
        (
            Status::NotFound,
            "JOB_NOT_FOUND",
            vec![
                "Run a new search, listings are replaced on every search".to_string(),
                "Check the job id in the current result set".to_string(),
            ],
        )
    } else if error_msg.contains("No candidate profile") {
        (
            Status::Conflict,
            "PROFILE_REQUIRED",
            vec![
                "Load your profile with POST /api/profile/load".to_string(),
                "Or send a profile with POST /api/profile".to_string(),
            ],
        )
    } else if error_msg.contains("Unknown currency") {
        (
            Status::BadRequest,
            "UNKNOWN_CURRENCY",
            vec!["Supported currencies: EUR, GBP, MAD, TND, DZD, XOF, ZAR".to_string()],
        )
    } else if error_msg.contains("candidate profile") || error_msg.contains("favorite") {
        (
            Status::BadGateway,
            "COLLABORATOR_ERROR",
            vec![
                "Check that you are logged in".to_string(),
                "Try again in a few moments".to_string(),
            ],
        )
    } else if error_msg.contains("job post") || error_msg.contains("extract job content") {
        (
            Status::BadGateway,
            "SCRAPING_ERROR",
            vec![
                "Verify the job URL is publicly accessible".to_string(),
                "The job post may be behind authentication or no longer available".to_string(),
            ],
        )
    } else {
        (
            Status::InternalServerError,
            "INTERNAL_ERROR",
            vec![
                "Try again in a few moments".to_string(),
                "Contact support if the problem persists".to_string(),
            ],
        )
    }
}

pub fn error_response(e: &anyhow::Error, conversation_id: Option<String>) -> ApiError {
    let error_msg = format!("{:#}", e);
    let (status, code, suggestions) = categorize_error(&error_msg);
    error!("Request failed ({}): {}", code, error_msg);
    (
        status,
        Json(StandardErrorResponse::new(
            error_msg,
            code.to_string(),
            suggestions,
            conversation_id,
        )),
    )
}

pub fn bad_request(
    error: String,
    code: &str,
    suggestions: Vec<String>,
    conversation_id: Option<String>,
) -> ApiError {
    (
        Status::BadRequest,
        Json(StandardErrorResponse::new(
            error,
            code.to_string(),
            suggestions,
            conversation_id,
        )),
    )
}
