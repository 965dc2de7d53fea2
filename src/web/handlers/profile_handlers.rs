// src/web/handlers/profile_handlers.rs
use super::{error_response, ApiError};
use crate::auth::{BearerToken, SessionId};
use crate::types::CandidateProfile;
use crate::web::types::*;

use rocket::serde::json::Json;

pub async fn set_profile_handler(
    request: Json<StandardRequest<CandidateProfile>>,
    session: SessionId,
    state: &ServerState,
) -> Json<ActionResponse> {
    let request = request.into_inner();
    let skills = request.data.skill_list().len();
    let controller = state.sessions.session(session.as_str()).await;
    controller.set_profile(request.data).await;

    Json(
        ActionResponse::success(
            format!("Profile set with {} skills", skills),
            "profile_set".to_string(),
            request.conversation_id,
        )
        .with_next_actions(vec!["search_jobs".to_string()]),
    )
}

pub async fn load_profile_handler(
    session: SessionId,
    token: BearerToken,
    state: &ServerState,
) -> Result<Json<DataResponse<CandidateProfile>>, ApiError> {
    let controller = state.sessions.session(session.as_str()).await;
    let profile = controller
        .load_profile(token.as_deref())
        .await
        .map_err(|e| error_response(&e, None))?;

    Ok(Json(DataResponse::success(
        format!("Profile loaded for {}", profile.personal_info.name),
        profile,
        None,
    )))
}
