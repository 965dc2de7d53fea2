// src/web/handlers/system_handlers.rs
use super::{error_response, ApiError};
use crate::currency::{convert_salary, format_salary};
use crate::web::types::*;

use rocket::serde::json::Json;

pub async fn health_handler(state: &ServerState) -> Json<TextResponse> {
    Json(TextResponse::success(
        format!(
            "jobmatch is running ({} active sessions)",
            state.sessions.session_count().await
        ),
        None,
    ))
}

pub fn countries_handler(state: &ServerState) -> Json<DataResponse<Vec<CountryInfo>>> {
    let countries: Vec<CountryInfo> = state
        .registry
        .countries
        .iter()
        .map(|(key, sources)| CountryInfo {
            key: key.clone(),
            name: sources.name.clone(),
            country_code: sources.country_code.clone(),
            currency: sources.currency.clone(),
            sources: state.sessions.scraper().source_names(key),
        })
        .collect();

    Json(DataResponse::success(
        format!("{} countries supported", countries.len()),
        countries,
        None,
    ))
}

pub fn convert_salary_handler(
    amount: f64,
    from: &str,
    to: &str,
) -> Result<Json<DataResponse<ConversionData>>, ApiError> {
    let converted = convert_salary(amount, from, to).map_err(|e| error_response(&e, None))?;
    let to = to.to_uppercase();
    let formatted = format_salary(converted, &to);

    Ok(Json(DataResponse::success(
        format!("{} {} = {}", amount, from.to_uppercase(), formatted),
        ConversionData {
            amount,
            from: from.to_uppercase(),
            to,
            converted,
            formatted,
        },
        None,
    )))
}
