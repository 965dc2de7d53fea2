// src/web/types.rs

use crate::controller::SessionManager;
use crate::scraping::{JobPageScraper, SourceRegistry};
use rocket::serde::{Deserialize, Serialize};

/// Everything the handlers share, managed by rocket
pub struct ServerState {
    pub sessions: SessionManager,
    pub registry: SourceRegistry,
    pub importer: JobPageScraper,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SetCountryRequest {
    pub country: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ImportJobRequest {
    pub url: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct FavoriteData {
    pub job_id: String,
    pub is_favorite: bool,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CountryInfo {
    pub key: String,
    pub name: String,
    pub country_code: String,
    pub currency: String,
    pub sources: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ConversionData {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub converted: f64,
    pub formatted: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

// Request bodies may carry a conversation_id next to their fields
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl TextResponse {
    pub fn success(message: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
            conversation_id,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            conversation_id,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
            next_actions: None,
            conversation_id,
        }
    }

    pub fn with_next_actions(mut self, next_actions: Vec<String>) -> Self {
        self.next_actions = Some(next_actions);
        self
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            conversation_id,
        }
    }
}
