// src/auth.rs
//! Request guards for the session id and the caller's bearer token

use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use tracing::warn;

pub const SESSION_HEADER: &str = "X-Session-Id";
pub const DEFAULT_SESSION: &str = "default";
const MAX_SESSION_ID_LEN: usize = 64;

/// Identifies the search session; requests without the header share "default"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Token forwarded untouched to the collaborator backend. Verification is the
/// collaborator's job; this guard only checks the header shape.
#[derive(Debug, Clone, Default)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[derive(Debug)]
pub enum AuthError {
    InvalidToken,
    InvalidSession,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::InvalidSession => "Invalid session id",
        }
    }
}

pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn parse_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionId {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.headers().get_one(SESSION_HEADER).map(str::trim) {
            None | Some("") => Outcome::Success(SessionId(DEFAULT_SESSION.to_string())),
            Some(id) if is_valid_session_id(id) => Outcome::Success(SessionId(id.to_string())),
            Some(id) => {
                warn!("Rejected session id: {}", id);
                Outcome::Error((Status::BadRequest, AuthError::InvalidSession))
            }
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.headers().get_one("Authorization") {
            None => Outcome::Success(BearerToken(None)),
            Some(header) => match parse_bearer(header) {
                Some(token) => Outcome::Success(BearerToken(Some(token.to_string()))),
                None => {
                    warn!("Invalid Authorization header format");
                    Outcome::Error((Status::Unauthorized, AuthError::InvalidToken))
                }
            },
        }
    }
}
