use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::users::store::UserId;

/// A credential was supplied but could not be accepted. Distinct from an
/// anonymous session: a bad token fails the whole request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid credential")]
    InvalidCredential,
    #[error("credential expired, sign in again")]
    ExpiredCredential,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermissionDenied {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("only the owner may do this")]
    NotOwner,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Conflict {
    #[error("email {0} is already registered")]
    DuplicateEmail(String),
    #[error("user {0} is already a friend")]
    AlreadyFriends(UserId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotFound {
    #[error("user not found")]
    User,
    #[error("post not found")]
    Post,
}

/// Login failures. Distinguished internally, but both render the same
/// public 401 body so the response does not leak which part was wrong.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("wrong password")]
    WrongPassword,
    #[error("unknown email")]
    UnknownEmail,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),
    #[error(transparent)]
    Conflict(#[from] Conflict),
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Session(_) => StatusCode::UNAUTHORIZED,
            ApiError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Credential(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Credential(_) => "invalid credentials".to_string(),
            ApiError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
