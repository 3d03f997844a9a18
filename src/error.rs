use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use std::io;

use crate::settings::SettingsError;

/// Failure surfaced to the renderer. Messages are carried verbatim from the
/// OS or the validator; nothing is translated.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    PermissionDenied(String),
    AlreadyExists(String),
    Validation(String),
    Io(String),
    Watch(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NotFound",
            ApiError::PermissionDenied(_) => "PermissionDenied",
            ApiError::AlreadyExists(_) => "AlreadyExists",
            ApiError::Validation(_) => "Validation",
            ApiError::Io(_) => "Io",
            ApiError::Watch(_) => "Watch",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound(m)
            | ApiError::PermissionDenied(m)
            | ApiError::AlreadyExists(m)
            | ApiError::Validation(m)
            | ApiError::Io(m)
            | ApiError::Watch(m) => m,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<io::Error> for ApiError {
    fn from(e: io::Error) -> Self {
        let message = e.to_string();
        match e.kind() {
            io::ErrorKind::NotFound => ApiError::NotFound(message),
            io::ErrorKind::PermissionDenied => ApiError::PermissionDenied(message),
            io::ErrorKind::AlreadyExists => ApiError::AlreadyExists(message),
            _ => ApiError::Io(message),
        }
    }
}

impl From<notify::Error> for ApiError {
    fn from(e: notify::Error) -> Self {
        match e.kind {
            notify::ErrorKind::PathNotFound => ApiError::NotFound(e.to_string()),
            notify::ErrorKind::Io(io_err) => io_err.into(),
            _ => ApiError::Watch(e.to_string()),
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(e: SettingsError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        ApiError::Io(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ApiError::AlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Io(_) | ApiError::Watch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.message(),
            "code": self.code(),
        }))
    }
}
