//! Error types for the listing server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid filter: {0}")]
    Filter(#[from] hireboard_filter::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Filter(hireboard_filter::Error::InvalidPattern { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::Filter(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Field the error refers to, empty when it is not tied to one.
    fn path(&self) -> &str {
        match self {
            Error::Filter(hireboard_filter::Error::InvalidFilterValue { field, .. }) => field,
            _ => "",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("Internal error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "errorMessages": [{
                "path": self.path(),
                "message": message,
            }]
        }));

        (status, body).into_response()
    }
}
