use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use serde::Serialize;

pub async fn handler404(path: Uri) -> (StatusCode, Json<Error>) {
    (
        StatusCode::NOT_FOUND,
        Json(Error::NotFound {
            message: format!("No such route: {}", path),
        }),
    )
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "error")]
pub enum Error {
    NotFound { message: String },
    InvalidPayload { message: String },
    StoreUnavailable { message: String },
    InternalError { kind: &'static str, message: String },
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // NotFound is the only error the HTTP contract distinguishes;
        // everything else is an opaque failure.
        let status = match &self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound { message } => write!(f, "{}", message),
            Error::InvalidPayload { message } => write!(f, "{}", message),
            Error::StoreUnavailable { message } => write!(f, "{}", message),
            Error::InternalError { kind, message } => write!(f, "{}: {}", kind, message),
        }
    }
}

impl std::error::Error for Error {}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(io) => Self::StoreUnavailable {
                message: io.to_string(),
            },
            sqlx::Error::PoolTimedOut => Self::StoreUnavailable {
                message: "connection pool timed out".to_string(),
            },
            sqlx::Error::PoolClosed => Self::StoreUnavailable {
                message: "connection pool is closed".to_string(),
            },
            sqlx::Error::Database(db) => Self::InvalidPayload {
                message: db.to_string(),
            },
            other => Self::InternalError {
                kind: "DatabaseError",
                message: other.to_string(),
            },
        }
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Self::InvalidPayload {
            message: format!("Invalid student id: {}", err),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(err: JsonRejection) -> Self {
        Self::InvalidPayload {
            message: err.to_string(),
        }
    }
}
