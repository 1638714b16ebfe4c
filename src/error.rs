use actix_web::{HttpResponse, http::StatusCode};
use derive_more::{Display, Error};
use serde_json::json;
use tracing::error;

use crate::repository::StoreError;

/// Domain error taxonomy. Each variant maps 1:1 to a transport status
/// code via the `ResponseError` impl below.
#[derive(Debug, Display, Error)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    InvalidArgument(#[error(not(source))] String),
    #[display(fmt = "{}", _0)]
    NotFound(#[error(not(source))] String),
    #[display(fmt = "{}", _0)]
    Conflict(#[error(not(source))] String),
    #[display(fmt = "{}", _0)]
    Forbidden(#[error(not(source))] String),
    /// Storage failure. The message shown to callers is generic; the
    /// underlying error is logged, never serialized.
    #[display(fmt = "Internal Server Error")]
    Database(#[error(source)] sqlx::Error),
    #[display(fmt = "{}", _0)]
    Internal(#[error(not(source))] String),
}

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ApiError::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // Unique-key backstop for the check-then-insert race: the only
            // unique key on attendances is (user_id, date).
            StoreError::Duplicate => {
                ApiError::Conflict("Attendance already marked for this date".into())
            }
            StoreError::Database(e) => ApiError::Database(e),
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Database(e) => error!(error = %e, "Database failure"),
            ApiError::Internal(msg) => error!(message = %msg, "Internal failure"),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn variants_map_to_status_codes() {
        assert_eq!(
            ApiError::invalid_argument("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("missing").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::conflict("dup").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::forbidden("no").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_store_error_becomes_conflict() {
        let err: ApiError = StoreError::Duplicate.into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Attendance already marked for this date");
    }

    #[test]
    fn database_error_does_not_leak_detail() {
        let err: ApiError = StoreError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal Server Error");
    }
}
