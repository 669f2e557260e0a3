//! API error types and helpers.
//!
//! # Purpose
//! Centralizes HTTP error response construction so every endpoint returns
//! the same `{ code, message }` shape, and maps `ServiceError` onto status
//! codes in exactly one place. Internal failures are logged server-side and
//! leave the process as a generic message.
use crate::api::types::ErrorResponse;
use crate::service::ServiceError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Structured API error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn build(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
        },
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    build(StatusCode::NOT_FOUND, "not_found", message)
}

pub fn api_conflict(code: &str, message: &str) -> ApiError {
    build(StatusCode::CONFLICT, code, message)
}

pub fn api_validation_error(message: &str) -> ApiError {
    build(StatusCode::BAD_REQUEST, "validation_error", message)
}

pub fn api_unauthorized(message: &str) -> ApiError {
    build(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

pub fn api_internal(message: &str, err: &dyn std::fmt::Debug) -> ApiError {
    // Log internal details server-side; return a generic message.
    tracing::error!(error = ?err, "internal error: {message}");
    build(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::UserNotFound => api_not_found("user not found"),
            ServiceError::RecipeNotFound => api_not_found("recipe not found"),
            ServiceError::AlreadyRated => {
                api_conflict("already_rated", "recipe already rated")
            }
            ServiceError::Invalid(message) => api_validation_error(message),
            ServiceError::ImageNotFound => build(
                StatusCode::BAD_REQUEST,
                "image_not_found",
                "image not found",
            ),
            ServiceError::UploadFailed(_) => {
                tracing::error!(error = ?err, "image upload failed");
                build(StatusCode::BAD_GATEWAY, "upload_failed", "image upload failed")
            }
            ServiceError::PersistenceRace => {
                tracing::error!(error = ?err, "lost update race against a concurrent delete");
                build(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "persistence_race",
                    "recipe changed underneath the request",
                )
            }
            ServiceError::Store(_) => api_internal("storage error", &err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn helpers_build_expected_codes() {
        let not_found = api_not_found("missing");
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.body.code, "not_found");

        let conflict = api_conflict("already_rated", "conflict");
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.body.code, "already_rated");

        let validation = api_validation_error("bad");
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.body.code, "validation_error");

        let unauthorized = api_unauthorized("nope");
        assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unauthorized.body.code, "unauthorized");
    }

    #[test]
    fn service_errors_map_to_expected_statuses() {
        let cases = [
            (ServiceError::UserNotFound, StatusCode::NOT_FOUND),
            (ServiceError::RecipeNotFound, StatusCode::NOT_FOUND),
            (ServiceError::AlreadyRated, StatusCode::CONFLICT),
            (
                ServiceError::Invalid("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::ImageNotFound, StatusCode::BAD_REQUEST),
            (
                ServiceError::UploadFailed("io".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ServiceError::PersistenceRace,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::Store(StoreError::Unexpected(anyhow::anyhow!("boom"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, status);
        }
    }

    #[test]
    fn ownership_mismatch_is_indistinguishable_from_absence() {
        // Both arrive as RecipeNotFound; the response must not differ.
        let api: ApiError = ServiceError::RecipeNotFound.into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.body.message, "recipe not found");
    }
}
