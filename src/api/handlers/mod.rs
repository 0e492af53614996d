//! API Handlers

pub mod feeders;
pub mod health;
pub mod users;

use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::domain::DomainError;

/// Map a domain failure to its HTTP status and response envelope.
///
/// Conflicts (duplicate phone at registration) surface as 400 alongside
/// validation failures; database failures are logged and surfaced as an
/// opaque 500.
pub(crate) fn domain_error_response<T>(e: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) | DomainError::Conflict(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &e {
        DomainError::Database(err) => {
            tracing::error!("Database error: {}", err);
            "Internal error".to_string()
        }
        other => other.to_string(),
    };

    (status, Json(ApiResponse::error(message)))
}
