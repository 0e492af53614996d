//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::json;

use super::jwt::{verify_token, AuthError, JwtConfig};
use crate::infrastructure::database::entities::user::{self, Role};

/// Authentication state containing JWT config and the database handle
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub db: DatabaseConnection,
}

/// The caller resolved from a verified bearer token.
///
/// Loaded fresh from the credential store on every request, so a role
/// change takes effect immediately regardless of what the token claims.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
}

impl From<user::Model> for CurrentUser {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            name: u.name,
            phone: u.phone,
            role: u.role,
        }
    }
}

/// Extract token from Authorization header
fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT authentication middleware - requires a valid token whose subject
/// still resolves to a user record.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    // verify_token owns expiry: an expired token surfaces as ExpiredSignature
    let claims = match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => claims,
        Err(e) => {
            return auth_error_response(match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
        }
    };

    // The subject claim is the phone number; resolve it to the stored record
    let user = match user::Entity::find()
        .filter(user::Column::Phone.eq(&claims.sub))
        .one(&auth_state.db)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return auth_error_response(AuthError::UserNotFound),
        Err(e) => {
            tracing::error!("Failed to load user for token subject: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Internal error" })),
            )
                .into_response();
        }
    };

    request.extensions_mut().insert(CurrentUser::from(user));
    next.run(request).await
}

/// Create an authentication error response
fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
        AuthError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
    };

    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (status, body).into_response()
}
