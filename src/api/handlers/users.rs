//! User account handlers: registration, login, profile, staff directory
//! and the admin-only role change.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::{ApiResponse, StaffDto, UserDto};
use crate::api::extract::ValidatedJson;
use crate::api::handlers::domain_error_response;
use crate::auth::middleware::CurrentUser;
use crate::auth::policy::{authorize, Operation};
use crate::auth::{create_token, verify_password, JwtConfig};
use crate::infrastructure::database::entities::user::Role;
use crate::infrastructure::database::repositories::UserRepository;

/// State for user handlers
#[derive(Clone)]
pub struct UserHandlerState {
    pub db: sea_orm::DatabaseConnection,
    pub jwt_config: JwtConfig,
}

/// Registration request
///
/// Registration always creates an end-user account. Staff and admin
/// roles are granted afterwards through the role-change operation.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Bob",
    "phone": "+998901234567",
    "password": "secure_password_123"
}))]
pub struct RegisterRequest {
    /// Display name (1-100 characters)
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    /// Phone number, the unique login handle
    #[validate(length(min = 7, max = 20, message = "must be 7-20 characters"))]
    pub phone: String,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "phone": "+998901234567",
    "password": "secure_password_123"
}))]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Successful login response
///
/// Pass the token in the `Authorization: Bearer <token>` header.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT access token
    pub token: String,
    /// Token type (always `Bearer`)
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// The authenticated user
    pub user: UserDto,
}

/// Role change request (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRoleRequest {
    /// Id of the user whose role changes
    pub user_id: String,
    /// New role: `admin`, `staff` or `user`
    pub role: Role,
}

/// Register a new account
///
/// The phone number must be unused. The new account always has the
/// `user` role.
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserDto>),
        (status = 400, description = "Phone number already registered"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn register(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), (StatusCode, Json<ApiResponse<UserDto>>)> {
    let repo = UserRepository::new(state.db.clone());

    let user = repo
        .create(&request.name, &request.phone, &request.password, Role::User)
        .await
        .map_err(domain_error_response)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

/// Log in with phone number and password
///
/// Returns a JWT bearer token on success. Invalid phone and invalid
/// password are indistinguishable.
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, returns JWT token", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<UserHandlerState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let repo = UserRepository::new(state.db.clone());

    let user = repo
        .find_by_phone(&request.phone)
        .await
        .map_err(domain_error_response)?;

    let invalid = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        )
    };

    let Some(user) = user else {
        return Err(invalid());
    };

    let password_valid = verify_password(&request.password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err(invalid());
    }

    let token = create_token(&user.phone, user.role, &state.jwt_config).map_err(|e| {
        tracing::error!("Failed to sign token: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Internal error")),
        )
    })?;

    let response = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: user.into(),
    };

    Ok(Json(ApiResponse::success(response)))
}

/// The caller's own record
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The authenticated caller", body = ApiResponse<UserDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    Extension(current): Extension<CurrentUser>,
) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::success(UserDto {
        id: current.id,
        name: current.name,
        phone: current.phone,
        role: current.role.as_str().to_string(),
    }))
}

/// Staff directory (admin only)
#[utoipa::path(
    get,
    path = "/users/staff",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All staff members", body = ApiResponse<Vec<StaffDto>>),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_staff(
    State(state): State<UserHandlerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<StaffDto>>>, (StatusCode, Json<ApiResponse<Vec<StaffDto>>>)> {
    authorize(current.role, Operation::ListStaff).map_err(domain_error_response)?;

    let staff = UserRepository::new(state.db.clone())
        .list_staff()
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        staff.into_iter().map(StaffDto::from).collect(),
    )))
}

/// Change a user's role (admin only)
///
/// The elevation path for creating staff and admin accounts.
#[utoipa::path(
    patch,
    path = "/users/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = SetRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<UserDto>),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn set_role(
    State(state): State<UserHandlerState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<SetRoleRequest>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    authorize(current.role, Operation::SetRole).map_err(domain_error_response)?;

    let user = UserRepository::new(state.db.clone())
        .set_role(&request.user_id, request.role)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(user.into())))
}
