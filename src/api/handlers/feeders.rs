//! Feeder handlers: role-scoped views, creation, status updates,
//! staff/user assignment and deletion.

use axum::extract::Path;
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::dto::{ApiResponse, FeederDto, FeederUpdateDto, StaffDto};
use crate::api::handlers::domain_error_response;
use crate::auth::middleware::CurrentUser;
use crate::auth::policy::{authorize, Operation};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::feeder::FeederStatus;
use crate::infrastructure::database::entities::user::Role;
use crate::infrastructure::database::repositories::{AssignmentRepository, FeederRepository};

/// State for feeder handlers
#[derive(Clone)]
pub struct FeederHandlerState {
    pub db: sea_orm::DatabaseConnection,
}

/// Feeder creation request (admin only)
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Sector-7",
    "area": "North District",
    "status": "Working"
}))]
pub struct CreateFeederRequest {
    pub name: String,
    /// Service area
    pub area: String,
    /// Initial status, defaults to `Working`
    #[serde(default)]
    pub status: FeederStatus,
    /// Expected restoration time (ISO 8601), optional
    pub expected_restore: Option<String>,
}

/// Status update request (staff only)
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "feeder_id": "3b6f1c9a-...",
    "status": "Outage",
    "remarks": "transformer fault"
}))]
pub struct UpdateStatusRequest {
    pub feeder_id: String,
    /// New status: `Working`, `Outage` or `Maintenance`
    pub status: FeederStatus,
    pub remarks: Option<String>,
    /// Expected restoration time (ISO 8601), optional
    pub expected_restore: Option<String>,
}

/// Staff assignment request (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignStaffRequest {
    pub feeder_id: String,
    /// Must reference an existing user with the staff role
    pub staff_id: String,
}

/// User→feeder mapping request (admin or staff)
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignUserRequest {
    pub feeder_id: String,
    /// Must reference an existing user with the `user` role
    pub user_id: String,
}

/// Feeder deletion request (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteFeederRequest {
    pub feeder_id: String,
}

/// Parse an optional ISO 8601 timestamp from a request body.
fn parse_expected_restore(value: Option<&str>) -> DomainResult<Option<DateTime<Utc>>> {
    match value {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| Some(d.with_timezone(&Utc)))
            .map_err(|_| {
                DomainError::validation("Invalid expected_restore timestamp, use ISO 8601 format")
            }),
    }
}

/// Role-scoped feeder view
///
/// Admin sees every feeder, staff see the feeders assigned to them, end
/// users see the single feeder they are mapped to (or an empty list when
/// not mapped yet).
#[utoipa::path(
    get,
    path = "/feeders/",
    tag = "Feeders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Feeders visible to the caller", body = ApiResponse<Vec<FeederDto>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_feeders(
    State(state): State<FeederHandlerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<FeederDto>>>, (StatusCode, Json<ApiResponse<Vec<FeederDto>>>)> {
    authorize(current.role, Operation::ListFeeders).map_err(domain_error_response)?;

    let feeders = FeederRepository::new(state.db.clone());

    let items = match current.role {
        Role::Admin => feeders
            .list_all_with_staff()
            .await
            .map_err(domain_error_response)?
            .into_iter()
            .map(|(f, staff)| FeederDto::from_model(f, staff))
            .collect(),

        Role::Staff => {
            let own = StaffDto {
                id: current.id.clone(),
                name: current.name.clone(),
                phone: current.phone.clone(),
            };
            feeders
                .list_for_staff(&current.id)
                .await
                .map_err(domain_error_response)?
                .into_iter()
                .map(|f| {
                    let mut dto = FeederDto::from_model(f, None);
                    dto.staff = Some(StaffDto {
                        id: own.id.clone(),
                        name: own.name.clone(),
                        phone: own.phone.clone(),
                    });
                    dto
                })
                .collect()
        }

        Role::User => {
            let ledger = AssignmentRepository::new(state.db.clone());
            let mapping = ledger
                .find_for_user(&current.id)
                .await
                .map_err(domain_error_response)?;

            match mapping {
                // Explicit empty state: not mapped to any feeder yet
                None => Vec::new(),
                Some(mapping) => feeders
                    .find_with_staff(&mapping.feeder_id)
                    .await
                    .map_err(domain_error_response)?
                    .map(|(f, staff)| FeederDto::from_model(f, staff))
                    .into_iter()
                    .collect(),
            }
        }
    };

    Ok(Json(ApiResponse::success(items)))
}

/// Create a new feeder (admin only)
#[utoipa::path(
    post,
    path = "/feeders/",
    tag = "Feeders",
    security(("bearer_auth" = [])),
    request_body = CreateFeederRequest,
    responses(
        (status = 201, description = "Feeder created", body = ApiResponse<FeederDto>),
        (status = 400, description = "Invalid expected_restore timestamp"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn create_feeder(
    State(state): State<FeederHandlerState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateFeederRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FeederDto>>), (StatusCode, Json<ApiResponse<FeederDto>>)>
{
    authorize(current.role, Operation::CreateFeeder).map_err(domain_error_response)?;

    let expected_restore =
        parse_expected_restore(request.expected_restore.as_deref()).map_err(domain_error_response)?;

    let feeder = FeederRepository::new(state.db.clone())
        .create(&request.name, &request.area, request.status, expected_restore)
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(FeederDto::from_model(feeder, None))),
    ))
}

/// Report a feeder status change (staff only)
///
/// The feeder must be assigned to the caller; an unassigned or absent
/// feeder yields the same 404. The status change and its history entry
/// are written atomically.
#[utoipa::path(
    patch,
    path = "/feeders/update-status",
    tag = "Feeders",
    security(("bearer_auth" = [])),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated and history recorded", body = ApiResponse<FeederDto>),
        (status = 400, description = "Invalid expected_restore timestamp"),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "Feeder not found or not assigned to the caller")
    )
)]
pub async fn update_status(
    State(state): State<FeederHandlerState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<FeederDto>>, (StatusCode, Json<ApiResponse<FeederDto>>)> {
    authorize(current.role, Operation::UpdateFeederStatus).map_err(domain_error_response)?;

    let expected_restore =
        parse_expected_restore(request.expected_restore.as_deref()).map_err(domain_error_response)?;

    let feeder = FeederRepository::new(state.db.clone())
        .update_status(
            &request.feeder_id,
            &current.id,
            request.status,
            request.remarks,
            expected_restore,
        )
        .await
        .map_err(domain_error_response)?;

    let own = StaffDto {
        id: current.id,
        name: current.name,
        phone: current.phone,
    };
    let mut dto = FeederDto::from_model(feeder, None);
    dto.staff = Some(own);

    Ok(Json(ApiResponse::success(dto)))
}

/// Assign a staff member to a feeder (admin only)
#[utoipa::path(
    patch,
    path = "/feeders/assign",
    tag = "Feeders",
    security(("bearer_auth" = [])),
    request_body = AssignStaffRequest,
    responses(
        (status = 200, description = "Staff assigned"),
        (status = 400, description = "staff_id is not a staff user"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Feeder not found")
    )
)]
pub async fn assign_staff(
    State(state): State<FeederHandlerState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<AssignStaffRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    authorize(current.role, Operation::AssignStaff).map_err(domain_error_response)?;

    FeederRepository::new(state.db.clone())
        .assign_staff(&request.feeder_id, &request.staff_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(())))
}

/// Map an end user to a feeder (admin or staff)
///
/// Upsert keyed by user: a second call for the same user re-points the
/// existing mapping.
#[utoipa::path(
    patch,
    path = "/feeders/assign-user",
    tag = "Feeders",
    security(("bearer_auth" = [])),
    request_body = AssignUserRequest,
    responses(
        (status = 200, description = "User mapped to the feeder"),
        (status = 400, description = "user_id is not an end user"),
        (status = 403, description = "Caller is not admin or staff"),
        (status = 404, description = "Feeder not found")
    )
)]
pub async fn assign_user(
    State(state): State<FeederHandlerState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<AssignUserRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    authorize(current.role, Operation::AssignUser).map_err(domain_error_response)?;

    AssignmentRepository::new(state.db.clone())
        .assign_user(&request.feeder_id, &request.user_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(())))
}

/// Delete a feeder (admin only)
///
/// Removes the feeder together with its update history and user
/// mappings.
#[utoipa::path(
    delete,
    path = "/feeders/delete",
    tag = "Feeders",
    security(("bearer_auth" = [])),
    request_body = DeleteFeederRequest,
    responses(
        (status = 200, description = "Feeder and everything referencing it deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Feeder not found")
    )
)]
pub async fn delete_feeder(
    State(state): State<FeederHandlerState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<DeleteFeederRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    authorize(current.role, Operation::DeleteFeeder).map_err(domain_error_response)?;

    FeederRepository::new(state.db.clone())
        .delete(&request.feeder_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(())))
}

/// Update history of a feeder, newest first (admin only)
#[utoipa::path(
    get,
    path = "/feeders/{feeder_id}/history",
    tag = "Feeders",
    security(("bearer_auth" = [])),
    params(
        ("feeder_id" = String, Path, description = "Feeder id")
    ),
    responses(
        (status = 200, description = "Status update history", body = ApiResponse<Vec<FeederUpdateDto>>),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Feeder not found")
    )
)]
pub async fn feeder_history(
    State(state): State<FeederHandlerState>,
    Extension(current): Extension<CurrentUser>,
    Path(feeder_id): Path<String>,
) -> Result<
    Json<ApiResponse<Vec<FeederUpdateDto>>>,
    (StatusCode, Json<ApiResponse<Vec<FeederUpdateDto>>>),
> {
    authorize(current.role, Operation::ViewFeederHistory).map_err(domain_error_response)?;

    let history = FeederRepository::new(state.db.clone())
        .history(&feeder_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        history.into_iter().map(FeederUpdateDto::from).collect(),
    )))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::router::create_api_router;
    use crate::auth::{create_token, JwtConfig};
    use crate::infrastructure::database::entities::feeder::FeederStatus;
    use crate::infrastructure::database::entities::user::Role;
    use crate::infrastructure::database::repositories::{
        test_support, AssignmentRepository, FeederRepository, UserRepository,
    };

    async fn list_as(router: axum::Router, token: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/feeders/")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unmapped_user_gets_empty_list() {
        let db = test_support::connect().await;
        let jwt = JwtConfig::default();

        let bob = UserRepository::new(db.clone())
            .create("Bob", "+998901110001", "follower-pw", Role::User)
            .await
            .unwrap();
        let token = create_token(&bob.phone, bob.role, &jwt).unwrap();

        let (status, body) = list_as(create_api_router(db, jwt), &token).await;

        // No mapping yet: success envelope with an empty list, not an error
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_mapped_user_sees_only_their_feeder() {
        let db = test_support::connect().await;
        let jwt = JwtConfig::default();

        let bob = UserRepository::new(db.clone())
            .create("Bob", "+998901110001", "follower-pw", Role::User)
            .await
            .unwrap();
        let token = create_token(&bob.phone, bob.role, &jwt).unwrap();

        let feeders = FeederRepository::new(db.clone());
        let mine = feeders
            .create("Sector-7", "North", FeederStatus::Working, None)
            .await
            .unwrap();
        feeders
            .create("Sector-9", "South", FeederStatus::Outage, None)
            .await
            .unwrap();
        AssignmentRepository::new(db.clone())
            .assign_user(&mine.id, &bob.id)
            .await
            .unwrap();

        let (status, body) = list_as(create_api_router(db, jwt), &token).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], mine.id);
        assert_eq!(items[0]["status"], "Working");
    }
}
