//! API Router with Swagger UI

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::{ApiResponse, FeederDto, FeederUpdateDto, StaffDto, UserDto};
use crate::api::handlers::{feeders, health, users};
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::infrastructure::database::entities::feeder::FeederStatus;
use crate::infrastructure::database::entities::user::Role;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Users
        users::register,
        users::login,
        users::get_current_user,
        users::list_staff,
        users::set_role,
        // Feeders
        feeders::list_feeders,
        feeders::create_feeder,
        feeders::update_status,
        feeders::assign_staff,
        feeders::assign_user,
        feeders::delete_feeder,
        feeders::feeder_history,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            Role,
            FeederStatus,
            // Users
            UserDto,
            users::RegisterRequest,
            users::LoginRequest,
            users::LoginResponse,
            users::SetRoleRequest,
            // Feeders
            FeederDto,
            StaffDto,
            FeederUpdateDto,
            feeders::CreateFeederRequest,
            feeders::UpdateStatusRequest,
            feeders::AssignStaffRequest,
            feeders::AssignUserRequest,
            feeders::DeleteFeederRequest,
            // Health
            health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service liveness probe."),
        (name = "Users", description = "Registration, login (JWT), profile, staff directory and role changes. Pass the token in the `Authorization: Bearer <token>` header."),
        (name = "Feeders", description = "Feeder status tracking. Admins manage feeders and assignments, staff report status for their assigned feeders, end users follow the single feeder they are mapped to. Statuses: `Working`, `Outage`, `Maintenance`."),
    ),
    info(
        title = "PowerBack Feeder Status API",
        version = "1.0.0",
        description = "REST API for tracking the status of electrical distribution feeders.

## Authentication

Obtain a token via `POST /users/login` and pass it in the
`Authorization: Bearer <token>` header. The token's subject is the
account's phone number.

## Response format

Every response is wrapped in a standard envelope:
```json
{\"success\": true, \"data\": {...}, \"error\": null}
```

On failure:
```json
{\"success\": false, \"data\": null, \"error\": \"description\"}
```",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(db: DatabaseConnection, jwt_config: JwtConfig) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
        db: db.clone(),
    };

    let user_state = users::UserHandlerState {
        db: db.clone(),
        jwt_config,
    };

    let feeder_state = feeders::FeederHandlerState { db: db.clone() };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // User routes (public)
    let user_public_routes = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .with_state(user_state.clone());

    // User routes (protected)
    let user_protected_routes = Router::new()
        .route("/me", get(users::get_current_user))
        .route("/staff", get(users::list_staff))
        .route("/role", patch(users::set_role))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(user_state);

    // Feeder collection route registered at the outer level: `nest` does not
    // match the trailing-slash form `/feeders/` against the nested `/` route
    let feeder_root = Router::new()
        .route(
            "/feeders/",
            get(feeders::list_feeders).post(feeders::create_feeder),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(feeder_state.clone());

    // Feeder routes (all protected; per-operation role checks live in the
    // handlers via the permission policy)
    let feeder_routes = Router::new()
        .route("/", get(feeders::list_feeders).post(feeders::create_feeder))
        .route("/update-status", patch(feeders::update_status))
        .route("/assign", patch(feeders::assign_staff))
        .route("/assign-user", patch(feeders::assign_user))
        .route("/delete", delete(feeders::delete_feeder))
        .route("/{feeder_id}/history", get(feeders::feeder_history))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(feeder_state);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/users", user_public_routes.merge(user_protected_routes))
        .nest("/feeders", feeder_routes)
        .merge(feeder_root)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
