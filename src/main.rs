//! PowerBack feeder status service binary.
//!
//! Reads configuration from a TOML file
//! (`~/.config/powerback/config.toml`), runs migrations and serves the
//! REST API.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use powerback::auth::jwt::JwtConfig;
use powerback::infrastructure::database::migrator::Migrator;
use powerback::{create_api_router, default_config_path, AppConfig, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("POWERBACK_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting PowerBack feeder status service...");

    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "powerback".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match powerback::init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Create bootstrap admin if no admin account exists
    create_default_admin(&db, &app_cfg).await;

    // ── REST API server ────────────────────────────────────────
    let router = create_api_router(db.clone(), jwt_config);

    let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("PowerBack shutdown complete");
    Ok(())
}

/// Create the bootstrap admin account if no admin exists yet.
///
/// Registration only ever produces end-user accounts, so the first admin
/// has to come from configuration.
async fn create_default_admin(db: &sea_orm::DatabaseConnection, app_cfg: &AppConfig) {
    use powerback::infrastructure::database::entities::user::{self, Role};
    use powerback::infrastructure::database::repositories::UserRepository;

    let admins = user::Entity::find()
        .filter(user::Column::Role.eq(Role::Admin))
        .one(db)
        .await;

    match admins {
        Ok(Some(_)) => {}
        Ok(None) => {
            info!("Creating default admin user...");
            let repo = UserRepository::new(db.clone());
            match repo
                .create(
                    &app_cfg.admin.name,
                    &app_cfg.admin.phone,
                    &app_cfg.admin.password,
                    Role::Admin,
                )
                .await
            {
                Ok(admin) => {
                    info!("Default admin created: {}", admin.phone);
                    warn!("Please change the admin password immediately!");
                }
                Err(e) => {
                    error!("Failed to create admin user: {}", e);
                }
            }
        }
        Err(e) => {
            error!("Failed to check for existing admin: {}", e);
        }
    }
}
