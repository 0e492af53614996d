//! # PowerBack Feeder Status Service
//!
//! Role-based outage tracking backend for electrical distribution feeders
//! (admins manage feeders and assignments, staff report outages and
//! restorations, end users follow the feeder they are mapped to).
//!
//! ## Architecture
//!
//! - **domain**: Core error taxonomy shared by every layer
//! - **auth**: JWT authentication, password hashing and the role policy
//! - **infrastructure**: Database connection, entities, migrations and
//!   repositories (credential store, feeder registry, assignment ledger)
//! - **api**: REST API with Swagger documentation

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use api::create_api_router;
