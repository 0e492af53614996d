//! REST API module
//!
//! HTTP endpoints for registration/login, role-scoped feeder views and
//! the admin/staff mutation operations.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;

pub use router::create_api_router;
