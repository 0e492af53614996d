//! Authentication and Authorization module
//!
//! Provides JWT token-based authentication, bcrypt password hashing and
//! the role-based permission policy.

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use jwt::{create_token, verify_token, Claims, JwtConfig};
pub use middleware::{auth_middleware, AuthState, CurrentUser};
pub use password::{hash_password, verify_password};
pub use policy::{authorize, Operation};
