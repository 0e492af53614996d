//! User DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::infrastructure::database::entities::user;

/// A user record as returned by the API (no secret material)
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    /// Login handle
    pub phone: String,
    /// `admin`, `staff` or `user`
    pub role: String,
}

impl From<user::Model> for UserDto {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            name: u.name,
            phone: u.phone,
            role: u.role.as_str().to_string(),
        }
    }
}
