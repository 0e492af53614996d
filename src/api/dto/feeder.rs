//! Feeder DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::infrastructure::database::entities::{feeder, feeder_update, user};

/// Public info of an assigned staff member
///
/// Never exposes the password hash or role internals.
#[derive(Debug, Serialize, ToSchema)]
pub struct StaffDto {
    pub id: String,
    pub name: String,
    /// Contact phone number
    pub phone: String,
}

impl From<user::Model> for StaffDto {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            name: u.name,
            phone: u.phone,
        }
    }
}

/// Feeder with its assigned staff's public info
#[derive(Debug, Serialize, ToSchema)]
pub struct FeederDto {
    pub id: String,
    pub name: String,
    /// Service area
    pub area: String,
    /// `Working`, `Outage` or `Maintenance`
    pub status: String,
    /// Expected restoration time (ISO 8601)
    pub expected_restore: Option<String>,
    /// Assigned staff member, if any
    pub staff: Option<StaffDto>,
    /// Last update (ISO 8601)
    pub updated_at: String,
}

impl FeederDto {
    pub fn from_model(f: feeder::Model, staff: Option<user::Model>) -> Self {
        Self {
            id: f.id,
            name: f.name,
            area: f.area,
            status: f.status.to_string(),
            expected_restore: f.expected_restore.map(|d| d.to_rfc3339()),
            staff: staff.map(StaffDto::from),
            updated_at: f.updated_at.to_rfc3339(),
        }
    }
}

/// One entry of a feeder's status history
#[derive(Debug, Serialize, ToSchema)]
pub struct FeederUpdateDto {
    pub id: String,
    pub feeder_id: String,
    /// Id of the staff member who reported the change
    pub updated_by: String,
    pub status: String,
    pub remarks: Option<String>,
    /// When the change was reported (ISO 8601)
    pub timestamp: String,
}

impl From<feeder_update::Model> for FeederUpdateDto {
    fn from(u: feeder_update::Model) -> Self {
        Self {
            id: u.id,
            feeder_id: u.feeder_id,
            updated_by: u.updated_by,
            status: u.status.to_string(),
            remarks: u.remarks,
            timestamp: u.timestamp.to_rfc3339(),
        }
    }
}
