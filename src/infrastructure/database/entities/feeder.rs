//! Feeder entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Operational status of a feeder
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum FeederStatus {
    #[sea_orm(string_value = "Working")]
    Working,
    #[sea_orm(string_value = "Outage")]
    Outage,
    #[sea_orm(string_value = "Maintenance")]
    Maintenance,
}

impl FeederStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Working => "Working",
            Self::Outage => "Outage",
            Self::Maintenance => "Maintenance",
        }
    }
}

impl Default for FeederStatus {
    fn default() -> Self {
        Self::Working
    }
}

impl std::fmt::Display for FeederStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feeder model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feeders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub area: String,
    pub status: FeederStatus,
    pub expected_restore: Option<DateTime<Utc>>,
    /// Staff member responsible for this feeder (role=staff)
    pub staff_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StaffId",
        to = "super::user::Column::Id"
    )]
    AssignedStaff,
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignments,
    #[sea_orm(has_many = "super::feeder_update::Entity")]
    Updates,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedStaff.def()
    }
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::feeder_update::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Updates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
