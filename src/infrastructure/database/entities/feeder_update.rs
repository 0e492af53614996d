//! Feeder status update history entity
//!
//! Append-only: rows are written together with the feeder status change
//! and deleted only in bulk when the parent feeder is deleted.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::feeder::FeederStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feeder_updates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub feeder_id: String,
    /// Staff member who reported the change
    pub updated_by: String,
    pub status: FeederStatus,
    pub remarks: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::feeder::Entity",
        from = "Column::FeederId",
        to = "super::feeder::Column::Id"
    )]
    Feeder,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UpdatedBy",
        to = "super::user::Column::Id"
    )]
    UpdatedByUser,
}

impl Related<super::feeder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feeder.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UpdatedByUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
