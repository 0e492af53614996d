//! User→feeder assignment entity
//!
//! One row per end user: re-assignment overwrites the feeder reference
//! in place, it never accumulates duplicates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_id: String,
    pub feeder_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::feeder::Entity",
        from = "Column::FeederId",
        to = "super::feeder::Column::Id"
    )]
    Feeder,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::feeder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feeder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
