//! Migration to create feeder_updates table (status history)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeederUpdates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeederUpdates::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeederUpdates::FeederId).string().not_null())
                    .col(ColumnDef::new(FeederUpdates::UpdatedBy).string().not_null())
                    .col(
                        ColumnDef::new(FeederUpdates::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeederUpdates::Remarks).text().null())
                    .col(
                        ColumnDef::new(FeederUpdates::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feeder_updates_feeder")
                            .from(FeederUpdates::Table, FeederUpdates::FeederId)
                            .to(Feeders::Table, Feeders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feeder_updates_user")
                            .from(FeederUpdates::Table, FeederUpdates::UpdatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feeder_updates_feeder_id")
                    .table(FeederUpdates::Table)
                    .col(FeederUpdates::FeederId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feeder_updates_timestamp")
                    .table(FeederUpdates::Table)
                    .col(FeederUpdates::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeederUpdates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FeederUpdates {
    Table,
    Id,
    FeederId,
    UpdatedBy,
    Status,
    Remarks,
    Timestamp,
}

#[derive(Iden)]
enum Feeders {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
