//! Migration to create feeders table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feeders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Feeders::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Feeders::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Feeders::Area).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Feeders::Status)
                            .string_len(20)
                            .not_null()
                            .default("Working"),
                    )
                    .col(
                        ColumnDef::new(Feeders::ExpectedRestore)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Feeders::StaffId).string().null())
                    .col(
                        ColumnDef::new(Feeders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Feeders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feeders_staff")
                            .from(Feeders::Table, Feeders::StaffId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feeders_staff_id")
                    .table(Feeders::Table)
                    .col(Feeders::StaffId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feeders_status")
                    .table(Feeders::Table)
                    .col(Feeders::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feeders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Feeders {
    Table,
    Id,
    Name,
    Area,
    Status,
    ExpectedRestore,
    StaffId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
