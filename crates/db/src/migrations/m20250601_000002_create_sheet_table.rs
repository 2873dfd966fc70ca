//! Create sheet table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sheet::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sheet::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sheet::OwnerId).string_len(32).not_null())
                    .col(ColumnDef::new(Sheet::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Sheet::Venue).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Sheet::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Sheet::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Sheet::ApprovedBy).string_len(32))
                    .col(ColumnDef::new(Sheet::ApprovedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Sheet::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Sheet::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sheet_owner")
                            .from(Sheet::Table, Sheet::OwnerId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: owner_id (for per-admin listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_sheet_owner_id")
                    .table(Sheet::Table)
                    .col(Sheet::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Index: status (for moderation views)
        manager
            .create_index(
                Index::create()
                    .name("idx_sheet_status")
                    .table(Sheet::Table)
                    .col(Sheet::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sheet::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sheet {
    Table,
    Id,
    OwnerId,
    Title,
    Venue,
    Description,
    Status,
    ApprovedBy,
    ApprovedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
