//! Create notification table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notification::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notification::Kind).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Notification::SubjectId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notification::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Notification::SheetId).string_len(32))
                    .col(ColumnDef::new(Notification::UserName).string_len(256))
                    .col(ColumnDef::new(Notification::UserPhone).string_len(32))
                    .col(ColumnDef::new(Notification::UserOrganization).string_len(256))
                    .col(ColumnDef::new(Notification::SheetTitle).string_len(256))
                    .col(ColumnDef::new(Notification::SheetVenue).string_len(256))
                    .col(
                        ColumnDef::new(Notification::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Notification::ResolvedBy).string_len(32))
                    .col(
                        ColumnDef::new(Notification::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Notification::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_user")
                            .from(Notification::Table, Notification::UserId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (status, created_at) (for the pending queue)
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_status_created_at")
                    .table(Notification::Table)
                    .col(Notification::Status)
                    .col(Notification::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: subject_id (one live notification per subject assumed)
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_subject_id")
                    .table(Notification::Table)
                    .col(Notification::SubjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Notification {
    Table,
    Id,
    Kind,
    SubjectId,
    UserId,
    SheetId,
    UserName,
    UserPhone,
    UserOrganization,
    SheetTitle,
    SheetVenue,
    Status,
    ResolvedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
