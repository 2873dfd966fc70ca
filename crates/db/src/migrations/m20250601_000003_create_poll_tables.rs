//! Create poll, vote_slot, and opinion_response tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Poll::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Poll::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Poll::SheetId).string_len(32).not_null())
                    .col(ColumnDef::new(Poll::Title).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Poll::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Poll::Options)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Poll::Categories)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Poll::PollType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Poll::ParticipantCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Poll::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Poll::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_poll_sheet")
                            .from(Poll::Table, Poll::SheetId)
                            .to(Sheet::Table, Sheet::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: sheet_id (for per-sheet listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_poll_sheet_id")
                    .table(Poll::Table)
                    .col(Poll::SheetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VoteSlot::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VoteSlot::PollId).string_len(32).not_null())
                    .col(ColumnDef::new(VoteSlot::SlotIndex).integer().not_null())
                    .col(
                        ColumnDef::new(VoteSlot::Count)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(VoteSlot::PollId)
                            .col(VoteSlot::SlotIndex),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_slot_poll")
                            .from(VoteSlot::Table, VoteSlot::PollId)
                            .to(Poll::Table, Poll::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OpinionResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OpinionResponse::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OpinionResponse::PollId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(OpinionResponse::Body).text().not_null())
                    .col(
                        ColumnDef::new(OpinionResponse::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_opinion_response_poll")
                            .from(OpinionResponse::Table, OpinionResponse::PollId)
                            .to(Poll::Table, Poll::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: poll_id (for response listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_opinion_response_poll_id")
                    .table(OpinionResponse::Table)
                    .col(OpinionResponse::PollId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OpinionResponse::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VoteSlot::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Poll::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Poll {
    Table,
    Id,
    SheetId,
    Title,
    Description,
    Options,
    Categories,
    PollType,
    ParticipantCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum VoteSlot {
    Table,
    PollId,
    SlotIndex,
    Count,
}

#[derive(Iden)]
enum OpinionResponse {
    Table,
    Id,
    PollId,
    Body,
    CreatedAt,
}

#[derive(Iden)]
enum Sheet {
    Table,
    Id,
}
