//! Migration: Create the presets table.
//!
//! Presets belong to a user and are removed with it.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Presets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Presets::PresetId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Presets::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Presets::PresetName).string_len(100).not_null())
                    .col(ColumnDef::new(Presets::Pairs).text().not_null())
                    .col(ColumnDef::new(Presets::Interval).string_len(10).not_null())
                    .col(ColumnDef::new(Presets::Percent).double().not_null())
                    .col(
                        ColumnDef::new(Presets::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Presets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Presets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Presets::AlertsTriggered)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Presets::LastAlert)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_presets_user_id")
                            .from(Presets::Table, Presets::UserId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Start-up loading and per-user listings filter on these
        manager
            .create_index(
                Index::create()
                    .name("idx_presets_user_active")
                    .table(Presets::Table)
                    .col(Presets::UserId)
                    .col(Presets::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_presets_user_active")
                    .table(Presets::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Presets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Presets {
    Table,
    PresetId,
    UserId,
    PresetName,
    Pairs,
    Interval,
    Percent,
    IsActive,
    CreatedAt,
    UpdatedAt,
    AlertsTriggered,
    LastAlert,
}
