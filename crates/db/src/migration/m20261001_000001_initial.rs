//! Initial schema: users, top-ups, expenses, balances, auto top-up settings
//! and notifications.
//!
//! Built with the schema builder rather than raw SQL so the same migration
//! runs on Postgres and on the in-memory SQLite used by tests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Users::FullName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TopUps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TopUps::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TopUps::UserId).uuid().not_null())
                    .col(
                        money(TopUps::Amount)
                            .check(Expr::col(TopUps::Amount).gt(0))
                            .to_owned(),
                    )
                    .col(ColumnDef::new(TopUps::TopUpType).string_len(50).not_null())
                    .col(ColumnDef::new(TopUps::PromoCode).string_len(50).null())
                    .col(ColumnDef::new(TopUps::VoucherCode).string_len(50).null())
                    .col(timestamp(TopUps::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_top_ups_user")
                            .from(TopUps::Table, TopUps::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_top_ups_user_created")
                    .table(TopUps::Table)
                    .col(TopUps::UserId)
                    .col(TopUps::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Expenses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Expenses::UserId).uuid().not_null())
                    .col(ColumnDef::new(Expenses::TopUpId).uuid().null())
                    .col(
                        money(Expenses::Amount)
                            .check(Expr::col(Expenses::Amount).gt(0))
                            .to_owned(),
                    )
                    .col(ColumnDef::new(Expenses::Purpose).string_len(255).not_null())
                    .col(ColumnDef::new(Expenses::ExpenseType).string_len(50).not_null())
                    .col(timestamp(Expenses::CreatedAt))
                    .col(timestamp(Expenses::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_user")
                            .from(Expenses::Table, Expenses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_top_up")
                            .from(Expenses::Table, Expenses::TopUpId)
                            .to(TopUps::Table, TopUps::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_expenses_user_created")
                    .table(Expenses::Table)
                    .col(Expenses::UserId)
                    .col(Expenses::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserBalances::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        money(UserBalances::Balance)
                            .default(0)
                            .check(Expr::col(UserBalances::Balance).gte(0))
                            .to_owned(),
                    )
                    .col(timestamp(UserBalances::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_balances_user")
                            .from(UserBalances::Table, UserBalances::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AutoTopUpSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AutoTopUpSettings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AutoTopUpSettings::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        money(AutoTopUpSettings::MinBalance)
                            .check(Expr::col(AutoTopUpSettings::MinBalance).gt(0))
                            .to_owned(),
                    )
                    .col(
                        money(AutoTopUpSettings::TopUpAmount)
                            .check(Expr::col(AutoTopUpSettings::TopUpAmount).gt(0))
                            .to_owned(),
                    )
                    .col(
                        ColumnDef::new(AutoTopUpSettings::Frequency)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AutoTopUpSettings::IsEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp(AutoTopUpSettings::CreatedAt))
                    .col(timestamp(AutoTopUpSettings::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_auto_top_up_settings_user")
                            .from(AutoTopUpSettings::Table, AutoTopUpSettings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).uuid().not_null())
                    .col(ColumnDef::new(Notifications::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::NotificationType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamp(Notifications::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_user")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_user_created")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(AutoTopUpSettings::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(UserBalances::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TopUps::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

/// NUMERIC(14, 2), never a float on Postgres.
fn money<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column).decimal_len(14, 2).not_null().to_owned()
}

fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TopUps {
    Table,
    Id,
    UserId,
    Amount,
    TopUpType,
    PromoCode,
    VoucherCode,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    UserId,
    TopUpId,
    Amount,
    Purpose,
    ExpenseType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserBalances {
    Table,
    UserId,
    Balance,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AutoTopUpSettings {
    Table,
    Id,
    UserId,
    MinBalance,
    TopUpAmount,
    Frequency,
    IsEnabled,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Title,
    Message,
    NotificationType,
    IsRead,
    CreatedAt,
}
