//! Create `bank_account` table.
//! One row per account; `account_number` is unique across the table.
//! `balance` precision stays within 16 digits, the most SQLite's decimal type accepts.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BankAccount::Table)
                    .if_not_exists()
                    .col(pk_auto(BankAccount::Id))
                    .col(string_len(BankAccount::AccountNumber, 34).not_null())
                    .col(string_len(BankAccount::AccountHolderName, 128).not_null())
                    .col(decimal_len(BankAccount::Balance, 15, 2).not_null())
                    .col(timestamp_with_time_zone(BankAccount::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(BankAccount::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bank_account_number_unique")
                    .table(BankAccount::Table)
                    .col(BankAccount::AccountNumber)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BankAccount::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BankAccount {
    Table,
    Id,
    AccountNumber,
    AccountHolderName,
    Balance,
    CreatedAt,
    UpdatedAt,
}
