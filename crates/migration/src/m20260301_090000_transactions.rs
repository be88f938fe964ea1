//! Creates the `transactions` table.
//!
//! `deleted_at` marks soft-deleted rows; reads filter on it, so it is indexed
//! together with `created_at`, the column exports page by.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    TransactionId,
    NoRef,
    OrderTypeCode,
    OrderTypeName,
    TransactionTypeCode,
    TransactionTypeName,
    TransactionDate,
    FromAccountNumber,
    FromAccountName,
    FromAccountProductName,
    ToAccountNumber,
    ToAccountName,
    ToAccountProductName,
    Amount,
    Status,
    Description,
    Method,
    Currency,
    Metadata,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TransactionId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::NoRef)
                            .string_len(64)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Transactions::OrderTypeCode)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::OrderTypeName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TransactionTypeCode)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TransactionTypeName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TransactionDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::FromAccountNumber)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::FromAccountName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::FromAccountProductName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ToAccountNumber)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ToAccountName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ToAccountProductName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Amount).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Status)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Description)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Transactions::Method)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Currency)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Metadata)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-transaction_id-unique")
                    .table(Transactions::Table)
                    .col(Transactions::TransactionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-deleted_at-created_at")
                    .table(Transactions::Table)
                    .col(Transactions::DeletedAt)
                    .col(Transactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-transaction_date")
                    .table(Transactions::Table)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}
