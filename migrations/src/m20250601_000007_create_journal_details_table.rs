use sea_orm_migration::prelude::*;

use crate::m20250601_000001_create_products_table::Products;
use crate::m20250601_000005_create_accounts_table::Accounts;
use crate::m20250601_000006_create_journal_entries_table::JournalEntries;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JournalDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalDetails::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JournalDetails::JournalId).uuid().not_null())
                    .col(ColumnDef::new(JournalDetails::AccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(JournalDetails::LineNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalDetails::Debit)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(JournalDetails::Credit)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(JournalDetails::Description).text().null())
                    .col(ColumnDef::new(JournalDetails::ProductId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_details_journal")
                            .from(JournalDetails::Table, JournalDetails::JournalId)
                            .to(JournalEntries::Table, JournalEntries::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_details_account")
                            .from(JournalDetails::Table, JournalDetails::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_details_product")
                            .from(JournalDetails::Table, JournalDetails::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_details_journal")
                    .table(JournalDetails::Table)
                    .col(JournalDetails::JournalId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_details_account")
                    .table(JournalDetails::Table)
                    .col(JournalDetails::AccountId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JournalDetails::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum JournalDetails {
    Table,
    Id,
    JournalId,
    AccountId,
    LineNumber,
    Debit,
    Credit,
    Description,
    ProductId,
}
