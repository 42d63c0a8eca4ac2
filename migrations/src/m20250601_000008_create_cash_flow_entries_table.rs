use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CashFlowEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashFlowEntries::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashFlowEntries::Date).timestamp().not_null())
                    .col(
                        ColumnDef::new(CashFlowEntries::Description)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashFlowEntries::Category).string().not_null())
                    .col(ColumnDef::new(CashFlowEntries::Amount).decimal().not_null())
                    .col(
                        ColumnDef::new(CashFlowEntries::Direction)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlowEntries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CashFlowEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CashFlowEntries {
    Table,
    Id,
    Date,
    Description,
    Category,
    Amount,
    Direction,
    CreatedAt,
}
