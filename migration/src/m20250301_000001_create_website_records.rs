use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WebsiteRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WebsiteRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WebsiteRecords::Url).string().not_null())
                    .col(ColumnDef::new(WebsiteRecords::BoundaryRegex).string().not_null())
                    .col(ColumnDef::new(WebsiteRecords::Label).string().not_null())
                    .col(
                        ColumnDef::new(WebsiteRecords::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(WebsiteRecords::Tags).json().not_null())
                    .col(
                        ColumnDef::new(WebsiteRecords::PeriodicityInSeconds)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(WebsiteRecords::LastExecutionId).uuid())
                    .col(
                        ColumnDef::new(WebsiteRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WebsiteRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_website_records_is_active")
                    .table(WebsiteRecords::Table)
                    .col(WebsiteRecords::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WebsiteRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WebsiteRecords {
    Table,
    Id,
    Url,
    BoundaryRegex,
    Label,
    IsActive,
    Tags,
    PeriodicityInSeconds,
    LastExecutionId,
    CreatedAt,
    UpdatedAt,
}
