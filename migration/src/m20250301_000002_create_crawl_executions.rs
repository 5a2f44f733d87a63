use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CrawlExecutions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CrawlExecutions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CrawlExecutions::RecordId).string().not_null())
                    .col(ColumnDef::new(CrawlExecutions::StartUrl).string().not_null())
                    .col(ColumnDef::new(CrawlExecutions::Status).string().not_null())
                    .col(ColumnDef::new(CrawlExecutions::Error).text())
                    .col(
                        ColumnDef::new(CrawlExecutions::CreatedAt)
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
                    .name("idx_crawl_executions_record_status")
                    .table(CrawlExecutions::Table)
                    .col(CrawlExecutions::RecordId)
                    .col(CrawlExecutions::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CrawlExecutions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CrawlExecutions {
    Table,
    Id,
    RecordId,
    StartUrl,
    Status,
    Error,
    CreatedAt,
}
