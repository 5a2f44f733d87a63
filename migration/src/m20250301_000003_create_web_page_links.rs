use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // from_url is NULL for the link between a record and its start page
        manager
            .create_table(
                Table::create()
                    .table(WebPageLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WebPageLinks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WebPageLinks::ExecutionId).uuid().not_null())
                    .col(ColumnDef::new(WebPageLinks::FromUrl).string())
                    .col(ColumnDef::new(WebPageLinks::ToUrl).string().not_null())
                    .col(ColumnDef::new(WebPageLinks::Title).string())
                    .col(ColumnDef::new(WebPageLinks::CrawlTime).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_web_page_links_execution_id")
                    .table(WebPageLinks::Table)
                    .col(WebPageLinks::ExecutionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WebPageLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WebPageLinks {
    Table,
    Id,
    ExecutionId,
    FromUrl,
    ToUrl,
    Title,
    CrawlTime,
}
