// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

/// 执行中的一条链接，`from_url` 为空的行是起始页面
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "web_page_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub execution_id: Uuid,
    pub from_url: Option<String>,
    pub to_url: String,
    pub title: Option<String>,
    pub crawl_time: Option<ChronoDateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::crawl_execution::Entity",
        from = "Column::ExecutionId",
        to = "super::crawl_execution::Column::Id"
    )]
    CrawlExecution,
}

impl Related<super::crawl_execution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CrawlExecution.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
