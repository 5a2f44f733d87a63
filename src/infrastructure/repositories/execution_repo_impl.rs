// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_execution::{
    CrawlExecution, ExecutionStatus, WebPage, WebPageLink,
};
use crate::domain::models::crawl_result::CrawledLink;
use crate::domain::repositories::execution_repository::ExecutionRepository;
use crate::domain::repositories::record_repository::RepositoryError;
use crate::infrastructure::database::entities::{
    crawl_execution as execution_entity, web_page_link as link_entity,
    website_record as record_entity,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

// Keeps each multi-row insert below SQLite's bound parameter limit.
const LINK_INSERT_BATCH: usize = 500;

/// 爬取执行仓库实现
#[derive(Clone)]
pub struct ExecutionRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ExecutionRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn link_model(execution_id: Uuid, link: &CrawledLink) -> link_entity::ActiveModel {
    link_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        execution_id: Set(execution_id),
        from_url: Set(link.from_url.clone()),
        to_url: Set(link.to_url.clone()),
        title: Set(link.title.clone()),
        crawl_time: Set(link.crawl_time.map(Into::into)),
    }
}

async fn ensure_record_exists<C: ConnectionTrait>(
    conn: &C,
    record_id: &str,
) -> Result<(), RepositoryError> {
    record_entity::Entity::find_by_id(record_id.to_string())
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or(RepositoryError::NotFound)
}

/// 将链接行组装为页面节点和有向边，起始页面排在首位
fn build_graph(mut links: Vec<link_entity::Model>) -> (Vec<WebPage>, Vec<WebPageLink>) {
    links.sort_by_key(|link| link.from_url.is_some());

    let mut nodes: Vec<WebPage> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut edges = Vec::new();

    for link in links {
        let crawl_time = link.crawl_time.map(|t| t.with_timezone(&Utc));
        match index.get(&link.to_url) {
            Some(&i) => {
                if nodes[i].crawl_time.is_none() && crawl_time.is_some() {
                    nodes[i].title = link.title.clone();
                    nodes[i].crawl_time = crawl_time;
                }
            }
            None => {
                index.insert(link.to_url.clone(), nodes.len());
                nodes.push(WebPage {
                    url: link.to_url.clone(),
                    title: link.title.clone(),
                    crawl_time,
                });
            }
        }

        if let Some(from_url) = link.from_url {
            if !index.contains_key(&from_url) {
                index.insert(from_url.clone(), nodes.len());
                nodes.push(WebPage {
                    url: from_url.clone(),
                    title: None,
                    crawl_time: None,
                });
            }
            edges.push(WebPageLink {
                source_url: from_url,
                destination_url: link.to_url,
            });
        }
    }

    (nodes, edges)
}

#[async_trait]
impl ExecutionRepository for ExecutionRepositoryImpl {
    async fn create_execution(
        &self,
        record_id: &str,
        start: &CrawledLink,
        links: &[CrawledLink],
    ) -> Result<Uuid, RepositoryError> {
        let txn = self.db.begin().await?;
        ensure_record_exists(&txn, record_id).await?;

        let execution_id = Uuid::new_v4();
        let now = Utc::now();

        execution_entity::Entity::insert(execution_entity::ActiveModel {
            id: Set(execution_id),
            record_id: Set(record_id.to_string()),
            start_url: Set(start.to_url.clone()),
            status: Set(ExecutionStatus::Completed.to_string()),
            error: Set(None),
            created_at: Set(now.into()),
        })
        .exec_without_returning(&txn)
        .await?;

        let rows: Vec<link_entity::ActiveModel> = std::iter::once(start)
            .chain(links.iter())
            .map(|link| link_model(execution_id, link))
            .collect();
        for batch in rows.chunks(LINK_INSERT_BATCH) {
            link_entity::Entity::insert_many(batch.to_vec())
                .exec_without_returning(&txn)
                .await?;
        }

        record_entity::Entity::update_many()
            .col_expr(
                record_entity::Column::LastExecutionId,
                Expr::value(Some(execution_id)),
            )
            .col_expr(
                record_entity::Column::UpdatedAt,
                Expr::value(now.fixed_offset()),
            )
            .filter(record_entity::Column::Id.eq(record_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(execution_id)
    }

    async fn create_failed_execution(
        &self,
        record_id: &str,
        start_url: &str,
        error: &str,
    ) -> Result<Uuid, RepositoryError> {
        let txn = self.db.begin().await?;
        ensure_record_exists(&txn, record_id).await?;

        let failed = ExecutionStatus::Failed.to_string();
        let previous: Vec<Uuid> = execution_entity::Entity::find()
            .select_only()
            .column(execution_entity::Column::Id)
            .filter(execution_entity::Column::RecordId.eq(record_id))
            .filter(execution_entity::Column::Status.eq(failed.clone()))
            .into_tuple()
            .all(&txn)
            .await?;

        if !previous.is_empty() {
            execution_entity::Entity::delete_many()
                .filter(execution_entity::Column::Id.is_in(previous))
                .exec(&txn)
                .await?;
        }

        let execution_id = Uuid::new_v4();
        execution_entity::Entity::insert(execution_entity::ActiveModel {
            id: Set(execution_id),
            record_id: Set(record_id.to_string()),
            start_url: Set(start_url.to_string()),
            status: Set(failed),
            error: Set(Some(error.to_string())),
            created_at: Set(Utc::now().into()),
        })
        .exec_without_returning(&txn)
        .await?;

        txn.commit().await?;
        Ok(execution_id)
    }

    async fn delete_execution(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let txn = self.db.begin().await?;

        link_entity::Entity::delete_many()
            .filter(link_entity::Column::ExecutionId.eq(id))
            .exec(&txn)
            .await?;
        let deleted = execution_entity::Entity::delete_by_id(id).exec(&txn).await?;

        record_entity::Entity::update_many()
            .col_expr(
                record_entity::Column::LastExecutionId,
                Expr::value(Option::<Uuid>::None),
            )
            .filter(record_entity::Column::LastExecutionId.eq(id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(deleted.rows_affected > 0)
    }

    async fn delete_superseded_executions(
        &self,
        record_id: &str,
        keep: Uuid,
    ) -> Result<Vec<Uuid>, RepositoryError> {
        let txn = self.db.begin().await?;

        let stale: Vec<Uuid> = execution_entity::Entity::find()
            .select_only()
            .column(execution_entity::Column::Id)
            .filter(execution_entity::Column::RecordId.eq(record_id))
            .filter(execution_entity::Column::Status.eq(ExecutionStatus::Completed.to_string()))
            .filter(execution_entity::Column::Id.ne(keep))
            .into_tuple()
            .all(&txn)
            .await?;

        if !stale.is_empty() {
            link_entity::Entity::delete_many()
                .filter(link_entity::Column::ExecutionId.is_in(stale.clone()))
                .exec(&txn)
                .await?;
            execution_entity::Entity::delete_many()
                .filter(execution_entity::Column::Id.is_in(stale.clone()))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(stale)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlExecution>, RepositoryError> {
        let Some(execution) = execution_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
        else {
            return Ok(None);
        };

        let status: ExecutionStatus = execution.status.parse().map_err(|_| {
            RepositoryError::InvalidData(format!(
                "unknown status {} on execution {}",
                execution.status, execution.id
            ))
        })?;

        let links = link_entity::Entity::find()
            .filter(link_entity::Column::ExecutionId.eq(id))
            .all(self.db.as_ref())
            .await?;
        let (nodes, edges) = build_graph(links);

        Ok(Some(CrawlExecution {
            id: execution.id,
            record_id: execution.record_id,
            start_url: execution.start_url,
            status,
            error: execution.error,
            created_at: execution.created_at.with_timezone(&Utc),
            nodes,
            edges,
        }))
    }
}
