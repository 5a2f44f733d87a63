// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{record, setup_db};
use chrono::Utc;
use recrawl::domain::models::crawl_execution::ExecutionStatus;
use recrawl::domain::models::crawl_result::{CrawlOutcome, CrawlResult, CrawledLink};
use recrawl::domain::repositories::execution_repository::ExecutionRepository;
use recrawl::domain::repositories::record_repository::RecordRepository;
use recrawl::domain::services::result_ingestion::{IngestionOutcome, ResultIngestion};
use recrawl::infrastructure::database::entities::crawl_execution as execution_entity;
use recrawl::infrastructure::repositories::execution_repo_impl::ExecutionRepositoryImpl;
use recrawl::infrastructure::repositories::record_repo_impl::RecordRepositoryImpl;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use std::sync::Arc;

type Ingestion = ResultIngestion<RecordRepositoryImpl, ExecutionRepositoryImpl>;

struct Harness {
    db: Arc<sea_orm::DatabaseConnection>,
    records: Arc<RecordRepositoryImpl>,
    executions: Arc<ExecutionRepositoryImpl>,
    ingestion: Arc<Ingestion>,
}

async fn harness() -> Harness {
    let db = setup_db().await;
    let records = Arc::new(RecordRepositoryImpl::new(db.clone()));
    let executions = Arc::new(ExecutionRepositoryImpl::new(db.clone()));
    let ingestion = Arc::new(ResultIngestion::new(records.clone(), executions.clone()));
    Harness {
        db,
        records,
        executions,
        ingestion,
    }
}

fn completed(record_id: &str, pages: &[&str]) -> CrawlOutcome {
    let start_url = format!("https://{}.example.com", record_id);
    let mut links = vec![CrawledLink::start(
        start_url.clone(),
        Some("Home".to_string()),
        Utc::now(),
    )];
    for page in pages {
        links.push(
            CrawledLink::between(start_url.clone(), format!("{}/{}", start_url, page))
                .crawled(page.to_string(), Utc::now()),
        );
    }
    links.push(CrawledLink::between(
        start_url.clone(),
        "https://elsewhere.org".to_string(),
    ));
    CrawlOutcome::Completed(CrawlResult {
        record_id: record_id.to_string(),
        start_url,
        links,
    })
}

fn failed(record_id: &str, error: &str) -> CrawlOutcome {
    CrawlOutcome::Failed {
        record_id: record_id.to_string(),
        start_url: format!("https://{}.example.com", record_id),
        error: error.to_string(),
    }
}

async fn completed_executions(db: &sea_orm::DatabaseConnection, record_id: &str) -> u64 {
    execution_entity::Entity::find()
        .filter(execution_entity::Column::RecordId.eq(record_id))
        .filter(execution_entity::Column::Status.eq("completed"))
        .count(db)
        .await
        .unwrap()
}

/// 新结果替换记录的上一次执行
#[tokio::test]
async fn test_new_result_supersedes_previous_execution() {
    let h = harness().await;
    h.records.create(&record("r1", 60, true)).await.unwrap();

    let first = match h.ingestion.ingest(completed("r1", &["a"])).await.unwrap() {
        IngestionOutcome::Stored {
            execution_id,
            superseded,
        } => {
            assert_eq!(superseded, None);
            execution_id
        }
        other => panic!("unexpected outcome: {:?}", other),
    };
    let stored = h.records.find_by_id("r1").await.unwrap().unwrap();
    assert_eq!(stored.last_execution_id, Some(first));

    let second = match h.ingestion.ingest(completed("r1", &["b", "c"])).await.unwrap() {
        IngestionOutcome::Stored {
            execution_id,
            superseded,
        } => {
            assert_eq!(superseded, Some(first));
            execution_id
        }
        other => panic!("unexpected outcome: {:?}", other),
    };

    assert_ne!(first, second);
    assert!(h.executions.find_by_id(first).await.unwrap().is_none());
    let stored = h.records.find_by_id("r1").await.unwrap().unwrap();
    assert_eq!(stored.last_execution_id, Some(second));
    assert_eq!(completed_executions(&h.db, "r1").await, 1);

    let execution = h.executions.find_by_id(second).await.unwrap().unwrap();
    assert_eq!(execution.status, ExecutionStatus::Completed);
    assert_eq!(execution.start_url, "https://r1.example.com");
    assert_eq!(execution.nodes[0].url, "https://r1.example.com");
    assert_eq!(execution.nodes[0].title.as_deref(), Some("Home"));
    // start page, b, c and the external page
    assert_eq!(execution.nodes.len(), 4);
    assert_eq!(execution.edges.len(), 3);
    let external = execution
        .nodes
        .iter()
        .find(|node| node.url == "https://elsewhere.org")
        .unwrap();
    assert!(!external.is_crawled());
}

/// 失败结果保留上一次成功执行
#[tokio::test]
async fn test_failure_keeps_last_successful_execution() {
    let h = harness().await;
    h.records.create(&record("r1", 60, true)).await.unwrap();

    let IngestionOutcome::Stored { execution_id, .. } =
        h.ingestion.ingest(completed("r1", &["a"])).await.unwrap()
    else {
        panic!("expected stored execution");
    };

    let first_failure = match h.ingestion.ingest(failed("r1", "dns error")).await.unwrap() {
        IngestionOutcome::RecordedFailure { execution_id } => execution_id,
        other => panic!("unexpected outcome: {:?}", other),
    };
    let second_failure = match h.ingestion.ingest(failed("r1", "timeout")).await.unwrap() {
        IngestionOutcome::RecordedFailure { execution_id } => execution_id,
        other => panic!("unexpected outcome: {:?}", other),
    };

    let stored = h.records.find_by_id("r1").await.unwrap().unwrap();
    assert_eq!(stored.last_execution_id, Some(execution_id));
    assert!(h.executions.find_by_id(execution_id).await.unwrap().is_some());

    assert!(h.executions.find_by_id(first_failure).await.unwrap().is_none());
    let failure = h
        .executions
        .find_by_id(second_failure)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(failure.status, ExecutionStatus::Failed);
    assert_eq!(failure.error.as_deref(), Some("timeout"));
    assert!(failure.nodes.is_empty());
}

#[tokio::test]
async fn test_result_for_deleted_record_is_discarded() {
    let h = harness().await;

    let outcome = h.ingestion.ingest(completed("ghost", &["a"])).await.unwrap();
    assert_eq!(outcome, IngestionOutcome::Discarded);

    let outcome = h.ingestion.ingest(failed("ghost", "boom")).await.unwrap();
    assert_eq!(outcome, IngestionOutcome::Discarded);
}

/// 同一记录的并发结果串行写入，只保留一个当前执行
#[tokio::test]
async fn test_concurrent_results_for_same_record_do_not_interleave() {
    let h = harness().await;
    h.records.create(&record("r1", 60, true)).await.unwrap();

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let ingestion = h.ingestion.clone();
            tokio::spawn(async move {
                let page = format!("page-{}", i);
                ingestion.ingest(completed("r1", &[page.as_str()])).await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(completed_executions(&h.db, "r1").await, 1);
    let stored = h.records.find_by_id("r1").await.unwrap().unwrap();
    let current = stored.last_execution_id.unwrap();
    assert!(h.executions.find_by_id(current).await.unwrap().is_some());
}

/// 之前未能删除的旧执行在下一次成功摄取时被清理
#[tokio::test]
async fn test_next_result_sweeps_orphaned_executions() {
    let h = harness().await;
    h.records.create(&record("r1", 60, true)).await.unwrap();

    let start = CrawledLink::start("https://r1.example.com", None, Utc::now());
    let orphan = h
        .executions
        .create_execution("r1", &start, &[])
        .await
        .unwrap();
    let previous = h
        .executions
        .create_execution("r1", &start, &[])
        .await
        .unwrap();
    assert_eq!(completed_executions(&h.db, "r1").await, 2);

    let outcome = h.ingestion.ingest(completed("r1", &["a"])).await.unwrap();
    let IngestionOutcome::Stored {
        execution_id,
        superseded,
    } = outcome
    else {
        panic!("unexpected outcome: {:?}", outcome);
    };

    assert_eq!(superseded, Some(previous));
    assert!(h.executions.find_by_id(orphan).await.unwrap().is_none());
    assert!(h.executions.find_by_id(previous).await.unwrap().is_none());
    assert_eq!(completed_executions(&h.db, "r1").await, 1);
    let stored = h.records.find_by_id("r1").await.unwrap().unwrap();
    assert_eq!(stored.last_execution_id, Some(execution_id));
}
