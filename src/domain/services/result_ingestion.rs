// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_result::{CrawlOutcome, CrawlResult, CrawledLink};
use crate::domain::repositories::execution_repository::ExecutionRepository;
use crate::domain::repositories::record_repository::RecordRepository;
use crate::queue::dispatcher::InFlightTracker;
use crate::utils::errors::IngestionError;
use crate::utils::keyed_lock::KeyedLocks;
use metrics::counter;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 结果摄取的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionOutcome {
    /// 新执行已保存，`superseded` 为被替换的旧执行
    Stored {
        execution_id: Uuid,
        superseded: Option<Uuid>,
    },
    /// 已记录失败执行
    RecordedFailure { execution_id: Uuid },
    /// 记录已不存在，结果被丢弃
    Discarded,
}

/// 结果摄取服务
///
/// 将工作池上报的结果与记录存储对账：保存新的执行图并删除被替换的旧执行。
/// 同一记录的结果串行处理。
pub struct ResultIngestion<R, E>
where
    R: RecordRepository + 'static,
    E: ExecutionRepository + 'static,
{
    records: Arc<R>,
    executions: Arc<E>,
    locks: KeyedLocks,
    in_flight: Option<Arc<InFlightTracker>>,
}

impl<R, E> ResultIngestion<R, E>
where
    R: RecordRepository + 'static,
    E: ExecutionRepository + 'static,
{
    pub fn new(records: Arc<R>, executions: Arc<E>) -> Self {
        Self {
            records,
            executions,
            locks: KeyedLocks::new(),
            in_flight: None,
        }
    }

    /// 摄取结果后清除派发器设置的在途标记
    pub fn with_in_flight(mut self, tracker: Arc<InFlightTracker>) -> Self {
        self.in_flight = Some(tracker);
        self
    }

    /// 摄取一个作业结果
    ///
    /// # 返回值
    ///
    /// * `Ok(IngestionOutcome)` - 处理结果
    /// * `Err(IngestionError::MalformedResult)` - 结果缺少起始页面
    /// * `Err(IngestionError::Repository)` - 存储写入失败，执行未被部分写入
    pub async fn ingest(&self, outcome: CrawlOutcome) -> Result<IngestionOutcome, IngestionError> {
        let record_id = outcome.record_id().to_string();
        let guard = self.locks.lock(&record_id).await;

        let result = match outcome {
            CrawlOutcome::Completed(result) => self.store(result).await,
            CrawlOutcome::Failed {
                record_id,
                start_url,
                error,
            } => self.record_failure(&record_id, &start_url, &error).await,
        };

        if let Some(tracker) = &self.in_flight {
            tracker.clear(&record_id);
        }
        drop(guard);

        match &result {
            Ok(IngestionOutcome::Stored { .. }) => {
                counter!("crawl_results_ingested_total").increment(1)
            }
            Ok(IngestionOutcome::RecordedFailure { .. }) => {
                counter!("crawl_results_failed_total").increment(1)
            }
            Ok(IngestionOutcome::Discarded) => {
                counter!("crawl_results_discarded_total").increment(1)
            }
            Err(_) => {}
        }
        result
    }

    async fn store(&self, result: CrawlResult) -> Result<IngestionOutcome, IngestionError> {
        let Some(record) = self.records.find_by_id(&result.record_id).await? else {
            warn!(record_id = %result.record_id, "Record vanished before its crawl result arrived, discarding");
            return Ok(IngestionOutcome::Discarded);
        };

        let start = result.start_link().ok_or_else(|| {
            IngestionError::MalformedResult(format!(
                "result for record {} has no start link",
                result.record_id
            ))
        })?;
        let links: Vec<CrawledLink> = result.page_links().cloned().collect();

        // New graph first; the old one stays reachable if this write fails.
        let execution_id = self
            .executions
            .create_execution(&record.id, start, &links)
            .await?;

        // Sweeps every older completed execution, including ones a failed
        // delete left behind on an earlier ingest.
        let superseded = match self
            .executions
            .delete_superseded_executions(&record.id, execution_id)
            .await
        {
            Ok(deleted) => {
                let superseded = record
                    .last_execution_id
                    .filter(|previous| deleted.contains(previous));
                let orphans = deleted.len() - usize::from(superseded.is_some());
                if orphans > 0 {
                    info!(record_id = %record.id, orphans, "Removed orphaned executions");
                }
                superseded
            }
            Err(e) => {
                counter!("crawl_executions_orphaned_total").increment(1);
                error!(
                    record_id = %record.id,
                    superseded = ?record.last_execution_id,
                    error = %e,
                    "Failed to delete superseded executions, retrying on the next result"
                );
                None
            }
        };

        info!(
            record_id = %record.id,
            execution_id = %execution_id,
            links = links.len(),
            "Stored crawl execution"
        );
        Ok(IngestionOutcome::Stored {
            execution_id,
            superseded,
        })
    }

    async fn record_failure(
        &self,
        record_id: &str,
        start_url: &str,
        error: &str,
    ) -> Result<IngestionOutcome, IngestionError> {
        if self.records.find_by_id(record_id).await?.is_none() {
            warn!(record_id = %record_id, "Record vanished before its crawl failure arrived, discarding");
            return Ok(IngestionOutcome::Discarded);
        }

        let execution_id = self
            .executions
            .create_failed_execution(record_id, start_url, error)
            .await?;
        warn!(record_id = %record_id, error = %error, "Crawl failed");
        Ok(IngestionOutcome::RecordedFailure { execution_id })
    }
}
