// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::execution_repository::ExecutionRepository;
use crate::domain::repositories::record_repository::RecordRepository;
use crate::domain::services::result_ingestion::ResultIngestion;
use crate::queue::job_queue::{DispatchError, ResultSource};
use crate::utils::errors::{IngestionError, WorkerError};
use crate::workers::worker::Worker;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// 结果摄取工作器
///
/// 从结果来源取出作业结果并交给 [`ResultIngestion`]。
/// 单个结果处理失败只记录日志，不会停止工作器。
pub struct IngestionWorker<R, E>
where
    R: RecordRepository + 'static,
    E: ExecutionRepository + 'static,
{
    name: String,
    results: Arc<dyn ResultSource>,
    ingestion: Arc<ResultIngestion<R, E>>,
    idle_backoff: Duration,
}

impl<R, E> IngestionWorker<R, E>
where
    R: RecordRepository + 'static,
    E: ExecutionRepository + 'static,
{
    pub fn new(
        name: impl Into<String>,
        results: Arc<dyn ResultSource>,
        ingestion: Arc<ResultIngestion<R, E>>,
        idle_backoff: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            results,
            ingestion,
            idle_backoff,
        }
    }

    async fn process_next_result(&self) -> Result<bool, WorkerError> {
        let Some(outcome) = self.results.next_result().await? else {
            return Ok(false);
        };

        let record_id = outcome.record_id().to_string();
        match self.ingestion.ingest(outcome).await {
            Ok(_) => {}
            Err(IngestionError::MalformedResult(reason)) => {
                warn!(record_id = %record_id, "Discarding malformed crawl result: {}", reason);
            }
            Err(e) => {
                error!(record_id = %record_id, "Crawl result lost: {}", e);
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl<R, E> Worker for IngestionWorker<R, E>
where
    R: RecordRepository + 'static,
    E: ExecutionRepository + 'static,
{
    async fn run(&self) -> Result<(), WorkerError> {
        info!("Ingestion worker {} started", self.name);

        loop {
            match self.process_next_result().await {
                Ok(true) => {}
                Ok(false) => sleep(self.idle_backoff).await,
                Err(WorkerError::Queue(DispatchError::Closed)) => {
                    info!("Ingestion worker {} stopping, result source closed", self.name);
                    return Ok(());
                }
                Err(e) => {
                    error!("Error receiving crawl result: {}", e);
                    sleep(self.idle_backoff).await;
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
