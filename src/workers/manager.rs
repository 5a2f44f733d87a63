// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::execution_repository::ExecutionRepository;
use crate::domain::repositories::record_repository::RecordRepository;
use crate::domain::services::result_ingestion::ResultIngestion;
use crate::queue::job_queue::{JobSource, ResultSink, ResultSource};
use crate::workers::crawl_worker::{CrawlWorker, Crawler};
use crate::workers::ingestion_worker::IngestionWorker;
use crate::workers::worker::Worker;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
///
/// 持有所有后台工作器的任务句柄
#[derive(Default)]
pub struct WorkerManager {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在独立任务中运行工作器
    pub fn spawn_worker<W>(&mut self, worker: W)
    where
        W: Worker + 'static,
    {
        let handle = tokio::spawn(async move {
            match worker.run().await {
                Ok(()) => info!("Worker {} stopped", worker.name()),
                Err(e) => error!("Worker {} stopped with error: {}", worker.name(), e),
            }
        });
        self.handles.push(handle);
    }

    /// 启动爬取工作器
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作器数量
    /// * `jobs` - 共享的作业来源
    /// * `results` - 共享的结果通道
    /// * `crawler` - 爬虫实现
    /// * `idle_backoff` - 来源暂无作业时的等待时间
    pub fn start_crawl_workers(
        &mut self,
        count: usize,
        jobs: Arc<dyn JobSource>,
        results: Arc<dyn ResultSink>,
        crawler: Arc<dyn Crawler>,
        idle_backoff: Duration,
    ) {
        for i in 0..count {
            let worker = CrawlWorker::new(
                format!("crawl-{}", i),
                jobs.clone(),
                results.clone(),
                crawler.clone(),
                idle_backoff,
            );
            self.spawn_worker(worker);
        }
    }

    /// 启动结果摄取工作器
    pub fn start_ingestion_workers<R, E>(
        &mut self,
        count: usize,
        results: Arc<dyn ResultSource>,
        ingestion: Arc<ResultIngestion<R, E>>,
        idle_backoff: Duration,
    ) where
        R: RecordRepository + 'static,
        E: ExecutionRepository + 'static,
    {
        for i in 0..count {
            let worker = IngestionWorker::new(
                format!("ingest-{}", i),
                results.clone(),
                ingestion.clone(),
                idle_backoff,
            );
            self.spawn_worker(worker);
        }
    }

    /// 运行中的工作器数量
    pub fn len(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 等待关闭信号并关闭工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        self.shutdown();
    }

    /// 立即中止所有工作器
    pub fn shutdown(&mut self) {
        info!("Shutting down workers...");
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        info!("Workers shut down successfully");
    }
}
