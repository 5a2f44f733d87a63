// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_job::CrawlJob;
use crate::domain::models::crawl_result::{CrawlOutcome, CrawlResult};
use crate::queue::job_queue::{DispatchError, JobSource, ResultSink};
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use metrics::histogram;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// 爬虫特质
///
/// 抓取与解析由实现方负责。实现方应只跟进 [`CrawlJob::admits`] 接受的链接，
/// 并在结果中放入一条 `from_url` 为空的起始页面链接。
#[async_trait]
pub trait Crawler: Send + Sync {
    async fn crawl(&self, job: &CrawlJob) -> anyhow::Result<CrawlResult>;
}

/// 爬取工作器
///
/// 从作业来源取出作业，交给爬虫执行，并把结果或失败哨兵发布到结果通道
pub struct CrawlWorker {
    name: String,
    jobs: Arc<dyn JobSource>,
    results: Arc<dyn ResultSink>,
    crawler: Arc<dyn Crawler>,
    idle_backoff: Duration,
}

impl CrawlWorker {
    /// 创建新的爬取工作器
    ///
    /// # 参数
    ///
    /// * `name` - 工作器名称，用于日志
    /// * `jobs` - 作业来源
    /// * `results` - 结果通道
    /// * `crawler` - 爬虫实现
    /// * `idle_backoff` - 来源暂无作业时的等待时间
    pub fn new(
        name: impl Into<String>,
        jobs: Arc<dyn JobSource>,
        results: Arc<dyn ResultSink>,
        crawler: Arc<dyn Crawler>,
        idle_backoff: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            jobs,
            results,
            crawler,
            idle_backoff,
        }
    }

    async fn process_next_job(&self) -> Result<bool, WorkerError> {
        let Some(job) = self.jobs.next_job().await? else {
            return Ok(false);
        };
        self.process(job).await?;
        Ok(true)
    }

    #[instrument(skip(self, job), fields(worker = %self.name, record_id = %job.record_id))]
    async fn process(&self, job: CrawlJob) -> Result<(), WorkerError> {
        let started = Instant::now();

        let outcome = match self.crawler.crawl(&job).await {
            Ok(mut result) => {
                if result.record_id != job.record_id {
                    warn!(reported = %result.record_id, "Crawler reported a different record id, using the job's");
                    result.record_id = job.record_id.clone();
                }
                debug!(links = result.links.len(), "Crawl completed");
                CrawlOutcome::Completed(result)
            }
            Err(e) => {
                warn!(error = %e, "Crawl failed");
                CrawlOutcome::Failed {
                    record_id: job.record_id.clone(),
                    start_url: job.url.clone(),
                    error: format!("{:#}", e),
                }
            }
        };

        histogram!("crawl_duration_seconds").record(started.elapsed().as_secs_f64());
        self.results.publish(outcome).await?;
        Ok(())
    }
}

#[async_trait]
impl Worker for CrawlWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        info!("Crawl worker {} started", self.name);

        loop {
            match self.process_next_job().await {
                Ok(true) => {}
                Ok(false) => sleep(self.idle_backoff).await,
                Err(WorkerError::Queue(DispatchError::Closed)) => {
                    info!("Crawl worker {} stopping, queue closed", self.name);
                    return Ok(());
                }
                Err(e) => {
                    error!("Error processing crawl job: {}", e);
                    sleep(self.idle_backoff).await;
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
