// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::job_queue::{DispatchError, JobQueue};
use crate::domain::models::crawl_job::CrawlJob;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use metrics::counter;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// 同一记录的并发爬取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// 总是提交新作业，即使该记录已有作业在排队或运行
    #[default]
    Allow,
    /// 该记录已有作业在排队或运行时跳过本次提交
    SkipIfInFlight,
}

/// 派发结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 作业已提交到队列
    Submitted,
    /// 按策略跳过
    Skipped,
}

/// 在途作业跟踪器
///
/// 记录每个记录最近一次提交作业的时间，结果摄取后清除。
/// 超过超时时间的标记视为失效，避免丢失的工作器永久阻塞某个记录。
pub struct InFlightTracker {
    jobs: DashMap<String, Instant>,
    timeout: Duration,
}

impl InFlightTracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            jobs: DashMap::new(),
            timeout,
        }
    }

    /// 仅当记录没有有效的在途标记时设置标记
    ///
    /// # 返回值
    ///
    /// * `true` - 已设置新标记
    /// * `false` - 已存在有效标记
    pub fn try_mark(&self, record_id: &str) -> bool {
        let now = Instant::now();
        match self.jobs.entry(record_id.to_string()) {
            Entry::Occupied(mut entry) => {
                if now.duration_since(*entry.get()) >= self.timeout {
                    entry.insert(now);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }

    /// 无条件设置标记
    pub fn mark(&self, record_id: &str) {
        self.jobs.insert(record_id.to_string(), Instant::now());
    }

    /// 清除标记，返回之前是否存在标记
    pub fn clear(&self, record_id: &str) -> bool {
        self.jobs.remove(record_id).is_some()
    }

    /// 记录是否有有效的在途作业
    pub fn is_in_flight(&self, record_id: &str) -> bool {
        self.jobs
            .get(record_id)
            .map(|since| since.elapsed() < self.timeout)
            .unwrap_or(false)
    }
}

/// 作业派发器
///
/// 将作业交给工作池的入站队列后立即返回，不等待爬取完成，也不重试。
/// 派发失败以错误形式返回给调用方。
pub struct JobDispatcher {
    queue: Arc<dyn JobQueue>,
    in_flight: Arc<InFlightTracker>,
    policy: OverlapPolicy,
}

impl JobDispatcher {
    /// 创建新的作业派发器
    ///
    /// # 参数
    ///
    /// * `queue` - 工作池入站队列
    /// * `in_flight` - 在途作业跟踪器，与结果摄取共享
    /// * `policy` - 并发爬取策略
    pub fn new(queue: Arc<dyn JobQueue>, in_flight: Arc<InFlightTracker>, policy: OverlapPolicy) -> Self {
        Self {
            queue,
            in_flight,
            policy,
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn in_flight(&self) -> &Arc<InFlightTracker> {
        &self.in_flight
    }

    /// 派发一个作业
    ///
    /// # 返回值
    ///
    /// * `Ok(DispatchOutcome::Submitted)` - 已提交
    /// * `Ok(DispatchOutcome::Skipped)` - 按 `SkipIfInFlight` 策略跳过
    /// * `Err(DispatchError)` - 队列不可用
    pub async fn dispatch(&self, job: CrawlJob) -> Result<DispatchOutcome, DispatchError> {
        let record_id = job.record_id.clone();

        match self.policy {
            OverlapPolicy::SkipIfInFlight => {
                if !self.in_flight.try_mark(&record_id) {
                    counter!("crawl_jobs_skipped_total").increment(1);
                    debug!(record_id = %record_id, "Crawl already in flight, skipping dispatch");
                    return Ok(DispatchOutcome::Skipped);
                }
            }
            OverlapPolicy::Allow => self.in_flight.mark(&record_id),
        }

        match self.queue.submit(job).await {
            Ok(()) => {
                counter!("crawl_jobs_dispatched_total").increment(1);
                Ok(DispatchOutcome::Submitted)
            }
            Err(e) => {
                self.in_flight.clear(&record_id);
                counter!("crawl_jobs_dispatch_failed_total").increment(1);
                Err(e)
            }
        }
    }
}
