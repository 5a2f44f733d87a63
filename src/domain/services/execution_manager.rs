// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_job::CrawlJob;
use crate::domain::models::website_record::WebsiteRecord;
use crate::domain::repositories::record_repository::RecordRepository;
use crate::queue::dispatcher::{DispatchOutcome, JobDispatcher};
use crate::queue::planner::{PeriodicPlanner, TickCallback};
use crate::utils::errors::SchedulerError;
use crate::utils::keyed_lock::KeyedLocks;
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 执行管理器
///
/// 根据记录的激活状态组合派发与周期计划，实现启动、停止、重新计划、
/// 强制启动和批量启动操作。同一记录上的操作通过按键锁串行执行，
/// 不同记录之间并发执行。
///
/// 计划器中的定时器持有注册时的作业快照，记录配置变更后需调用
/// [`ExecutionManager::replan_executions_of_record`] 使新配置生效。
pub struct ExecutionManager<R>
where
    R: RecordRepository + 'static,
{
    records: Arc<R>,
    dispatcher: Arc<JobDispatcher>,
    planner: PeriodicPlanner,
    locks: KeyedLocks,
}

impl<R> ExecutionManager<R>
where
    R: RecordRepository + 'static,
{
    /// 创建新的执行管理器
    ///
    /// # 参数
    ///
    /// * `records` - 记录仓库
    /// * `dispatcher` - 作业派发器
    pub fn new(records: Arc<R>, dispatcher: Arc<JobDispatcher>) -> Self {
        Self {
            records,
            dispatcher,
            planner: PeriodicPlanner::new(),
            locks: KeyedLocks::new(),
        }
    }

    /// 启动记录的执行
    ///
    /// 立即派发一个作业；周期大于零时注册重复定时器，之前的定时器被替换。
    /// 记录不存在时返回 `NotFound`，计划状态保持不变。
    pub async fn start_executions_of_record(&self, record_id: &str) -> Result<(), SchedulerError> {
        let _guard = self.locks.lock(record_id).await;
        let record = self.load(record_id).await?;
        self.start_record(&record).await;
        Ok(())
    }

    /// 停止记录的后续执行
    ///
    /// 只取消定时器，已派发的作业不受影响。未计划的记录为空操作。
    pub async fn stop_executions_of_record(&self, record_id: &str) -> Result<(), SchedulerError> {
        let _guard = self.locks.lock(record_id).await;
        if self.planner.cancel(record_id) {
            info!(record_id = %record_id, "Stopped periodic executions");
        } else {
            debug!(record_id = %record_id, "Record was not planned");
        }
        Ok(())
    }

    /// 按记录当前配置重新计划
    ///
    /// 先取消定时器再读取记录，读取失败时记录保持未计划状态。
    /// 非活跃记录保持未计划状态，活跃记录按启动处理。
    pub async fn replan_executions_of_record(&self, record_id: &str) -> Result<(), SchedulerError> {
        let _guard = self.locks.lock(record_id).await;
        self.planner.cancel(record_id);

        let record = self.load(record_id).await?;
        if record.is_active {
            self.start_record(&record).await;
        } else {
            info!(record_id = %record_id, "Record is inactive, left unplanned");
        }
        Ok(())
    }

    /// 强制启动一次执行
    ///
    /// 活跃记录等同于启动；非活跃记录只派发一个作业，不修改定时器。
    pub async fn hard_start_of_execution(&self, record_id: &str) -> Result<(), SchedulerError> {
        let _guard = self.locks.lock(record_id).await;
        let record = self.load(record_id).await?;

        if record.is_active {
            self.start_record(&record).await;
        } else {
            info!(record_id = %record_id, "Ad-hoc dispatch for inactive record");
            dispatch_logged(&self.dispatcher, record.to_crawl_job()).await;
        }
        Ok(())
    }

    /// 启动所有活跃记录
    ///
    /// 单个记录失败只记录日志，不影响其他记录。
    ///
    /// # 返回值
    ///
    /// * `Ok(usize)` - 已启动的记录数量
    /// * `Err(SchedulerError)` - 无法枚举记录
    pub async fn start_executions_for_all_active_records(&self) -> Result<usize, SchedulerError> {
        let record_ids = self.records.get_record_ids().await?;
        let mut started = 0;

        for record_id in record_ids {
            let _guard = self.locks.lock(&record_id).await;
            match self.records.find_by_id(&record_id).await {
                Ok(Some(record)) if record.is_active => {
                    self.start_record(&record).await;
                    started += 1;
                }
                Ok(Some(_)) => {}
                Ok(None) => {
                    warn!(record_id = %record_id, "Record disappeared during startup sweep");
                }
                Err(e) => {
                    error!(record_id = %record_id, error = %e, "Failed to load record during startup sweep");
                }
            }
        }

        info!(started, "Started executions for active records");
        Ok(started)
    }

    /// 记录当前的计划周期，未计划时返回 `None`
    pub fn planned_interval(&self, record_id: &str) -> Option<Duration> {
        self.planner.interval_of(record_id)
    }

    /// 当前处于计划状态的记录ID
    pub fn planned_record_ids(&self) -> Vec<String> {
        self.planner.scheduled_ids()
    }

    /// 取消所有定时器
    pub fn shutdown(&self) {
        info!(planned = self.planner.len(), "Cancelling all periodic executions");
        self.planner.cancel_all();
    }

    async fn load(&self, record_id: &str) -> Result<WebsiteRecord, SchedulerError> {
        self.records
            .find_by_id(record_id)
            .await?
            .ok_or_else(|| SchedulerError::NotFound(record_id.to_string()))
    }

    async fn start_record(&self, record: &WebsiteRecord) {
        self.planner.cancel(&record.id);

        let job = record.to_crawl_job();
        dispatch_logged(&self.dispatcher, job.clone()).await;

        if let Some(period) = record.periodicity() {
            let dispatcher = self.dispatcher.clone();
            let callback: TickCallback = Arc::new(move || {
                let dispatcher = dispatcher.clone();
                let job = job.clone();
                async move {
                    dispatch_logged(&dispatcher, job).await;
                }
                .boxed()
            });
            self.planner.schedule(&record.id, period, callback);
            info!(record_id = %record.id, period_secs = period.as_secs(), "Planned periodic executions");
        }
    }
}

async fn dispatch_logged(dispatcher: &JobDispatcher, job: CrawlJob) {
    let record_id = job.record_id.clone();
    match dispatcher.dispatch(job).await {
        Ok(DispatchOutcome::Submitted) => {
            debug!(record_id = %record_id, "Crawl job dispatched");
        }
        Ok(DispatchOutcome::Skipped) => {}
        Err(e) => {
            error!(record_id = %record_id, error = %e, "Failed to dispatch crawl job");
        }
    }
}

#[cfg(test)]
#[path = "execution_manager_test.rs"]
mod tests;
