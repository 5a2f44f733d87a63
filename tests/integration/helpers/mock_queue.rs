// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use recrawl::domain::models::crawl_job::CrawlJob;
use recrawl::queue::job_queue::{DispatchError, JobQueue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// 记录所有提交作业的队列，可切换为不可用状态
#[derive(Default)]
pub struct RecordingJobQueue {
    jobs: Mutex<Vec<CrawlJob>>,
    unavailable: AtomicBool,
}

impl RecordingJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn jobs(&self) -> Vec<CrawlJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn count_for(&self, record_id: &str) -> usize {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|job| job.record_id == record_id)
            .count()
    }
}

#[async_trait]
impl JobQueue for RecordingJobQueue {
    async fn submit(&self, job: CrawlJob) -> Result<(), DispatchError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DispatchError::Unavailable("broker down".to_string()));
        }
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}
