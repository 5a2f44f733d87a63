// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::job_queue::{DispatchError, JobQueue, JobSource, ResultSink, ResultSource};
use crate::domain::models::crawl_job::CrawlJob;
use crate::domain::models::crawl_result::CrawlOutcome;
use crate::infrastructure::redis_client::RedisClient;
use async_trait::async_trait;
use tracing::debug;

/// 基于Redis列表的作业队列
///
/// 生产端 LPUSH，消费端 RPOP，消息体为JSON。
/// 进程外的爬取工作器消费同一个列表即可接入。
#[derive(Clone)]
pub struct RedisJobQueue {
    client: RedisClient,
    key: String,
}

impl RedisJobQueue {
    pub fn new(client: RedisClient, key: impl Into<String>) -> Self {
        Self {
            client,
            key: key.into(),
        }
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn submit(&self, job: CrawlJob) -> Result<(), DispatchError> {
        let payload = serde_json::to_string(&job)?;
        let depth = self.client.push(&self.key, &payload).await?;
        debug!(record_id = %job.record_id, depth, "Crawl job pushed to {}", self.key);
        Ok(())
    }
}

#[async_trait]
impl JobSource for RedisJobQueue {
    async fn next_job(&self) -> Result<Option<CrawlJob>, DispatchError> {
        match self.client.pop(&self.key).await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }
}

/// 基于Redis列表的结果队列
#[derive(Clone)]
pub struct RedisResultQueue {
    client: RedisClient,
    key: String,
}

impl RedisResultQueue {
    pub fn new(client: RedisClient, key: impl Into<String>) -> Self {
        Self {
            client,
            key: key.into(),
        }
    }
}

#[async_trait]
impl ResultSink for RedisResultQueue {
    async fn publish(&self, outcome: CrawlOutcome) -> Result<(), DispatchError> {
        let payload = serde_json::to_string(&outcome)?;
        self.client.push(&self.key, &payload).await?;
        Ok(())
    }
}

#[async_trait]
impl ResultSource for RedisResultQueue {
    async fn next_result(&self) -> Result<Option<CrawlOutcome>, DispatchError> {
        match self.client.pop(&self.key).await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }
}
