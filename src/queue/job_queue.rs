// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_job::CrawlJob;
use crate::domain::models::crawl_result::CrawlOutcome;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// 派发错误类型
#[derive(Error, Debug)]
pub enum DispatchError {
    /// 队列或消息代理不可用
    #[error("Queue unavailable: {0}")]
    Unavailable(String),

    /// 队列已关闭
    #[error("Queue closed")]
    Closed,

    /// 消息编解码失败
    #[error("Message encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<redis::RedisError> for DispatchError {
    fn from(e: redis::RedisError) -> Self {
        DispatchError::Unavailable(e.to_string())
    }
}

/// 作业队列特质（生产端）
///
/// 提交即返回，不等待爬取完成
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// 提交作业
    async fn submit(&self, job: CrawlJob) -> Result<(), DispatchError>;
}

/// 作业来源特质（消费端）
#[async_trait]
pub trait JobSource: Send + Sync {
    /// 获取下一个作业
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(CrawlJob))` - 获取到作业
    /// * `Ok(None)` - 暂无作业
    /// * `Err(DispatchError::Closed)` - 队列已关闭，消费者应退出
    async fn next_job(&self) -> Result<Option<CrawlJob>, DispatchError>;
}

/// 结果发布特质（工作器端）
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// 发布作业结果
    async fn publish(&self, outcome: CrawlOutcome) -> Result<(), DispatchError>;
}

/// 结果来源特质（摄取端）
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// 获取下一个作业结果，语义同 [`JobSource::next_job`]
    async fn next_result(&self) -> Result<Option<CrawlOutcome>, DispatchError>;
}

#[async_trait]
impl<T: JobQueue + ?Sized> JobQueue for Arc<T> {
    async fn submit(&self, job: CrawlJob) -> Result<(), DispatchError> {
        (**self).submit(job).await
    }
}

#[async_trait]
impl<T: JobSource + ?Sized> JobSource for Arc<T> {
    async fn next_job(&self) -> Result<Option<CrawlJob>, DispatchError> {
        (**self).next_job().await
    }
}

#[async_trait]
impl<T: ResultSink + ?Sized> ResultSink for Arc<T> {
    async fn publish(&self, outcome: CrawlOutcome) -> Result<(), DispatchError> {
        (**self).publish(outcome).await
    }
}

#[async_trait]
impl<T: ResultSource + ?Sized> ResultSource for Arc<T> {
    async fn next_result(&self) -> Result<Option<CrawlOutcome>, DispatchError> {
        (**self).next_result().await
    }
}
