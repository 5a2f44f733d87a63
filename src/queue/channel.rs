// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::job_queue::{DispatchError, JobQueue, JobSource, ResultSink, ResultSource};
use crate::domain::models::crawl_job::CrawlJob;
use crate::domain::models::crawl_result::CrawlOutcome;
use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

/// 进程内作业队列（生产端）
#[derive(Clone)]
pub struct ChannelJobQueue {
    sender: mpsc::Sender<CrawlJob>,
}

/// 进程内作业队列（消费端），可被多个工作器共享
pub struct ChannelJobSource {
    receiver: Mutex<mpsc::Receiver<CrawlJob>>,
}

/// 进程内结果通道（工作器端）
#[derive(Clone)]
pub struct ChannelResultSink {
    sender: mpsc::Sender<CrawlOutcome>,
}

/// 进程内结果通道（摄取端）
pub struct ChannelResultSource {
    receiver: Mutex<mpsc::Receiver<CrawlOutcome>>,
}

/// 创建有界的进程内作业队列
///
/// # 参数
///
/// * `capacity` - 队列容量，队列满时提交会等待
pub fn job_channel(capacity: usize) -> (ChannelJobQueue, ChannelJobSource) {
    let (sender, receiver) = mpsc::channel(capacity);
    (
        ChannelJobQueue { sender },
        ChannelJobSource {
            receiver: Mutex::new(receiver),
        },
    )
}

/// 创建有界的进程内结果通道
pub fn result_channel(capacity: usize) -> (ChannelResultSink, ChannelResultSource) {
    let (sender, receiver) = mpsc::channel(capacity);
    (
        ChannelResultSink { sender },
        ChannelResultSource {
            receiver: Mutex::new(receiver),
        },
    )
}

#[async_trait]
impl JobQueue for ChannelJobQueue {
    async fn submit(&self, job: CrawlJob) -> Result<(), DispatchError> {
        self.sender.send(job).await.map_err(|_| DispatchError::Closed)
    }
}

#[async_trait]
impl JobSource for ChannelJobSource {
    async fn next_job(&self) -> Result<Option<CrawlJob>, DispatchError> {
        let mut receiver = self.receiver.lock().await;
        match receiver.recv().await {
            Some(job) => Ok(Some(job)),
            None => Err(DispatchError::Closed),
        }
    }
}

#[async_trait]
impl ResultSink for ChannelResultSink {
    async fn publish(&self, outcome: CrawlOutcome) -> Result<(), DispatchError> {
        self.sender
            .send(outcome)
            .await
            .map_err(|_| DispatchError::Closed)
    }
}

#[async_trait]
impl ResultSource for ChannelResultSource {
    async fn next_result(&self) -> Result<Option<CrawlOutcome>, DispatchError> {
        let mut receiver = self.receiver.lock().await;
        match receiver.recv().await {
            Some(outcome) => Ok(Some(outcome)),
            None => Err(DispatchError::Closed),
        }
    }
}
