// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::record_repository::RepositoryError;
use crate::queue::job_queue::DispatchError;
use thiserror::Error;

/// 执行管理错误类型
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("记录不存在: {0}")]
    NotFound(String),

    #[error("仓库错误: {0}")]
    Repository(#[from] RepositoryError),
}

/// 结果摄取错误类型
#[derive(Error, Debug)]
pub enum IngestionError {
    /// 结果缺少起始页面链接等必要信息
    #[error("无效的爬取结果: {0}")]
    MalformedResult(String),

    #[error("仓库错误: {0}")]
    Repository(#[from] RepositoryError),
}

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("队列错误: {0}")]
    Queue(#[from] DispatchError),
}
