// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::website_record::{WebsiteRecord, WebsiteRecordUpdate};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 存储的数据或请求参数无效
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// 网站记录仓库特质
///
/// 记录存储的抽象接口。调度器只依赖 `get_record_ids` 和 `find_by_id`，
/// 其余操作供管理端使用。
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// 获取所有记录ID
    async fn get_record_ids(&self) -> Result<Vec<String>, RepositoryError>;

    /// 根据ID查找记录
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(WebsiteRecord))` - 找到记录
    /// * `Ok(None)` - 记录不存在
    /// * `Err(RepositoryError)` - 查询失败
    async fn find_by_id(&self, id: &str) -> Result<Option<WebsiteRecord>, RepositoryError>;

    /// 创建记录
    async fn create(&self, record: &WebsiteRecord) -> Result<WebsiteRecord, RepositoryError>;

    /// 更新记录中已设置的字段
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(WebsiteRecord))` - 更新后的记录
    /// * `Ok(None)` - 记录不存在
    /// * `Err(RepositoryError::InvalidData)` - 未提供任何更新字段
    async fn update(
        &self,
        id: &str,
        update: &WebsiteRecordUpdate,
    ) -> Result<Option<WebsiteRecord>, RepositoryError>;

    /// 删除记录，返回记录是否存在
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
}
