// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::record_repository::RepositoryError;
use crate::domain::models::crawl_execution::CrawlExecution;
use crate::domain::models::crawl_result::CrawledLink;
use async_trait::async_trait;
use uuid::Uuid;

/// 爬取执行仓库特质
///
/// 定义执行图（页面与链接）的持久化接口
#[async_trait]
pub trait ExecutionRepository: Send + Sync {
    /// 创建以起始页面为根的执行，并写入所有页面链接
    ///
    /// 执行、链接以及记录的 `last_execution_id` 更新在同一事务中完成，
    /// 任一步失败都不会留下部分写入的执行。
    ///
    /// # 参数
    ///
    /// * `record_id` - 所属网站记录ID
    /// * `start` - 起始页面链接（`from_url` 为空）
    /// * `links` - 其余页面链接，全部标记为本次执行
    ///
    /// # 返回值
    ///
    /// * `Ok(Uuid)` - 新执行的ID
    /// * `Err(RepositoryError::NotFound)` - 记录不存在
    async fn create_execution(
        &self,
        record_id: &str,
        start: &CrawledLink,
        links: &[CrawledLink],
    ) -> Result<Uuid, RepositoryError>;

    /// 记录一次失败的执行
    ///
    /// 每个记录只保留最近一次失败标记，不影响 `last_execution_id`
    async fn create_failed_execution(
        &self,
        record_id: &str,
        start_url: &str,
        error: &str,
    ) -> Result<Uuid, RepositoryError>;

    /// 删除执行及其全部链接，返回执行是否存在
    async fn delete_execution(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// 删除记录中除 `keep` 以外的全部已完成执行及其链接
    ///
    /// 之前删除失败而遗留的执行也会在此一并清理
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<Uuid>)` - 被删除的执行ID
    async fn delete_superseded_executions(
        &self,
        record_id: &str,
        keep: Uuid,
    ) -> Result<Vec<Uuid>, RepositoryError>;

    /// 根据ID获取执行图
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlExecution>, RepositoryError>;
}
