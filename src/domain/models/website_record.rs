// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::crawl_job::CrawlJob;

/// 网站记录实体
///
/// 描述一个需要周期性（或一次性）爬取的目标站点。
/// 调度器只读取记录，`last_execution_id` 由结果摄取流程维护。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteRecord {
    /// 记录唯一标识符
    pub id: String,
    /// 爬取起始URL
    pub url: String,
    /// 边界正则，限制爬虫继续跟进的链接
    pub boundary_regex: String,
    /// 显示名称
    pub label: String,
    /// 是否处于激活状态
    pub is_active: bool,
    /// 标签
    pub tags: Vec<String>,
    /// 爬取周期（秒），0 表示只执行一次
    pub periodicity_in_seconds: u64,
    /// 最近一次成功执行的ID
    pub last_execution_id: Option<Uuid>,
}

impl WebsiteRecord {
    /// 创建新的网站记录，ID自动生成，默认激活且只执行一次
    pub fn new(
        url: impl Into<String>,
        boundary_regex: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            boundary_regex: boundary_regex.into(),
            label: label.into(),
            is_active: true,
            tags: Vec::new(),
            periodicity_in_seconds: 0,
            last_execution_id: None,
        }
    }

    /// 获取爬取周期
    ///
    /// # 返回值
    ///
    /// * `Some(Duration)` - 周期性记录
    /// * `None` - 一次性记录（周期为0）
    pub fn periodicity(&self) -> Option<Duration> {
        if self.periodicity_in_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.periodicity_in_seconds))
        }
    }

    /// 是否需要周期性调度
    pub fn is_recurring(&self) -> bool {
        self.periodicity_in_seconds > 0
    }

    /// 根据当前配置生成爬取作业
    pub fn to_crawl_job(&self) -> CrawlJob {
        CrawlJob::new(&self.id, &self.url, &self.boundary_regex)
    }
}

/// 网站记录更新参数
///
/// 只有设置了值的字段会被更新
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteRecordUpdate {
    pub url: Option<String>,
    pub boundary_regex: Option<String>,
    pub label: Option<String>,
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub periodicity_in_seconds: Option<u64>,
}

impl WebsiteRecordUpdate {
    /// 是否没有任何需要更新的字段
    pub fn is_empty(&self) -> bool {
        self.url.is_none()
            && self.boundary_regex.is_none()
            && self.label.is_none()
            && self.is_active.is_none()
            && self.tags.is_none()
            && self.periodicity_in_seconds.is_none()
    }

    /// 将更新应用到记录上
    pub fn apply_to(&self, record: &mut WebsiteRecord) {
        if let Some(url) = &self.url {
            record.url = url.clone();
        }
        if let Some(boundary_regex) = &self.boundary_regex {
            record.boundary_regex = boundary_regex.clone();
        }
        if let Some(label) = &self.label {
            record.label = label.clone();
        }
        if let Some(is_active) = self.is_active {
            record.is_active = is_active;
        }
        if let Some(tags) = &self.tags {
            record.tags = tags.clone();
        }
        if let Some(periodicity) = self.periodicity_in_seconds {
            record.periodicity_in_seconds = periodicity;
        }
    }
}
