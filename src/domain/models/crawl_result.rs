// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 爬取过程中发现的一条链接
///
/// `from_url` 为空的链接表示爬取的起始页面。
/// `title` 和 `crawl_time` 仅在目标页面被实际爬取时存在。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawledLink {
    #[serde(rename = "fromURL")]
    pub from_url: Option<String>,
    #[serde(rename = "toURL")]
    pub to_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawl_time: Option<DateTime<Utc>>,
}

impl CrawledLink {
    /// 起始页面链接
    pub fn start(url: impl Into<String>, title: Option<String>, crawl_time: DateTime<Utc>) -> Self {
        Self {
            from_url: None,
            to_url: url.into(),
            title,
            crawl_time: Some(crawl_time),
        }
    }

    /// 两个页面之间的链接
    pub fn between(from_url: impl Into<String>, to_url: impl Into<String>) -> Self {
        Self {
            from_url: Some(from_url.into()),
            to_url: to_url.into(),
            title: None,
            crawl_time: None,
        }
    }

    /// 标记目标页面已被爬取
    pub fn crawled(mut self, title: impl Into<String>, crawl_time: DateTime<Utc>) -> Self {
        self.title = Some(title.into());
        self.crawl_time = Some(crawl_time);
        self
    }

    /// 是否为起始页面链接
    pub fn is_start(&self) -> bool {
        self.from_url.is_none()
    }
}

/// 一次成功爬取的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    pub record_id: String,
    #[serde(rename = "startURL")]
    pub start_url: String,
    pub links: Vec<CrawledLink>,
}

impl CrawlResult {
    /// 获取起始页面链接（第一条 `from_url` 为空的链接）
    pub fn start_link(&self) -> Option<&CrawledLink> {
        self.links.iter().find(|link| link.is_start())
    }

    /// 页面之间的链接（不含起始页面链接）
    pub fn page_links(&self) -> impl Iterator<Item = &CrawledLink> {
        self.links.iter().filter(|link| !link.is_start())
    }
}

/// 工作池上报的作业结果
///
/// `Failed` 为失败哨兵值，工作器无法完成爬取时上报
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CrawlOutcome {
    /// 爬取完成
    Completed(CrawlResult),
    /// 爬取失败
    #[serde(rename_all = "camelCase")]
    Failed {
        record_id: String,
        #[serde(rename = "startURL")]
        start_url: String,
        error: String,
    },
}

impl CrawlOutcome {
    /// 结果所属的网站记录ID
    pub fn record_id(&self) -> &str {
        match self {
            CrawlOutcome::Completed(result) => &result.record_id,
            CrawlOutcome::Failed { record_id, .. } => record_id,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CrawlOutcome::Failed { .. })
    }
}
