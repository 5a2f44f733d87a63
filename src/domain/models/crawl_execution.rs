// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 爬取执行实体
///
/// 一次已完成爬取作业产生的页面图：节点为页面，边为页面之间的链接。
/// 同一记录的下一次成功执行会替换（删除）当前执行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlExecution {
    /// 执行唯一标识符
    pub id: Uuid,
    /// 所属网站记录ID
    pub record_id: String,
    /// 起始页面URL
    #[serde(rename = "startURL")]
    pub start_url: String,
    /// 执行状态
    pub status: ExecutionStatus,
    /// 失败原因（仅失败执行）
    pub error: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 页面节点
    pub nodes: Vec<WebPage>,
    /// 页面之间的链接
    pub edges: Vec<WebPageLink>,
}

/// 执行状态枚举
///
/// 失败执行不包含任何页面节点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// 已完成
    #[default]
    Completed,
    /// 已失败
    Failed,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecutionStatus::Completed => write!(f, "completed"),
            ExecutionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ExecutionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(ExecutionStatus::Completed),
            "failed" => Ok(ExecutionStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 页面节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPage {
    pub url: String,
    pub title: Option<String>,
    pub crawl_time: Option<DateTime<Utc>>,
}

impl WebPage {
    /// 页面是否在本次执行中被实际爬取
    pub fn is_crawled(&self) -> bool {
        self.crawl_time.is_some()
    }
}

/// 有向页面链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPageLink {
    #[serde(rename = "sourceURL")]
    pub source_url: String,
    #[serde(rename = "destinationURL")]
    pub destination_url: String,
}
