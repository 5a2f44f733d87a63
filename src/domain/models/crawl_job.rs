// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// 爬取作业
///
/// 提交给工作池的不可变作业描述，派发后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlJob {
    /// 所属网站记录ID
    pub record_id: String,
    /// 起始URL
    pub url: String,
    /// 边界正则
    pub boundary_regex: String,
}

impl CrawlJob {
    pub fn new(
        record_id: impl Into<String>,
        url: impl Into<String>,
        boundary_regex: impl Into<String>,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            url: url.into(),
            boundary_regex: boundary_regex.into(),
        }
    }

    /// 编译边界正则
    pub fn boundary(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.boundary_regex)
    }

    /// 判断URL是否在爬取边界内
    ///
    /// 正则无效时任何URL都不在边界内
    pub fn admits(&self, url: &str) -> bool {
        self.boundary()
            .map(|boundary| boundary.is_match(url))
            .unwrap_or(false)
    }
}
