// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了调度器的核心业务实体，包括：
/// - 网站记录（website_record）：爬取目标及其周期配置
/// - 爬取作业（crawl_job）：提交给工作池的作业
/// - 爬取结果（crawl_result）：工作池上报的结果或失败哨兵
/// - 爬取执行（crawl_execution）：持久化的页面图
pub mod crawl_execution;
pub mod crawl_job;
pub mod crawl_result;
pub mod website_record;
