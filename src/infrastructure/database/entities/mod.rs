// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// 使用SeaORM定义网站记录、爬取执行和页面链接表
pub mod crawl_execution;
pub mod web_page_link;
pub mod website_record;
