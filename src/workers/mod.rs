// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 爬取工作器、结果摄取工作器以及管理它们生命周期的工作管理器
pub mod crawl_worker;
pub mod ingestion_worker;
pub mod manager;
pub mod worker;

pub use worker::Worker;
