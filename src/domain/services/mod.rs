// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 执行管理（execution_manager）：启动、停止、重新计划记录的周期爬取
/// - 结果摄取（result_ingestion）：将爬取结果写入执行存储
pub mod execution_manager;
pub mod result_ingestion;
