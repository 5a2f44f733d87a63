// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供领域层抽象接口的具体实现：
/// - 数据库（database）：连接池和实体映射
/// - 指标（metrics）：Prometheus导出
/// - Redis客户端（redis_client）：作业与结果队列的消息代理
/// - 仓库实现（repositories）：记录与执行仓库
pub mod database;
pub mod metrics;
pub mod redis_client;
pub mod repositories;
