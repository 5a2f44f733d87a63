// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含网站记录、作业与执行模型，仓库接口，执行管理和结果摄取服务
pub mod domain;

/// 基础设施模块
///
/// 提供数据库、Redis和指标导出等外部服务集成
pub mod infrastructure;

/// 队列模块
///
/// 实现作业派发、周期计划和工作池通道
pub mod queue;

/// 工具模块
///
/// 错误类型、按键加锁和日志初始化
pub mod utils;

/// 工作器模块
///
/// 实现爬取工作器、结果摄取工作器和工作器管理
pub mod workers;
