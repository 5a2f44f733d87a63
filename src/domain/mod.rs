// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含调度器的核心业务逻辑，包括：
/// - 领域模型（models）：网站记录、作业、结果与执行
/// - 仓库接口（repositories）：记录存储与执行图存储的抽象接口
/// - 服务（services）：执行管理器与结果摄取
///
/// 领域层只依赖抽象接口，具体实现由基础设施层提供。
pub mod models;
pub mod repositories;
pub mod services;
