// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义领域层的数据持久化抽象契约：
/// - 记录仓库（record_repository）：网站记录的CRUD与按ID查找
/// - 执行仓库（execution_repository）：爬取执行图的创建、删除与查询
pub mod execution_repository;
pub mod record_repository;
