// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供记录仓库与执行仓库的SeaORM实现
pub mod execution_repo_impl;
pub mod record_repo_impl;
