// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 错误类型、按键加锁和日志初始化
pub mod errors;
pub mod keyed_lock;
pub mod telemetry;
