// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供作业派发、周期计划和工作池通道
pub mod channel;
pub mod dispatcher;
pub mod job_queue;
pub mod planner;
pub mod redis_queue;
