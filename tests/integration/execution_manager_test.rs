// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::memory_records::MemoryRecordRepository;
use super::helpers::mock_queue::RecordingJobQueue;
use super::helpers::{advance_secs, record};
use recrawl::domain::services::execution_manager::ExecutionManager;
use recrawl::queue::dispatcher::{InFlightTracker, JobDispatcher, OverlapPolicy};
use recrawl::utils::errors::SchedulerError;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    records: Arc<MemoryRecordRepository>,
    queue: Arc<RecordingJobQueue>,
    in_flight: Arc<InFlightTracker>,
    manager: ExecutionManager<MemoryRecordRepository>,
}

fn harness(policy: OverlapPolicy) -> Harness {
    let records = Arc::new(MemoryRecordRepository::new());
    let queue = Arc::new(RecordingJobQueue::new());
    let in_flight = Arc::new(InFlightTracker::new(Duration::from_secs(3600)));
    let dispatcher = Arc::new(JobDispatcher::new(queue.clone(), in_flight.clone(), policy));
    let manager = ExecutionManager::new(records.clone(), dispatcher);
    Harness {
        records,
        queue,
        in_flight,
        manager,
    }
}

/// 单次记录只派发一个作业且不注册定时器
#[tokio::test(start_paused = true)]
async fn test_single_shot_record_dispatches_exactly_once() {
    let h = harness(OverlapPolicy::Allow);
    h.records.insert(record("r1", 0, true));

    h.manager.start_executions_of_record("r1").await.unwrap();
    advance_secs(30).await;

    let jobs = h.queue.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].record_id, "r1");
    assert_eq!(jobs[0].url, "https://r1.example.com");
    assert!(h.manager.planned_record_ids().is_empty());
}

/// 周期记录在 t=0,5,10 派发，停止后不再派发
#[tokio::test(start_paused = true)]
async fn test_periodic_record_until_stopped() {
    let h = harness(OverlapPolicy::Allow);
    h.records.insert(record("r2", 5, true));

    h.manager.start_executions_of_record("r2").await.unwrap();
    advance_secs(12).await;
    assert_eq!(h.queue.count_for("r2"), 3);

    h.manager.stop_executions_of_record("r2").await.unwrap();
    advance_secs(10).await;
    assert_eq!(h.queue.count_for("r2"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_start_missing_record_leaves_other_timers_alone() {
    let h = harness(OverlapPolicy::Allow);
    h.records.insert(record("r1", 10, true));
    h.manager.start_executions_of_record("r1").await.unwrap();

    let result = h.manager.start_executions_of_record("nope").await;

    assert!(matches!(result, Err(SchedulerError::NotFound(_))));
    assert_eq!(h.manager.planned_record_ids(), vec!["r1".to_string()]);
    assert_eq!(h.queue.count_for("nope"), 0);
}

/// 重新计划使用记录的当前周期
#[tokio::test(start_paused = true)]
async fn test_replan_reflects_current_periodicity() {
    let h = harness(OverlapPolicy::Allow);
    h.records.insert(record("r1", 5, true));
    h.manager.start_executions_of_record("r1").await.unwrap();

    h.records.insert(record("r1", 20, true));
    h.manager.replan_executions_of_record("r1").await.unwrap();
    assert_eq!(h.manager.planned_interval("r1"), Some(Duration::from_secs(20)));

    // start + replan dispatch, then one tick at t=20
    advance_secs(20).await;
    assert_eq!(h.queue.count_for("r1"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_replan_to_zero_or_inactive_unplans() {
    let h = harness(OverlapPolicy::Allow);
    h.records.insert(record("a", 5, true));
    h.records.insert(record("b", 5, true));
    h.manager.start_executions_of_record("a").await.unwrap();
    h.manager.start_executions_of_record("b").await.unwrap();

    h.records.insert(record("a", 0, true));
    h.records.insert(record("b", 5, false));
    h.manager.replan_executions_of_record("a").await.unwrap();
    h.manager.replan_executions_of_record("b").await.unwrap();

    assert!(h.manager.planned_record_ids().is_empty());
    // a: start + replan; b: start only
    assert_eq!(h.queue.count_for("a"), 2);
    assert_eq!(h.queue.count_for("b"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_replan_never_planned_record() {
    let h = harness(OverlapPolicy::Allow);
    h.records.insert(record("r1", 15, true));

    h.manager.replan_executions_of_record("r1").await.unwrap();

    assert_eq!(h.manager.planned_interval("r1"), Some(Duration::from_secs(15)));
    assert_eq!(h.queue.count_for("r1"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_replan_deleted_record_is_not_found_and_unplanned() {
    let h = harness(OverlapPolicy::Allow);
    h.records.insert(record("r1", 15, true));
    h.manager.start_executions_of_record("r1").await.unwrap();

    h.records.remove("r1");
    let result = h.manager.replan_executions_of_record("r1").await;

    assert!(matches!(result, Err(SchedulerError::NotFound(_))));
    assert!(h.manager.planned_record_ids().is_empty());
}

/// 强制启动非活跃记录只派发一次
#[tokio::test(start_paused = true)]
async fn test_hard_start_inactive_record_dispatches_once() {
    let h = harness(OverlapPolicy::Allow);
    h.records.insert(record("r1", 5, false));

    h.manager.hard_start_of_execution("r1").await.unwrap();
    advance_secs(20).await;

    assert_eq!(h.queue.count_for("r1"), 1);
    assert!(h.manager.planned_record_ids().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_start_all_active_records() {
    let h = harness(OverlapPolicy::Allow);
    h.records.insert(record("a", 5, true));
    h.records.insert(record("b", 0, true));
    h.records.insert(record("c", 5, false));

    let started = h
        .manager
        .start_executions_for_all_active_records()
        .await
        .unwrap();

    assert_eq!(started, 2);
    assert_eq!(h.manager.planned_record_ids(), vec!["a".to_string()]);
    assert_eq!(h.queue.count_for("a"), 1);
    assert_eq!(h.queue.count_for("b"), 1);
    assert_eq!(h.queue.count_for("c"), 0);
}

/// 派发失败不影响定时器，下一次触发即为重试
#[tokio::test(start_paused = true)]
async fn test_dispatch_failure_is_retried_by_next_tick() {
    let h = harness(OverlapPolicy::Allow);
    h.records.insert(record("r1", 5, true));
    h.queue.set_unavailable(true);

    h.manager.start_executions_of_record("r1").await.unwrap();
    assert_eq!(h.queue.count_for("r1"), 0);
    assert!(h.manager.planned_interval("r1").is_some());

    h.queue.set_unavailable(false);
    advance_secs(5).await;
    assert_eq!(h.queue.count_for("r1"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_skip_if_in_flight_policy() {
    let h = harness(OverlapPolicy::SkipIfInFlight);
    h.records.insert(record("r1", 5, true));

    h.manager.start_executions_of_record("r1").await.unwrap();
    advance_secs(5).await;
    assert_eq!(h.queue.count_for("r1"), 1);

    h.in_flight.clear("r1");
    advance_secs(5).await;
    assert_eq!(h.queue.count_for("r1"), 2);
}
