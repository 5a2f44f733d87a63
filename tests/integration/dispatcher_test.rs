// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::mock_queue::RecordingJobQueue;
use recrawl::domain::models::crawl_job::CrawlJob;
use recrawl::queue::dispatcher::{DispatchOutcome, InFlightTracker, JobDispatcher, OverlapPolicy};
use recrawl::queue::job_queue::DispatchError;
use std::sync::Arc;
use std::time::Duration;

fn job(record_id: &str) -> CrawlJob {
    CrawlJob::new(record_id, "https://example.com", ".*")
}

#[tokio::test]
async fn test_allow_policy_submits_every_job() {
    let queue = Arc::new(RecordingJobQueue::new());
    let tracker = Arc::new(InFlightTracker::new(Duration::from_secs(60)));
    let dispatcher = JobDispatcher::new(queue.clone(), tracker.clone(), OverlapPolicy::Allow);

    for _ in 0..3 {
        assert_eq!(
            dispatcher.dispatch(job("r1")).await.unwrap(),
            DispatchOutcome::Submitted
        );
    }
    assert_eq!(queue.count_for("r1"), 3);
    assert!(tracker.is_in_flight("r1"));
}

#[tokio::test]
async fn test_skip_policy_is_per_record() {
    let queue = Arc::new(RecordingJobQueue::new());
    let tracker = Arc::new(InFlightTracker::new(Duration::from_secs(60)));
    let dispatcher = JobDispatcher::new(queue.clone(), tracker, OverlapPolicy::SkipIfInFlight);

    assert_eq!(dispatcher.dispatch(job("r1")).await.unwrap(), DispatchOutcome::Submitted);
    assert_eq!(dispatcher.dispatch(job("r1")).await.unwrap(), DispatchOutcome::Skipped);
    assert_eq!(dispatcher.dispatch(job("r2")).await.unwrap(), DispatchOutcome::Submitted);
    assert_eq!(queue.jobs().len(), 2);
}

/// 派发失败清除在途标记，下一次派发不会被跳过
#[tokio::test]
async fn test_failed_dispatch_releases_marker() {
    let queue = Arc::new(RecordingJobQueue::new());
    let tracker = Arc::new(InFlightTracker::new(Duration::from_secs(60)));
    let dispatcher =
        JobDispatcher::new(queue.clone(), tracker.clone(), OverlapPolicy::SkipIfInFlight);

    queue.set_unavailable(true);
    let result = dispatcher.dispatch(job("r1")).await;
    assert!(matches!(result, Err(DispatchError::Unavailable(_))));
    assert!(!tracker.is_in_flight("r1"));

    queue.set_unavailable(false);
    assert_eq!(dispatcher.dispatch(job("r1")).await.unwrap(), DispatchOutcome::Submitted);
}
